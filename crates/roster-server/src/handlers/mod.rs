//! Handlers for `/contacts` endpoints.
//!
//! | Method   | Path             | Notes |
//! |----------|------------------|-------|
//! | `GET`    | `/contacts`      | Optional `?title=<substring>` |
//! | `POST`   | `/contacts`      | 201 + `Location` + `ETag`; 409 if the id exists |
//! | `GET`    | `/contacts/{id}` | 304 when the precondition fails |
//! | `PUT`    | `/contacts/{id}` | 412 when the precondition fails |
//! | `DELETE` | `/contacts/{id}` | 412 when the precondition fails |

pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use axum::http::{HeaderMap, HeaderName, header};
use roster_core::{ContactId, Precondition, contact::parse_id};

use crate::{ServerConfig, error::Error};

/// The `If-Match` / `If-None-Match` headers of a request.
pub(crate) fn precondition_from(headers: &HeaderMap) -> Precondition {
  let value = |name: HeaderName| {
    headers
      .get(name)
      .and_then(|v| v.to_str().ok())
      .map(str::to_owned)
  };
  Precondition {
    if_match:      value(header::IF_MATCH),
    if_none_match: value(header::IF_NONE_MATCH),
  }
}

/// Parse the `{id}` path segment. Anything that is not a canonical positive
/// integer names no resource.
pub(crate) fn path_id(raw: &str) -> Result<ContactId, Error> {
  parse_id(raw).map_err(|_| Error::NotFound)
}

/// `ETag` and `Cache-Control` for a response describing one contact.
pub(crate) fn entity_headers(
  etag: String,
  config: &ServerConfig,
) -> [(HeaderName, String); 2] {
  [
    (header::ETAG, etag),
    (header::CACHE_CONTROL, format!("max-age={}", config.cache_max_age)),
  ]
}
