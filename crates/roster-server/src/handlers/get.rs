//! `GET /contacts/{id}`

use axum::{
  extract::{Path, State},
  http::{HeaderMap, StatusCode, header},
  response::{IntoResponse, Response},
};
use roster_core::{ContactStore, etag};

use super::{entity_headers, path_id, precondition_from};
use crate::{
  AppState,
  error::Error,
  negotiate::{Format, encode_contact},
};

pub async fn handler<S>(
  State(state): State<AppState<S>>,
  Path(raw_id): Path<String>,
  headers: HeaderMap,
) -> Result<Response, Error>
where
  S: ContactStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let id = path_id(&raw_id)?;
  let contact = state
    .store
    .find(id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::NotFound)?;

  let etag = etag::compute(&contact);
  if !precondition_from(&headers).admits(&etag) {
    tracing::debug!(id, "conditional GET: not modified");
    return Err(Error::NotModified { etag });
  }

  let format = Format::preferred(&headers);
  let body = encode_contact(format, &contact)?;
  Ok(
    (
      StatusCode::OK,
      entity_headers(etag, &state.config),
      [(header::CONTENT_TYPE, format.content_type())],
      body,
    )
      .into_response(),
  )
}
