//! `POST /contacts`

use axum::{
  extract::State,
  http::{HeaderMap, StatusCode, header},
  response::{IntoResponse, Response},
};
use bytes::Bytes;
use roster_core::{ContactStore, WriteOutcome, etag};

use super::entity_headers;
use crate::{AppState, error::Error, negotiate::decode_contact};

/// An id of `0` (or none) asks the store to allocate one. A body naming an
/// id that is already stored is a conflict; any other store failure is
/// reported as a bad request.
pub async fn handler<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
  body: Bytes,
) -> Result<Response, Error>
where
  S: ContactStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let contact = decode_contact(&headers, &body)?;
  let requested = contact.id;

  let outcome = state
    .store
    .create(contact)
    .await
    .map_err(|e| Error::BadRequest(e.to_string()))?;

  let created = match outcome {
    WriteOutcome::Applied(created) => created,
    WriteOutcome::Taken => {
      tracing::warn!(id = requested, "create refused: id already exists");
      return Err(Error::Conflict(format!("contact {requested} already exists")));
    }
    WriteOutcome::Missing | WriteOutcome::Refused => {
      return Err(Error::BadRequest("contact was not stored".to_string()));
    }
  };

  tracing::info!(id = created.id, "contact created");
  let location = format!("{}/contacts/{}", state.config.base_url(), created.id);
  Ok(
    (
      StatusCode::CREATED,
      [(header::LOCATION, location)],
      entity_headers(etag::compute(&created), &state.config),
    )
      .into_response(),
  )
}
