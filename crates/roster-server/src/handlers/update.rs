//! `PUT /contacts/{id}`

use axum::{
  extract::{Path, State},
  http::{HeaderMap, StatusCode},
  response::{IntoResponse, Response},
};
use bytes::Bytes;
use roster_core::{ContactStore, WriteOutcome, etag};

use super::{entity_headers, path_id, precondition_from};
use crate::{AppState, error::Error, negotiate::decode_contact};

/// Replace the fields of an existing contact.
///
/// The path id wins: a body without an id takes it, a body with a different
/// non-zero id is rejected (after the path id is known to exist).
pub async fn handler<S>(
  State(state): State<AppState<S>>,
  Path(raw_id): Path<String>,
  headers: HeaderMap,
  body: Bytes,
) -> Result<Response, Error>
where
  S: ContactStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let id = path_id(&raw_id)?;
  let mut contact = decode_contact(&headers, &body)?;

  if contact.is_assigned() && contact.id != id {
    state
      .store
      .find(id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::NotFound)?;
    return Err(Error::BadRequest(format!(
      "body id {} does not match path id {id}",
      contact.id
    )));
  }
  contact.id = id;

  let precondition = precondition_from(&headers);
  let outcome = state
    .store
    .update_if(contact, &precondition)
    .await
    .map_err(Error::store)?;

  match outcome {
    WriteOutcome::Applied(updated) => {
      tracing::info!(id, "contact updated");
      Ok(
        (StatusCode::OK, entity_headers(etag::compute(&updated), &state.config))
          .into_response(),
      )
    }
    WriteOutcome::Missing => Err(Error::NotFound),
    WriteOutcome::Refused => {
      tracing::warn!(id, ?precondition, "update refused: precondition failed");
      Err(Error::PreconditionFailed)
    }
    WriteOutcome::Taken => Err(Error::store_violation("update_if reported Taken")),
  }
}
