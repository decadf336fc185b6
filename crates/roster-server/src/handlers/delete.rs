//! `DELETE /contacts/{id}`

use axum::{
  extract::{Path, State},
  http::{HeaderMap, StatusCode},
  response::{IntoResponse, Response},
};
use roster_core::{ContactStore, WriteOutcome};

use super::{path_id, precondition_from};
use crate::{AppState, error::Error};

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
  let precondition = precondition_from(&headers);

  match state
    .store
    .delete_if(id, &precondition)
    .await
    .map_err(Error::store)?
  {
    WriteOutcome::Applied(_) => {
      tracing::info!(id, "contact deleted");
      Ok(StatusCode::OK.into_response())
    }
    WriteOutcome::Missing => Err(Error::NotFound),
    WriteOutcome::Refused => {
      tracing::warn!(id, ?precondition, "delete refused: precondition failed");
      Err(Error::PreconditionFailed)
    }
    WriteOutcome::Taken => Err(Error::store_violation("delete_if reported Taken")),
  }
}
