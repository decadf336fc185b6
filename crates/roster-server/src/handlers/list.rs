//! `GET /contacts[?title=<substring>]`

use axum::{
  extract::{Query, State},
  http::{HeaderMap, StatusCode, header},
  response::{IntoResponse, Response},
};
use roster_core::{ContactList, ContactStore};
use serde::Deserialize;

use crate::{
  AppState,
  error::Error,
  negotiate::{Format, encode_list},
};

#[derive(Debug, Deserialize)]
pub struct ListParams {
  /// Case-insensitive substring the title must contain.
  pub title: Option<String>,
}

/// An empty result is still `200 OK` with an empty list.
pub async fn handler<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<ListParams>,
  headers: HeaderMap,
) -> Result<Response, Error>
where
  S: ContactStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let contacts = match &params.title {
    Some(title) => state.store.find_by_title(title).await,
    None => state.store.find_all().await,
  }
  .map_err(Error::store)?;
  tracing::debug!(title = ?params.title, count = contacts.len(), "listed contacts");

  let format = Format::preferred(&headers);
  let body = encode_list(format, &ContactList::from(contacts))?;
  Ok((StatusCode::OK, [(header::CONTENT_TYPE, format.content_type())], body).into_response())
}
