//! Error types and axum `IntoResponse` implementation.

use axum::{
  http::{StatusCode, header},
  response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("not found")]
  NotFound,
  /// A conditional GET whose precondition did not admit the current state.
  #[error("not modified")]
  NotModified { etag: String },
  #[error("precondition failed")]
  PreconditionFailed,
  #[error("conflict: {0}")]
  Conflict(String),
  #[error("bad request: {0}")]
  BadRequest(String),
  #[error("unsupported media type: {0}")]
  UnsupportedMediaType(String),
  #[error("encoding error: {0}")]
  Encode(String),
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Error::Store(Box::new(e))
  }

  /// A store answered outside its contract, e.g. an outcome a call never
  /// produces. Reported like any other store failure.
  pub fn store_violation(what: &str) -> Self {
    tracing::error!("store contract violated: {what}");
    Error::Store(format!("store contract violated: {what}").into())
  }
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    match self {
      Error::NotFound => (StatusCode::NOT_FOUND, "Not Found").into_response(),
      Error::NotModified { etag } => {
        (StatusCode::NOT_MODIFIED, [(header::ETAG, etag)]).into_response()
      }
      Error::PreconditionFailed => {
        (StatusCode::PRECONDITION_FAILED, "Precondition Failed").into_response()
      }
      Error::Conflict(msg) => (StatusCode::CONFLICT, msg).into_response(),
      Error::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
      Error::UnsupportedMediaType(msg) => {
        (StatusCode::UNSUPPORTED_MEDIA_TYPE, msg).into_response()
      }
      Error::Encode(msg) => {
        (StatusCode::INTERNAL_SERVER_ERROR, msg).into_response()
      }
      Error::Store(e) => {
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
      }
    }
  }
}
