//! Error types for the roster-xml codec.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("malformed contact XML: {0}")]
  Parse(String),

  #[error("cannot serialise contact XML: {0}")]
  Serialize(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
