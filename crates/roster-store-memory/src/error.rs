//! Error type for `roster-store-memory`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The allocator has saturated and its terminal id is already in use.
  #[error("contact ids exhausted")]
  IdsExhausted,

  #[error("cannot access contact file {path:?}: {source}")]
  Io {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("xml error: {0}")]
  Xml(#[from] roster_xml::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
