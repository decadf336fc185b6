//! Load and save the contact file.
//!
//! The file is a `<contacts>` XML document (see [`roster_xml`]). It is read
//! once at startup and written once at shutdown; nothing here runs while
//! requests are being served.

use std::path::{Path, PathBuf};

use crate::{Error, MemoryStore, Result};

/// Import every contact from the file at `path` into `store`.
///
/// Records keep their ids, so later allocations skip them. A missing file is
/// not an error and imports nothing.
pub async fn restore(store: &MemoryStore, path: &Path) -> Result<usize> {
  let xml = match tokio::fs::read_to_string(path).await {
    Ok(xml) => xml,
    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
      tracing::info!(?path, "no contact file yet; starting empty");
      return Ok(0);
    }
    Err(source) => return Err(io_error(path, source)),
  };

  let list = roster_xml::parse_list(&xml)?;
  let count = store.import(list)?;
  tracing::info!(?path, count, "restored contacts");
  Ok(count)
}

/// Write every contact in `store` to `path`, replacing the file.
///
/// The document is written beside the target first and then renamed over
/// it, so a crash mid-write leaves the previous file intact.
pub async fn persist(store: &MemoryStore, path: &Path) -> Result<usize> {
  let contacts = store.export();
  let doc = roster_xml::serialize_document(&contacts)?;

  let staging = staging_path(path);
  tokio::fs::write(&staging, doc)
    .await
    .map_err(|source| io_error(&staging, source))?;
  tokio::fs::rename(&staging, path)
    .await
    .map_err(|source| io_error(path, source))?;

  tracing::info!(?path, count = contacts.len(), "persisted contacts");
  Ok(contacts.len())
}

fn staging_path(path: &Path) -> PathBuf {
  let mut name = path.file_name().unwrap_or_default().to_os_string();
  name.push(".tmp");
  path.with_file_name(name)
}

fn io_error(path: &Path, source: std::io::Error) -> Error {
  Error::Io { path: path.to_path_buf(), source }
}
