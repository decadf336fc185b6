//! roster-server binary.
//!
//! Reads `config.toml` (or the path given with `--config`) layered under
//! `ROSTER_*` environment variables, restores the contact file if one is
//! configured, and serves the contact collection over HTTP. On Ctrl-C or
//! SIGTERM the server drains in-flight requests and writes the contact file
//! back.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::Parser;
use roster_server::{AppState, ServerConfig};
use roster_store_memory::{MemoryStore, snapshot};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Roster contact server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("ROSTER"))
    .build()
    .context("failed to read config file")?;

  let mut server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;
  server_cfg.contacts_file = server_cfg.contacts_file.as_deref().map(expand_tilde);

  let store = MemoryStore::with_id_floor(server_cfg.id_floor);
  if let Some(path) = &server_cfg.contacts_file {
    snapshot::restore(&store, path)
      .await
      .with_context(|| format!("failed to load contacts from {path:?}"))?;
  }

  let state = AppState {
    store:  Arc::new(store.clone()),
    config: Arc::new(server_cfg.clone()),
  };

  let app = roster_server::router(state).layer(TraceLayer::new_for_http());
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  let served = axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await;
  finish(served, &store, server_cfg.contacts_file.as_deref()).await
}

/// Write the contact file, then report how serving ended.
///
/// The file is written even when serving failed.
async fn finish(
  served: std::io::Result<()>,
  store: &MemoryStore,
  contacts_file: Option<&Path>,
) -> anyhow::Result<()> {
  if let Err(e) = &served {
    tracing::error!("server error: {e}");
  }
  if let Some(path) = contacts_file {
    snapshot::persist(store, path)
      .await
      .with_context(|| format!("failed to save contacts to {path:?}"))?;
  }
  served.context("server error")
}

/// Resolve when the process is asked to stop.
async fn shutdown_signal() {
  let ctrl_c = async {
    if let Err(e) = tokio::signal::ctrl_c().await {
      tracing::error!("cannot listen for Ctrl-C: {e}");
      std::future::pending::<()>().await;
    }
  };

  #[cfg(unix)]
  let terminate = async {
    match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
      Ok(mut signal) => {
        signal.recv().await;
      }
      Err(e) => {
        tracing::error!("cannot listen for SIGTERM: {e}");
        std::future::pending::<()>().await;
      }
    }
  };

  #[cfg(not(unix))]
  let terminate = std::future::pending::<()>();

  tokio::select! {
    () = ctrl_c => {},
    () = terminate => {},
  }
  tracing::info!("shutting down");
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
