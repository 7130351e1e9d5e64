//! roster server binary.
//!
//! Reads `roster.toml` (or the path specified with `--config`), opens the
//! SQLite store, and serves the page and JSON API over HTTP.
//!
//! # Listing records
//!
//! To print every stored record as a table instead of serving:
//!
//! ```
//! cargo run -p roster-server --bin roster -- --list
//! ```

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use roster_core::store::RecordStore as _;
use roster_server::{expand_tilde, load_config, render_table};
use roster_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Roster record server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "roster.toml")]
  config: PathBuf,

  /// Print all stored records as a table and exit.
  #[arg(long)]
  list: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let server_cfg = load_config(&cli.config).context("failed to load configuration")?;
  let store_path = expand_tilde(&server_cfg.store_path);

  // Helper mode: print the table and exit.
  if cli.list {
    let store = SqliteStore::open(&store_path)
      .await
      .with_context(|| format!("failed to open store at {store_path:?}"))?;
    let records = store.get_all().await.context("failed to read records")?;
    print!("{}", render_table(&records));
    store.shutdown().await.context("failed to close store")?;
    return Ok(());
  }

  // A store that cannot be opened leaves the server running degraded; every
  // API call then answers with an error envelope.
  let store = Arc::new(SqliteStore::open_or_degraded(&store_path).await);

  let app = roster_server::router(Arc::clone(&store));
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

  if let Err(e) = store.shutdown().await {
    tracing::warn!(error = %e, "record store did not close cleanly");
  }
  Ok(())
}

/// Resolve on SIGINT, or SIGTERM on Unix.
async fn shutdown_signal() {
  let ctrl_c = async {
    if let Err(e) = tokio::signal::ctrl_c().await {
      tracing::error!(error = %e, "cannot listen for Ctrl-C");
      std::future::pending::<()>().await;
    }
  };

  #[cfg(unix)]
  let terminate = async {
    use tokio::signal::unix::{SignalKind, signal};
    match signal(SignalKind::terminate()) {
      Ok(mut sig) => {
        sig.recv().await;
      }
      Err(e) => {
        tracing::error!(error = %e, "cannot listen for SIGTERM");
        std::future::pending::<()>().await;
      }
    }
  };

  #[cfg(not(unix))]
  let terminate = std::future::pending::<()>();

  tokio::select! {
    () = ctrl_c => tracing::info!("received Ctrl-C, shutting down"),
    () = terminate => tracing::info!("received SIGTERM, shutting down"),
  }
}
