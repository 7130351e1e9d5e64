//! HTTP front end for Roster.
//!
//! Serves the single-page UI at `/` and mounts the JSON API from
//! `roster-api` under `/api`, backed by any [`RecordStore`].

use std::{
  fmt::Write as _,
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::{Router, response::Html, routing::get};
use roster_core::{record::Record, store::RecordStore};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

/// The interactive page: add form, search box and record table.
pub const INDEX_HTML: &str = include_str!("../assets/index.html");

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `roster.toml` and
/// `ROSTER_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
}

/// Layer built-in defaults, the optional TOML file at `path`, and the
/// environment, in that order.
pub fn load_config(path: &Path) -> Result<ServerConfig, config::ConfigError> {
  config::Config::builder()
    .set_default("host", "0.0.0.0")?
    .set_default("port", 5000)?
    .set_default("store_path", "users.db")?
    .add_source(config::File::from(path).required(false))
    .add_source(config::Environment::with_prefix("ROSTER"))
    .build()?
    .try_deserialize()
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router around a process-wide `store`.
pub fn router<S>(store: Arc<S>) -> Router
where
  S: RecordStore + 'static,
{
  Router::new()
    .route("/", get(index))
    .nest("/api", roster_api::api_router(store))
    .layer(TraceLayer::new_for_http())
}

async fn index() -> Html<&'static str> { Html(INDEX_HTML) }

// ─── Console listing ──────────────────────────────────────────────────────────

/// Render records as a fixed-width table followed by the total, for
/// `roster --list`.
pub fn render_table(records: &[Record]) -> String {
  if records.is_empty() {
    return "No records.\n".to_owned();
  }

  let rule = "=".repeat(80);
  let mut out = String::new();
  let _ = writeln!(out, "{rule}");
  let _ = writeln!(
    out,
    "{:<5} {:<20} {:<20} {:<20} {:<19}",
    "ID", "Last name", "First name", "Middle name", "Created at"
  );
  let _ = writeln!(out, "{}", "-".repeat(80));
  for record in records {
    let _ = writeln!(
      out,
      "{:<5} {:<20} {:<20} {:<20} {:<19}",
      record.id,
      record.last_name,
      record.first_name,
      record.middle_name.as_deref().unwrap_or("-"),
      record.created_at.format(roster_api::envelope::TIMESTAMP_FORMAT),
    );
  }
  let _ = writeln!(out, "{rule}");
  let _ = writeln!(out, "Total records: {}", records.len());
  out
}
