//! Error type for `roster-store-sqlite`.

use roster_core::store::{Classify, FailureKind};
use rusqlite::ErrorCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Core(#[from] roster_core::Error),

  /// The database file could not be opened; the store is degraded.
  #[error("connection failure: {0}")]
  ConnectionFailure(String),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("timestamp parse error: {0}")]
  Timestamp(String),
}

impl Classify for Error {
  fn kind(&self) -> FailureKind {
    match self {
      Self::Core(e) => e.kind(),
      Self::ConnectionFailure(_) => FailureKind::ConnectionFailure,
      Self::Database(tokio_rusqlite::Error::ConnectionClosed) => {
        FailureKind::ConnectionFailure
      }
      Self::Database(tokio_rusqlite::Error::Rusqlite(
        rusqlite::Error::SqliteFailure(e, _),
      )) => match e.code {
        ErrorCode::ConstraintViolation => FailureKind::ConstraintViolation,
        ErrorCode::CannotOpen => FailureKind::ConnectionFailure,
        _ => FailureKind::Backend,
      },
      Self::Database(_) | Self::Timestamp(_) => FailureKind::Backend,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
