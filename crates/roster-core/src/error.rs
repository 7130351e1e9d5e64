//! Error types for `roster-core`.

use thiserror::Error;

use crate::store::{Classify, FailureKind};

#[derive(Debug, Error)]
pub enum Error {
  /// A write would persist an empty required name field.
  #[error("{field} must not be empty")]
  ConstraintViolation { field: &'static str },

  #[error("record not found: {0}")]
  NotFound(i64),
}

impl Classify for Error {
  fn kind(&self) -> FailureKind {
    match self {
      Self::ConstraintViolation { .. } => FailureKind::ConstraintViolation,
      Self::NotFound(_) => FailureKind::NotFound,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
