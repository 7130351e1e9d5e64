//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use roster_core::store::{Classify, FailureKind};
use thiserror::Error;

use crate::envelope;

/// An error returned by an API handler. Always rendered as an
/// `{"status": "error", "message": ...}` body.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("{0}")]
  ConstraintViolation(String),

  #[error("{0}")]
  NotFound(String),

  #[error("{0}")]
  MalformedRequest(String),

  #[error("{0}")]
  ConnectionFailure(String),

  #[error("{message}")]
  Store {
    message: String,
    #[source]
    source:  Box<dyn std::error::Error + Send + Sync>,
  },
}

impl ApiError {
  /// Classify a store failure for the user. `action` completes the sentence
  /// "Failed to ..."; `id` names the targeted record, if any.
  pub fn store<E>(action: &str, id: Option<i64>, e: E) -> Self
  where
    E: std::error::Error + Classify + Send + Sync + 'static,
  {
    match e.kind() {
      FailureKind::ConstraintViolation => {
        Self::ConstraintViolation("Last name and first name are required".into())
      }
      FailureKind::NotFound => Self::NotFound(match id {
        Some(id) => format!("User {id} not found"),
        None => "User not found".into(),
      }),
      FailureKind::MalformedRequest => Self::MalformedRequest(e.to_string()),
      FailureKind::ConnectionFailure => {
        tracing::error!(error = %e, "failed to {action}: store unavailable");
        Self::ConnectionFailure(format!("Failed to {action}: database unavailable"))
      }
      FailureKind::Backend => {
        tracing::error!(error = %e, "failed to {action}");
        Self::Store {
          message: format!("Failed to {action}"),
          source:  Box::new(e),
        }
      }
    }
  }

  pub fn status(&self) -> StatusCode {
    match self {
      Self::ConstraintViolation(_) | Self::MalformedRequest(_) => StatusCode::BAD_REQUEST,
      Self::NotFound(_) => StatusCode::NOT_FOUND,
      Self::ConnectionFailure(_) => StatusCode::SERVICE_UNAVAILABLE,
      Self::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    (self.status(), Json(envelope::error(&self.to_string()))).into_response()
  }
}
