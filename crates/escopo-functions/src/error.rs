//! Callable error type and [`axum::response::IntoResponse`] implementation.
//!
//! Errors travel in the callable envelope
//! `{"error": {"status": "PERMISSION_DENIED", "message": "..."}}`.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by a callable. The message is shown to the caller.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CallableError {
  #[error("unauthenticated: {0}")]
  Unauthenticated(String),

  #[error("permission denied: {0}")]
  PermissionDenied(String),

  #[error("invalid argument: {0}")]
  InvalidArgument(String),

  #[error("internal: {0}")]
  Internal(String),
}

impl CallableError {
  /// Stable wire code.
  pub fn status(&self) -> &'static str {
    match self {
      CallableError::Unauthenticated(_) => "UNAUTHENTICATED",
      CallableError::PermissionDenied(_) => "PERMISSION_DENIED",
      CallableError::InvalidArgument(_) => "INVALID_ARGUMENT",
      CallableError::Internal(_) => "INTERNAL",
    }
  }

  pub fn http_status(&self) -> StatusCode {
    match self {
      CallableError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
      CallableError::PermissionDenied(_) => StatusCode::FORBIDDEN,
      CallableError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
      CallableError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  pub fn message(&self) -> &str {
    match self {
      CallableError::Unauthenticated(m)
      | CallableError::PermissionDenied(m)
      | CallableError::InvalidArgument(m)
      | CallableError::Internal(m) => m,
    }
  }
}

impl IntoResponse for CallableError {
  fn into_response(self) -> Response {
    let body = json!({
      "error": { "status": self.status(), "message": self.message() }
    });
    (self.http_status(), Json(body)).into_response()
  }
}
