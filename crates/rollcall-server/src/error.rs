//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every failure is rendered as `{"success": false, "error": <message>}`.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use rollcall_core::error::Awaiting;
use serde_json::json;
use thiserror::Error;

/// An error returned by a workflow or handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("{0}")]
  Validation(String),

  #[error("Timeout waiting for {0}")]
  Timeout(Awaiting),

  #[error("Fingerprint already enrolled at position {0}")]
  DuplicateEnrollment(u32),

  #[error("Fingerprint not recognized")]
  NotRecognized,

  /// The sensor matched a slot no identity is linked to.
  #[error("No user linked to template position {0}")]
  OrphanedTemplate(u32),

  #[error("{0}")]
  NotFound(String),

  #[error("Fingerprint sensor busy")]
  SensorBusy,

  #[error("Fingerprint sensor unavailable")]
  SensorUnavailable,

  #[error("{0}")]
  Adapter(String),

  #[error("{0}")]
  Persistence(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("export failed: {0}")]
  Export(String),
}

impl ApiError {
  /// Wrap a store backend error.
  pub fn store(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Persistence(Box::new(e))
  }

  pub fn status(&self) -> StatusCode {
    match self {
      Self::Validation(_) => StatusCode::BAD_REQUEST,
      Self::Timeout(_) => StatusCode::REQUEST_TIMEOUT,
      Self::DuplicateEnrollment(_) => StatusCode::CONFLICT,
      Self::NotRecognized | Self::OrphanedTemplate(_) | Self::NotFound(_) => {
        StatusCode::NOT_FOUND
      }
      Self::SensorBusy => StatusCode::SERVICE_UNAVAILABLE,
      Self::SensorUnavailable
      | Self::Adapter(_)
      | Self::Persistence(_)
      | Self::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl From<rollcall_core::Error> for ApiError {
  fn from(e: rollcall_core::Error) -> Self {
    use rollcall_core::Error;
    match e {
      Error::Timeout(awaiting) => Self::Timeout(awaiting),
      Error::AlreadyEnrolled { slot } => Self::DuplicateEnrollment(slot),
      Error::NotRecognized => Self::NotRecognized,
      Error::Sensor(e) => Self::Adapter(e.to_string()),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      tracing::error!(error = %self, "request failed");
    }
    let body = json!({ "success": false, "error": self.to_string() });
    (status, Json(body)).into_response()
  }
}
