//! HTTP layer for Rollcall.
//!
//! Exposes an axum [`Router`] serving the JSON API under `/api`, backed by any
//! [`AttendanceStore`] and an optional fingerprint [`Device`].

pub mod config;
pub mod device;
pub mod error;
pub mod handlers;
pub mod workflow;

pub use self::config::{SensorConfig, SensorKind, ServerConfig};
pub use device::Device;
pub use error::ApiError;

use std::{any::Any, sync::Arc};

use axum::{
  Json, Router,
  http::StatusCode,
  response::{IntoResponse, Response},
  routing::{get, post},
};
use rollcall_core::store::AttendanceStore;
use serde_json::json;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use handlers::{attendance, enroll, export, health, identify, sensor, users};

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: AttendanceStore> {
  pub store:  Arc<S>,
  /// `None` when no sensor is attached or it failed to initialise.
  pub device: Option<Device>,
}

impl<S: AttendanceStore> AppState<S> {
  pub fn new(store: S, device: Option<Device>) -> Self {
    Self { store: Arc::new(store), device }
  }

  /// The attached sensor, or [`ApiError::SensorUnavailable`].
  pub fn device(&self) -> Result<&Device, ApiError> {
    self.device.as_ref().ok_or(ApiError::SensorUnavailable)
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the axum [`Router`] for the attendance API.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: AttendanceStore + Clone + 'static,
{
  let api = Router::new()
    .route("/health",                 get(health::handler))
    .route("/users",                  get(users::list::<S>).post(users::register::<S>))
    .route("/users/{user_id}/enroll", post(users::assign_slot::<S>))
    .route("/enroll",                 post(enroll::handler::<S>))
    .route("/identify",               post(identify::handler::<S>))
    .route("/attendance",             get(attendance::list::<S>).post(attendance::mark::<S>))
    .route("/attendance/{user_id}",   get(attendance::for_user::<S>))
    .route("/sensor/test",            get(sensor::test::<S>))
    .route("/export",                 get(export::handler::<S>))
    .method_not_allowed_fallback(method_not_allowed);

  Router::new()
    .nest("/api", api)
    .fallback(not_found)
    .layer(CatchPanicLayer::custom(internal_error))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

async fn not_found() -> Response {
  let body = json!({ "success": false, "error": "Endpoint not found" });
  (StatusCode::NOT_FOUND, Json(body)).into_response()
}

async fn method_not_allowed() -> Response {
  let body = json!({ "success": false, "error": "Method not allowed" });
  (StatusCode::METHOD_NOT_ALLOWED, Json(body)).into_response()
}

fn internal_error(_panic: Box<dyn Any + Send + 'static>) -> Response {
  tracing::error!("handler panicked");
  let body = json!({ "success": false, "error": "Internal server error" });
  (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}

// ─── Integration tests ────────────────────────────────────────────────────────
