//! `POST /api/identify`
//!
//! With an empty body (or only `course_code`) the sensor is scanned. A body
//! naming `user_id` skips the sensor and marks attendance directly, for use
//! without hardware.

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use bytes::Bytes;
use rollcall_core::store::AttendanceStore;
use serde_json::json;

use crate::{
  AppState,
  error::ApiError,
  handlers::{attendance::marked, parse_body},
  workflow::{self, AttendanceRequest},
};

pub async fn handler<S>(
  State(state): State<AppState<S>>,
  body: Bytes,
) -> Result<Response, ApiError>
where
  S: AttendanceStore + Clone,
{
  let request: AttendanceRequest = parse_body(&body)?;

  if request.user_ref()?.is_some() {
    let event = workflow::mark_attendance(&state, request).await?;
    return Ok(marked(&event));
  }

  let found = workflow::identify(&state, request.course_code).await?;
  let body = json!({
    "success": true,
    "user": {
      "user_id": found.identity.user_id,
      "full_name": found.identity.full_name,
      "role": found.identity.role,
    },
    "accuracy": found.hit.accuracy,
    "scan_time": found.event.scan_time,
  });
  Ok((StatusCode::OK, Json(body)).into_response())
}
