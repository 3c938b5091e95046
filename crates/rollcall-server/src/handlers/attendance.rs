//! Handlers for `/attendance` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/attendance` | Newest first; optional `?limit=` (max 500) |
//! | `POST` | `/attendance` | Body: `{"user_id":1,"status":"late","course_code":"CS101"}` |
//! | `GET`  | `/attendance/:user_id` | 404 if the identity does not exist |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use bytes::Bytes;
use rollcall_core::{
  attendance::{AttendanceEvent, AttendanceQuery},
  store::AttendanceStore,
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
  AppState,
  error::ApiError,
  handlers::{parse_body, parse_user_id},
  workflow,
};

/// The `201` body returned whenever an event is created without the sensor.
pub(crate) fn marked(event: &AttendanceEvent) -> Response {
  let body = json!({
    "success": true,
    "message": "Attendance marked",
    "log_id": event.log_id,
  });
  (StatusCode::CREATED, Json(body)).into_response()
}

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub limit: Option<usize>,
}

/// `GET /attendance[?limit=<n>]`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Value>, ApiError>
where
  S: AttendanceStore + Clone,
{
  let records = state
    .store
    .list_attendance(&AttendanceQuery::recent(params.limit))
    .await
    .map_err(ApiError::store)?;
  Ok(Json(json!({ "success": true, "records": records })))
}

// ─── Mark ─────────────────────────────────────────────────────────────────────

/// `POST /attendance`
pub async fn mark<S>(
  State(state): State<AppState<S>>,
  body: Bytes,
) -> Result<Response, ApiError>
where
  S: AttendanceStore + Clone,
{
  let event = workflow::mark_attendance(&state, parse_body(&body)?).await?;
  Ok(marked(&event))
}

// ─── Per identity ─────────────────────────────────────────────────────────────

/// `GET /attendance/:user_id`
pub async fn for_user<S>(
  State(state): State<AppState<S>>,
  Path(user_id): Path<String>,
) -> Result<Json<Value>, ApiError>
where
  S: AttendanceStore + Clone,
{
  let user_id = parse_user_id(&user_id)?;
  let user = state
    .store
    .get_identity(user_id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound("user not found".to_string()))?;

  let records = state
    .store
    .list_attendance(&AttendanceQuery::for_user(user_id))
    .await
    .map_err(ApiError::store)?;

  Ok(Json(json!({ "success": true, "user": user, "records": records })))
}
