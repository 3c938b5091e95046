//! Handlers for `/users` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/users` | Ordered by name |
//! | `POST` | `/users` | Body: `{"full_name":"…","role":"staff"}`; no fingerprint |
//! | `POST` | `/users/:user_id/enroll` | Assigns the next free template slot |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use bytes::Bytes;
use rollcall_core::store::AttendanceStore;
use serde_json::{Value, json};

use crate::{
  AppState,
  error::ApiError,
  handlers::{parse_body, parse_user_id},
  workflow,
};

/// `GET /users`
pub async fn list<S>(State(state): State<AppState<S>>) -> Result<Json<Value>, ApiError>
where
  S: AttendanceStore + Clone,
{
  let users = state
    .store
    .list_identities()
    .await
    .map_err(ApiError::store)?;
  Ok(Json(json!({ "success": true, "users": users })))
}

/// `POST /users`
pub async fn register<S>(
  State(state): State<AppState<S>>,
  body: Bytes,
) -> Result<impl IntoResponse, ApiError>
where
  S: AttendanceStore + Clone,
{
  let user = workflow::register(&state, parse_body(&body)?).await?;
  Ok((StatusCode::CREATED, Json(json!({ "success": true, "user": user }))))
}

/// `POST /users/:user_id/enroll`
pub async fn assign_slot<S>(
  State(state): State<AppState<S>>,
  Path(user_id): Path<String>,
) -> Result<Json<Value>, ApiError>
where
  S: AttendanceStore + Clone,
{
  let user = workflow::assign_slot(&state, parse_user_id(&user_id)?).await?;
  Ok(Json(json!({
    "success": true,
    "message": "Template position assigned",
    "user_id": user.user_id,
    "template_pos": user.template_pos,
  })))
}
