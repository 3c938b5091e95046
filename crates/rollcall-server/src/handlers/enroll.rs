//! `POST /api/enroll` — body: `{"full_name":"Alice","role":"student"}`

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use bytes::Bytes;
use rollcall_core::store::AttendanceStore;
use serde_json::json;

use crate::{AppState, error::ApiError, handlers::parse_body, workflow};

pub async fn handler<S>(
  State(state): State<AppState<S>>,
  body: Bytes,
) -> Result<impl IntoResponse, ApiError>
where
  S: AttendanceStore + Clone,
{
  let identity = workflow::enroll(&state, parse_body(&body)?).await?;
  Ok((
    StatusCode::CREATED,
    Json(json!({
      "success": true,
      "user_id": identity.user_id,
      "template_pos": identity.template_pos,
      "full_name": identity.full_name,
    })),
  ))
}
