//! `GET /api/sensor/test` — adapter diagnostics.

use axum::{Json, extract::State};
use rollcall_core::store::AttendanceStore;
use serde_json::{Value, json};

use crate::{AppState, error::ApiError};

pub async fn test<S>(State(state): State<AppState<S>>) -> Result<Json<Value>, ApiError>
where
  S: AttendanceStore + Clone,
{
  let info = state
    .device()?
    .run(|sensor, _| Ok(sensor.storage_info()?))
    .await?;
  Ok(Json(json!({
    "success": true,
    "templates_stored": info.templates_stored,
    "storage_capacity": info.storage_capacity,
  })))
}
