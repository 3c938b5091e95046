//! Enrollment, identification and manual marking.
//!
//! Each workflow runs the sensor half (see [`rollcall_core::capture`]) on the
//! [`Device`](crate::device::Device) and then persists the outcome through the
//! store. Nothing here is transactional across the two: a template stored on
//! the sensor stays there even if the identity row cannot be written.

use rollcall_core::{
  attendance::{AttendanceEvent, DEFAULT_COURSE_CODE, DEFAULT_STATUS, NewAttendance},
  capture,
  identity::{DEFAULT_ROLE, Identity, NewIdentity},
  sensor::TemplateMatch,
  store::AttendanceStore,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::{AppState, error::ApiError};

// ─── Requests ─────────────────────────────────────────────────────────────────

/// Body of `POST /api/enroll` and `POST /api/users`.
#[derive(Debug, Default, Deserialize)]
pub struct EnrollRequest {
  pub full_name: Option<String>,
  pub role:      Option<String>,
}

impl EnrollRequest {
  fn into_new_identity(self) -> Result<NewIdentity, ApiError> {
    let full_name = self
      .full_name
      .as_deref()
      .map(str::trim)
      .filter(|n| !n.is_empty())
      .ok_or_else(|| ApiError::Validation("full_name required".to_string()))?;

    let role = self
      .role
      .as_deref()
      .map(str::trim)
      .filter(|r| !r.is_empty())
      .unwrap_or(DEFAULT_ROLE);

    Ok(NewIdentity::new(full_name).with_role(role))
  }
}

/// Body of `POST /api/identify` and `POST /api/attendance`.
#[derive(Debug, Default, Deserialize)]
pub struct AttendanceRequest {
  pub user_id:     Option<Value>,
  /// Older clients name the identity `student_id`.
  pub student_id:  Option<Value>,
  pub status:      Option<String>,
  pub course_code: Option<String>,
}

impl AttendanceRequest {
  /// The identity the caller named, if any. Accepts integers and numeric
  /// strings.
  pub fn user_ref(&self) -> Result<Option<i64>, ApiError> {
    let invalid = || ApiError::Validation("user_id must be an integer".to_string());

    // Null and blank values fall through to the next field.
    let value = [&self.user_id, &self.student_id]
      .into_iter()
      .flatten()
      .find(|v| match v {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
      });

    match value {
      None => Ok(None),
      Some(Value::Number(n)) => n.as_i64().map(Some).ok_or_else(invalid),
      Some(Value::String(s)) => s.trim().parse().map(Some).map_err(|_| invalid()),
      Some(_) => Err(invalid()),
    }
  }
}

/// Outcome of a successful sensor identification.
#[derive(Debug)]
pub struct Identified {
  pub identity: Identity,
  pub hit:      TemplateMatch,
  pub event:    AttendanceEvent,
}

// ─── Enrollment ───────────────────────────────────────────────────────────────

/// Capture a finger twice, store the fused template, and persist the identity
/// linked to its slot.
pub async fn enroll<S>(
  state: &AppState<S>,
  request: EnrollRequest,
) -> Result<Identity, ApiError>
where
  S: AttendanceStore,
{
  let input = request.into_new_identity()?;
  let device = state.device()?;

  info!(full_name = %input.full_name, "enrollment started");
  let slot = device
    .run(|sensor, policy| capture::enroll_finger(sensor, policy))
    .await?;

  match state.store.add_identity(input.with_slot(slot)).await {
    Ok(identity) => {
      info!(user_id = identity.user_id, slot, "fingerprint enrolled");
      Ok(identity)
    }
    Err(e) => {
      warn!(slot, error = %e, "template stored on sensor but identity not saved");
      Err(ApiError::store(e))
    }
  }
}

/// Register an identity without touching the sensor.
pub async fn register<S>(
  state: &AppState<S>,
  request: EnrollRequest,
) -> Result<Identity, ApiError>
where
  S: AttendanceStore,
{
  let input = request.into_new_identity()?;
  let identity = state.store.add_identity(input).await.map_err(ApiError::store)?;
  info!(user_id = identity.user_id, "identity registered without fingerprint");
  Ok(identity)
}

/// Give an identity the next free template slot without a sensor handshake.
///
/// With a sensor attached, offline slots are numbered above its capacity so
/// they never collide with a slot the sensor hands out during enrollment.
pub async fn assign_slot<S>(
  state: &AppState<S>,
  user_id: i64,
) -> Result<Identity, ApiError>
where
  S: AttendanceStore,
{
  let floor = match &state.device {
    Some(device) => {
      device
        .run(|sensor, _| Ok(sensor.storage_capacity()?))
        .await?
    }
    None => 0,
  };

  let identity = state
    .store
    .assign_slot(user_id, floor)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound("user not found".to_string()))?;
  info!(user_id, slot = ?identity.template_pos, "template position assigned offline");
  Ok(identity)
}

// ─── Identification ───────────────────────────────────────────────────────────

/// Scan a finger, resolve its slot to an identity, and log attendance.
pub async fn identify<S>(
  state: &AppState<S>,
  course_code: Option<String>,
) -> Result<Identified, ApiError>
where
  S: AttendanceStore,
{
  let device = state.device()?;
  let hit = device
    .run(|sensor, policy| capture::scan_finger(sensor, policy))
    .await?;

  let Some(identity) = state
    .store
    .find_by_slot(hit.slot)
    .await
    .map_err(ApiError::store)?
  else {
    warn!(slot = hit.slot, "sensor matched a template with no linked identity");
    return Err(ApiError::OrphanedTemplate(hit.slot));
  };

  let course_code = course_code
    .filter(|c| !c.trim().is_empty())
    .unwrap_or_else(|| DEFAULT_COURSE_CODE.to_string());

  let event = state
    .store
    .record_attendance(
      NewAttendance::present(identity.user_id).with_course_code(course_code),
    )
    .await
    .map_err(ApiError::store)?;

  info!(
    user_id = identity.user_id,
    slot = hit.slot,
    accuracy = hit.accuracy,
    "fingerprint identified"
  );
  Ok(Identified { identity, hit, event })
}

/// Log attendance for an identity named by the caller, bypassing the sensor.
pub async fn mark_attendance<S>(
  state: &AppState<S>,
  request: AttendanceRequest,
) -> Result<AttendanceEvent, ApiError>
where
  S: AttendanceStore,
{
  let user_id = request.user_ref()?.ok_or_else(|| {
    ApiError::Validation("user_id (or student_id) required".to_string())
  })?;

  state
    .store
    .get_identity(user_id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound("user not found".to_string()))?;

  let input = NewAttendance {
    user_id,
    scan_time: None,
    status: request.status.unwrap_or_else(|| DEFAULT_STATUS.to_string()),
    course_code: request.course_code,
  };
  let event = state
    .store
    .record_attendance(input)
    .await
    .map_err(ApiError::store)?;

  info!(user_id, log_id = event.log_id, "attendance marked manually");
  Ok(event)
}
