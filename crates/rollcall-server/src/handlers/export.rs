//! `GET /api/export` — every attendance event as a CSV attachment.

use axum::{
  extract::State,
  http::{StatusCode, header},
  response::{IntoResponse, Response},
};
use chrono::Utc;
use rollcall_core::{
  attendance::{AttendanceQuery, AttendanceRecord},
  store::AttendanceStore,
};

use crate::{AppState, error::ApiError};

pub async fn handler<S>(State(state): State<AppState<S>>) -> Result<Response, ApiError>
where
  S: AttendanceStore + Clone,
{
  let records = state
    .store
    .list_attendance(&AttendanceQuery::default())
    .await
    .map_err(ApiError::store)?;

  let csv = to_csv(&records)?;
  let filename = format!("attendance_{}.csv", Utc::now().format("%Y%m%d_%H%M%S"));

  Ok(
    (
      StatusCode::OK,
      [
        (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
        (
          header::CONTENT_DISPOSITION,
          format!("attachment; filename=\"{filename}\""),
        ),
      ],
      csv,
    )
      .into_response(),
  )
}

fn to_csv(records: &[AttendanceRecord]) -> Result<Vec<u8>, ApiError> {
  let mut writer = csv::Writer::from_writer(Vec::new());
  if records.is_empty() {
    writer
      .write_record(HEADER)
      .map_err(|e| ApiError::Export(e.to_string()))?;
  }
  for record in records {
    writer
      .serialize(record)
      .map_err(|e| ApiError::Export(e.to_string()))?;
  }
  writer
    .into_inner()
    .map_err(|e| ApiError::Export(e.to_string()))
}

/// Column names, matching the field order of [`AttendanceRecord`].
const HEADER: [&str; 7] = [
  "log_id",
  "user_id",
  "full_name",
  "scan_time",
  "status",
  "course_code",
  "synced",
];

#[cfg(test)]
mod tests {
  use chrono::TimeZone as _;

  use super::*;

  #[test]
  fn empty_export_still_has_header() {
    let bytes = to_csv(&[]).unwrap();
    assert_eq!(
      String::from_utf8(bytes).unwrap(),
      "log_id,user_id,full_name,scan_time,status,course_code,synced\n"
    );
  }

  #[test]
  fn rows_follow_header() {
    let record = AttendanceRecord {
      log_id:      3,
      user_id:     1,
      full_name:   Some("Doe, Jane".to_string()),
      scan_time:   Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap(),
      status:      "present".to_string(),
      course_code: None,
      synced:      false,
    };
    let text = String::from_utf8(to_csv(&[record]).unwrap()).unwrap();
    let mut lines = text.lines();
    assert_eq!(
      lines.next(),
      Some("log_id,user_id,full_name,scan_time,status,course_code,synced")
    );
    assert_eq!(
      lines.next(),
      Some("3,1,\"Doe, Jane\",2024-05-01T08:30:00Z,present,,false")
    );
  }
}
