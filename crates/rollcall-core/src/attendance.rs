//! Attendance events — immutable presence records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status recorded when the caller does not supply one.
pub const DEFAULT_STATUS: &str = "present";

/// Course code recorded by the identification workflow when none is given.
pub const DEFAULT_COURSE_CODE: &str = "N/A";

/// Upper bound on the number of events returned by a listing.
pub const MAX_PAGE_SIZE: usize = 500;

/// A persisted attendance event. Once written, no field is ever updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceEvent {
  pub log_id:      i64,
  pub user_id:     i64,
  pub scan_time:   DateTime<Utc>,
  pub status:      String,
  pub course_code: Option<String>,
  pub synced:      bool,
}

/// Input to [`crate::store::AttendanceStore::record_attendance`].
#[derive(Debug, Clone)]
pub struct NewAttendance {
  pub user_id:     i64,
  /// Defaults to the time of the write.
  pub scan_time:   Option<DateTime<Utc>>,
  pub status:      String,
  pub course_code: Option<String>,
}

impl NewAttendance {
  /// A "present" event for `user_id`, stamped at write time.
  pub fn present(user_id: i64) -> Self {
    Self {
      user_id,
      scan_time: None,
      status: DEFAULT_STATUS.to_owned(),
      course_code: None,
    }
  }

  pub fn with_course_code(mut self, code: impl Into<String>) -> Self {
    self.course_code = Some(code.into());
    self
  }
}

/// An attendance event joined with the name of the identity it references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
  pub log_id:      i64,
  pub user_id:     i64,
  pub full_name:   Option<String>,
  pub scan_time:   DateTime<Utc>,
  pub status:      String,
  pub course_code: Option<String>,
  pub synced:      bool,
}

/// Parameters for [`crate::store::AttendanceStore::list_attendance`].
///
/// Results are always ordered newest first.
#[derive(Debug, Clone, Default)]
pub struct AttendanceQuery {
  /// Restrict to the events of one identity.
  pub user_id: Option<i64>,
  /// Return at most this many events; `None` returns everything.
  pub limit:   Option<usize>,
}

impl AttendanceQuery {
  /// The most recent page of events across all identities.
  pub fn recent(limit: Option<usize>) -> Self {
    let limit = limit.unwrap_or(MAX_PAGE_SIZE).min(MAX_PAGE_SIZE);
    Self { user_id: None, limit: Some(limit) }
  }

  pub fn for_user(user_id: i64) -> Self {
    Self { user_id: Some(user_id), limit: None }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn recent_page_is_capped() {
    assert_eq!(AttendanceQuery::recent(None).limit, Some(MAX_PAGE_SIZE));
    assert_eq!(AttendanceQuery::recent(Some(20)).limit, Some(20));
    assert_eq!(AttendanceQuery::recent(Some(10_000)).limit, Some(MAX_PAGE_SIZE));
  }
}
