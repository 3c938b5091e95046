//! Encoding and decoding helpers between domain types and SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings with a fixed microsecond
//! precision and a `Z` suffix, so lexical order equals chronological order.

use chrono::{DateTime, SecondsFormat, Utc};
use rollcall_core::{
  attendance::AttendanceRecord,
  identity::Identity,
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

pub const USER_COLUMNS: &str =
  "user_id, full_name, role, template_pos, date_enrolled";

/// Raw values read directly from a `users` row.
pub struct RawIdentity {
  pub user_id:       i64,
  pub full_name:     String,
  pub role:          String,
  pub template_pos:  Option<u32>,
  pub date_enrolled: String,
}

impl RawIdentity {
  /// Row mapper for queries selecting [`USER_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:       row.get(0)?,
      full_name:     row.get(1)?,
      role:          row.get(2)?,
      template_pos:  row.get(3)?,
      date_enrolled: row.get(4)?,
    })
  }

  pub fn into_identity(self) -> Result<Identity> {
    Ok(Identity {
      user_id:       self.user_id,
      full_name:     self.full_name,
      role:          self.role,
      template_pos:  self.template_pos,
      date_enrolled: decode_dt(&self.date_enrolled)?,
    })
  }
}

/// Raw values read from an `attendance` row joined with `users`.
pub struct RawRecord {
  pub log_id:      i64,
  pub user_id:     i64,
  pub full_name:   Option<String>,
  pub scan_time:   String,
  pub status:      String,
  pub course_code: Option<String>,
  pub synced:      bool,
}

impl RawRecord {
  pub fn into_record(self) -> Result<AttendanceRecord> {
    Ok(AttendanceRecord {
      log_id:      self.log_id,
      user_id:     self.user_id,
      full_name:   self.full_name,
      scan_time:   decode_dt(&self.scan_time)?,
      status:      self.status,
      course_code: self.course_code,
      synced:      self.synced,
    })
  }
}
