//! [`SqliteStore`] — the SQLite implementation of [`AttendanceStore`].

use std::path::Path;

use chrono::{SubsecRound as _, Utc};
use rusqlite::OptionalExtension as _;

use rollcall_core::{
  attendance::{
    AttendanceEvent, AttendanceQuery, AttendanceRecord, NewAttendance,
  },
  identity::{Identity, NewIdentity},
  store::AttendanceStore,
};

use crate::{
  Error, Result,
  encode::{RawIdentity, RawRecord, USER_COLUMNS, encode_dt},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Rollcall attendance store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Fetch a single `users` row matching `column = value`.
  async fn get_identity_where(
    &self,
    column: &'static str,
    value: i64,
  ) -> Result<Option<Identity>> {
    let raw: Option<RawIdentity> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE {column} = ?1"),
            rusqlite::params![value],
            RawIdentity::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawIdentity::into_identity).transpose()
  }
}

/// `true` if the database rejected a write because of a UNIQUE, NOT NULL or
/// FOREIGN KEY constraint.
fn is_constraint_violation(err: &tokio_rusqlite::Error) -> bool {
  matches!(
    err,
    tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(e, _))
      if e.code == rusqlite::ErrorCode::ConstraintViolation
  )
}

// ─── AttendanceStore impl ────────────────────────────────────────────────────

impl AttendanceStore for SqliteStore {
  type Error = Error;

  // ── Identities ────────────────────────────────────────────────────────────

  async fn add_identity(&self, input: NewIdentity) -> Result<Identity> {
    let date_enrolled = Utc::now().trunc_subsecs(6);

    let name     = input.full_name.clone();
    let role     = input.role.clone();
    let slot     = input.template_pos;
    let at_str   = encode_dt(date_enrolled);

    let user_id: i64 = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (full_name, role, template_pos, date_enrolled)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![name, role, slot, at_str],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await
      .map_err(|e| match slot {
        Some(slot) if is_constraint_violation(&e) => Error::SlotTaken(slot),
        _ => Error::Database(e),
      })?;

    Ok(Identity {
      user_id,
      full_name: input.full_name,
      role: input.role,
      template_pos: input.template_pos,
      date_enrolled,
    })
  }

  async fn get_identity(&self, user_id: i64) -> Result<Option<Identity>> {
    self.get_identity_where("user_id", user_id).await
  }

  async fn find_by_slot(&self, slot: u32) -> Result<Option<Identity>> {
    self.get_identity_where("template_pos", i64::from(slot)).await
  }

  async fn list_identities(&self) -> Result<Vec<Identity>> {
    let raws: Vec<RawIdentity> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {USER_COLUMNS} FROM users
           ORDER BY full_name COLLATE NOCASE, user_id"
        ))?;
        let rows = stmt
          .query_map([], RawIdentity::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawIdentity::into_identity).collect()
  }

  async fn assign_slot(&self, user_id: i64, floor: u32) -> Result<Option<Identity>> {
    let raw: Option<RawIdentity> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let Some(mut raw) = tx
          .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = ?1"),
            rusqlite::params![user_id],
            RawIdentity::from_row,
          )
          .optional()?
        else {
          return Ok(None);
        };

        if raw.template_pos.is_none() {
          let max: Option<u32> = tx.query_row(
            "SELECT MAX(template_pos) FROM users",
            [],
            |r| r.get(0),
          )?;
          let slot = max.unwrap_or(0).max(floor) + 1;
          tx.execute(
            "UPDATE users SET template_pos = ?1 WHERE user_id = ?2",
            rusqlite::params![slot, user_id],
          )?;
          raw.template_pos = Some(slot);
        }

        tx.commit()?;
        Ok(Some(raw))
      })
      .await?;

    raw.map(RawIdentity::into_identity).transpose()
  }

  // ── Attendance ────────────────────────────────────────────────────────────

  async fn record_attendance(&self, input: NewAttendance) -> Result<AttendanceEvent> {
    let scan_time = input
      .scan_time
      .unwrap_or_else(Utc::now)
      .trunc_subsecs(6);

    let user_id     = input.user_id;
    let at_str      = encode_dt(scan_time);
    let status      = input.status.clone();
    let course_code = input.course_code.clone();

    let log_id: Option<i64> = self
      .conn
      .call(move |conn| {
        let exists: bool = conn
          .query_row(
            "SELECT 1 FROM users WHERE user_id = ?1",
            rusqlite::params![user_id],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);

        if !exists {
          return Ok(None);
        }

        conn.execute(
          "INSERT INTO attendance (user_id, scan_time, status, course_code, synced)
           VALUES (?1, ?2, ?3, ?4, 0)",
          rusqlite::params![user_id, at_str, status, course_code],
        )?;
        Ok(Some(conn.last_insert_rowid()))
      })
      .await?;

    let log_id = log_id.ok_or(Error::UserNotFound(user_id))?;

    Ok(AttendanceEvent {
      log_id,
      user_id,
      scan_time,
      status: input.status,
      course_code: input.course_code,
      synced: false,
    })
  }

  async fn list_attendance(
    &self,
    query: &AttendanceQuery,
  ) -> Result<Vec<AttendanceRecord>> {
    let user_id = query.user_id;
    // SQLite treats a negative LIMIT as "no limit".
    let limit   = query.limit.map_or(-1, |n| n as i64);

    let raws: Vec<RawRecord> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT
             a.log_id, a.user_id, u.full_name, a.scan_time,
             a.status, a.course_code, a.synced
           FROM attendance a
           LEFT JOIN users u ON u.user_id = a.user_id
           WHERE ?1 IS NULL OR a.user_id = ?1
           ORDER BY a.scan_time DESC, a.log_id DESC
           LIMIT ?2",
        )?;

        let rows = stmt
          .query_map(rusqlite::params![user_id, limit], |row| {
            Ok(RawRecord {
              log_id:      row.get(0)?,
              user_id:     row.get(1)?,
              full_name:   row.get(2)?,
              scan_time:   row.get(3)?,
              status:      row.get(4)?,
              course_code: row.get(5)?,
              synced:      row.get(6)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRecord::into_record).collect()
  }
}
