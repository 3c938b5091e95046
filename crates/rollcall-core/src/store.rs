//! The `AttendanceStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `rollcall-store-sqlite`).
//! The server crate depends on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  attendance::{AttendanceEvent, AttendanceQuery, AttendanceRecord, NewAttendance},
  identity::{Identity, NewIdentity},
};

/// Abstraction over a Rollcall persistence backend.
///
/// Both record types are append-only: the only in-place change the store
/// supports is assigning a template slot to an identity that has none.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait AttendanceStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Identities ────────────────────────────────────────────────────────

  /// Persist a new identity. Fails if `template_pos` is already taken.
  fn add_identity(
    &self,
    input: NewIdentity,
  ) -> impl Future<Output = Result<Identity, Self::Error>> + Send + '_;

  /// Retrieve an identity by id. Returns `None` if not found.
  fn get_identity(
    &self,
    user_id: i64,
  ) -> impl Future<Output = Result<Option<Identity>, Self::Error>> + Send + '_;

  /// Retrieve the identity linked to a sensor template slot.
  fn find_by_slot(
    &self,
    slot: u32,
  ) -> impl Future<Output = Result<Option<Identity>, Self::Error>> + Send + '_;

  /// List all identities ordered by name.
  fn list_identities(
    &self,
  ) -> impl Future<Output = Result<Vec<Identity>, Self::Error>> + Send + '_;

  /// Give an identity without a slot the next free one above both the
  /// highest assigned slot and `floor`.
  ///
  /// An identity that already has a slot is returned unchanged. Returns
  /// `None` if the identity does not exist.
  fn assign_slot(
    &self,
    user_id: i64,
    floor: u32,
  ) -> impl Future<Output = Result<Option<Identity>, Self::Error>> + Send + '_;

  // ── Attendance ────────────────────────────────────────────────────────

  /// Append an attendance event. The referenced identity must exist.
  fn record_attendance(
    &self,
    input: NewAttendance,
  ) -> impl Future<Output = Result<AttendanceEvent, Self::Error>> + Send + '_;

  /// List events joined with identity names, newest first.
  fn list_attendance<'a>(
    &'a self,
    query: &'a AttendanceQuery,
  ) -> impl Future<Output = Result<Vec<AttendanceRecord>, Self::Error>> + Send + 'a;
}
