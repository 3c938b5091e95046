//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{Duration, Utc};
use rollcall_core::{
  attendance::{AttendanceQuery, NewAttendance},
  identity::{DEFAULT_ROLE, NewIdentity},
  store::AttendanceStore,
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

// ─── Identities ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_identity() {
  let s = store().await;

  let alice = s
    .add_identity(NewIdentity::new("Alice").with_slot(1))
    .await
    .unwrap();
  assert_eq!(alice.role, DEFAULT_ROLE);
  assert_eq!(alice.template_pos, Some(1));

  let fetched = s.get_identity(alice.user_id).await.unwrap();
  assert_eq!(fetched, Some(alice));
}

#[tokio::test]
async fn get_identity_missing_returns_none() {
  let s = store().await;
  assert!(s.get_identity(42).await.unwrap().is_none());
}

#[tokio::test]
async fn find_by_slot_resolves_identity() {
  let s = store().await;
  s.add_identity(NewIdentity::new("Alice").with_slot(1)).await.unwrap();
  let bob = s
    .add_identity(NewIdentity::new("Bob").with_role("staff").with_slot(2))
    .await
    .unwrap();

  let found = s.find_by_slot(2).await.unwrap().unwrap();
  assert_eq!(found.user_id, bob.user_id);
  assert_eq!(found.role, "staff");
  assert!(s.find_by_slot(3).await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_slot_is_rejected() {
  let s = store().await;
  s.add_identity(NewIdentity::new("Alice").with_slot(1)).await.unwrap();

  let err = s
    .add_identity(NewIdentity::new("Mallory").with_slot(1))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::SlotTaken(1)), "{err:?}");
  assert_eq!(s.list_identities().await.unwrap().len(), 1);
}

#[tokio::test]
async fn identities_without_slot_do_not_conflict() {
  let s = store().await;
  s.add_identity(NewIdentity::new("Alice")).await.unwrap();
  s.add_identity(NewIdentity::new("Bob")).await.unwrap();
  assert_eq!(s.list_identities().await.unwrap().len(), 2);
}

#[tokio::test]
async fn list_identities_is_ordered_by_name() {
  let s = store().await;
  s.add_identity(NewIdentity::new("carol")).await.unwrap();
  s.add_identity(NewIdentity::new("Alice")).await.unwrap();
  s.add_identity(NewIdentity::new("Bob")).await.unwrap();

  let names: Vec<_> = s
    .list_identities()
    .await
    .unwrap()
    .into_iter()
    .map(|i| i.full_name)
    .collect();
  assert_eq!(names, ["Alice", "Bob", "carol"]);
}

// ─── Slot assignment ─────────────────────────────────────────────────────────

#[tokio::test]
async fn assign_slot_takes_next_after_max() {
  let s = store().await;
  s.add_identity(NewIdentity::new("Alice").with_slot(4)).await.unwrap();
  let bob = s.add_identity(NewIdentity::new("Bob")).await.unwrap();

  let assigned = s.assign_slot(bob.user_id, 0).await.unwrap().unwrap();
  assert_eq!(assigned.template_pos, Some(5));
  assert_eq!(s.find_by_slot(5).await.unwrap().unwrap().user_id, bob.user_id);
}

#[tokio::test]
async fn assign_slot_starts_at_one() {
  let s = store().await;
  let alice = s.add_identity(NewIdentity::new("Alice")).await.unwrap();
  let assigned = s.assign_slot(alice.user_id, 0).await.unwrap().unwrap();
  assert_eq!(assigned.template_pos, Some(1));
}

#[tokio::test]
async fn assign_slot_keeps_existing_slot() {
  let s = store().await;
  let alice = s
    .add_identity(NewIdentity::new("Alice").with_slot(9))
    .await
    .unwrap();
  let again = s.assign_slot(alice.user_id, 0).await.unwrap().unwrap();
  assert_eq!(again.template_pos, Some(9));
}

#[tokio::test]
async fn assign_slot_starts_above_floor() {
  let s = store().await;
  s.add_identity(NewIdentity::new("Alice").with_slot(3)).await.unwrap();
  let bob = s.add_identity(NewIdentity::new("Bob")).await.unwrap();
  let carol = s.add_identity(NewIdentity::new("Carol")).await.unwrap();

  let bob = s.assign_slot(bob.user_id, 1000).await.unwrap().unwrap();
  assert_eq!(bob.template_pos, Some(1001));

  // Slots already above the floor keep counting up from the maximum.
  let carol = s.assign_slot(carol.user_id, 1000).await.unwrap().unwrap();
  assert_eq!(carol.template_pos, Some(1002));
}

#[tokio::test]
async fn assign_slot_missing_identity_returns_none() {
  let s = store().await;
  assert!(s.assign_slot(7, 0).await.unwrap().is_none());
}

// ─── Attendance ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn record_attendance_defaults() {
  let s = store().await;
  let alice = s.add_identity(NewIdentity::new("Alice")).await.unwrap();

  let before = Utc::now() - Duration::seconds(1);
  let event = s
    .record_attendance(NewAttendance::present(alice.user_id))
    .await
    .unwrap();
  assert_eq!(event.status, "present");
  assert!(!event.synced);
  assert!(event.course_code.is_none());
  assert!(event.scan_time >= before);

  let records = s.list_attendance(&AttendanceQuery::default()).await.unwrap();
  assert_eq!(records.len(), 1);
  assert_eq!(records[0].log_id, event.log_id);
  assert_eq!(records[0].full_name.as_deref(), Some("Alice"));
  assert_eq!(records[0].scan_time, event.scan_time);
}

#[tokio::test]
async fn record_attendance_for_missing_identity_fails() {
  let s = store().await;
  let err = s
    .record_attendance(NewAttendance::present(99))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::UserNotFound(99)), "{err:?}");
  assert!(s.list_attendance(&AttendanceQuery::default()).await.unwrap().is_empty());
}

#[tokio::test]
async fn log_ids_increase_monotonically() {
  let s = store().await;
  let alice = s.add_identity(NewIdentity::new("Alice")).await.unwrap();

  let first = s.record_attendance(NewAttendance::present(alice.user_id)).await.unwrap();
  let second = s.record_attendance(NewAttendance::present(alice.user_id)).await.unwrap();
  assert!(second.log_id > first.log_id);
}

#[tokio::test]
async fn list_attendance_newest_first_and_filtered() {
  let s = store().await;
  let alice = s.add_identity(NewIdentity::new("Alice")).await.unwrap();
  let bob = s.add_identity(NewIdentity::new("Bob")).await.unwrap();
  let now = Utc::now();

  for (user_id, minutes_ago, course) in [
    (alice.user_id, 30, "CS101"),
    (bob.user_id, 20, "CS101"),
    (alice.user_id, 10, "MA201"),
  ] {
    let mut input = NewAttendance::present(user_id).with_course_code(course);
    input.scan_time = Some(now - Duration::minutes(minutes_ago));
    s.record_attendance(input).await.unwrap();
  }

  let all = s.list_attendance(&AttendanceQuery::default()).await.unwrap();
  assert_eq!(all.len(), 3);
  assert!(all.windows(2).all(|w| w[0].scan_time >= w[1].scan_time));

  let alices = s
    .list_attendance(&AttendanceQuery::for_user(alice.user_id))
    .await
    .unwrap();
  assert_eq!(alices.len(), 2);
  assert!(alices.iter().all(|r| r.user_id == alice.user_id));
  assert_eq!(alices[0].course_code.as_deref(), Some("MA201"));
  assert_eq!(alices[1].course_code.as_deref(), Some("CS101"));
}

#[tokio::test]
async fn list_attendance_respects_limit() {
  let s = store().await;
  let alice = s.add_identity(NewIdentity::new("Alice")).await.unwrap();
  for _ in 0..5 {
    s.record_attendance(NewAttendance::present(alice.user_id)).await.unwrap();
  }

  let page = s
    .list_attendance(&AttendanceQuery::recent(Some(2)))
    .await
    .unwrap();
  assert_eq!(page.len(), 2);
  assert!(page[0].log_id > page[1].log_id);
}
