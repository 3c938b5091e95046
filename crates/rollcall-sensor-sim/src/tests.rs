//! Workflow tests for the capture sequences against the simulated device.

use std::time::Duration;

use rollcall_core::{
  Error,
  capture::{PollPolicy, enroll_finger, scan_finger},
  error::Awaiting,
  sensor::{Buffer, Connection, Sensor, SensorError},
};

use crate::{Fingerprint, Reading, SimulatedSensor};

fn conn(password: u32) -> Connection {
  Connection {
    port:      "/dev/ttyUSB0".to_string(),
    baud_rate: 57600,
    address:   0xFFFF_FFFF,
    password,
  }
}

fn sensor() -> SimulatedSensor {
  SimulatedSensor::builder()
    .connect(&conn(0))
    .expect("simulated sensor")
}

fn policy() -> PollPolicy {
  PollPolicy { max_attempts: 50, interval: Duration::ZERO }
}

// ─── Connect ─────────────────────────────────────────────────────────────────

#[test]
fn wrong_password_is_rejected() {
  let err = SimulatedSensor::builder()
    .password(0x1234)
    .connect(&conn(0))
    .unwrap_err();
  assert!(matches!(err, SensorError::Authentication));
}

#[test]
fn storage_info_reflects_library() {
  let mut s = SimulatedSensor::builder()
    .capacity(10)
    .with_template(3, Fingerprint::new("bob"))
    .connect(&conn(0))
    .unwrap();
  let info = s.storage_info().unwrap();
  assert_eq!(info.templates_stored, 1);
  assert_eq!(info.storage_capacity, 10);
}

// ─── Enrollment ──────────────────────────────────────────────────────────────

#[test]
fn enroll_stores_template_in_first_slot() {
  let mut s = sensor();
  s.feed().place_twice(&Fingerprint::new("alice"));

  let slot = enroll_finger(&mut s, &policy()).unwrap();
  assert_eq!(slot, 1);
  assert_eq!(s.template_count().unwrap(), 1);
}

#[test]
fn enroll_skips_occupied_slots() {
  let mut s = SimulatedSensor::builder()
    .with_template(1, Fingerprint::new("bob"))
    .connect(&conn(0))
    .unwrap();
  s.feed().place_twice(&Fingerprint::new("alice"));

  assert_eq!(enroll_finger(&mut s, &policy()).unwrap(), 2);
}

#[test]
fn enroll_known_finger_is_duplicate_and_stores_nothing() {
  let bob = Fingerprint::new("bob");
  let mut s = SimulatedSensor::builder()
    .with_template(7, bob.clone())
    .connect(&conn(0))
    .unwrap();
  s.feed().place_twice(&bob);

  let err = enroll_finger(&mut s, &policy()).unwrap_err();
  assert!(matches!(err, Error::AlreadyEnrolled { slot: 7 }), "{err:?}");
  assert_eq!(s.template_count().unwrap(), 1);
}

#[test]
fn enroll_waits_for_finger_to_be_lifted() {
  let alice = Fingerprint::new("alice");
  let mut s = sensor();
  let feed = s.feed();
  feed.hold(&alice, 5);
  feed.lift();
  feed.place(&alice);

  assert_eq!(enroll_finger(&mut s, &policy()).unwrap(), 1);
  assert_eq!(feed.pending(), 0);
}

#[test]
fn enroll_times_out_when_finger_never_lifted() {
  let alice = Fingerprint::new("alice");
  let mut s = sensor();
  s.feed().hold(&alice, 200);

  let err = enroll_finger(&mut s, &policy()).unwrap_err();
  assert!(matches!(err, Error::Timeout(Awaiting::Removal)), "{err:?}");
  assert_eq!(err.to_string(), "Timeout waiting for finger removal");
  assert_eq!(s.template_count().unwrap(), 0);
}

#[test]
fn enroll_times_out_without_second_placement() {
  let mut s = sensor();
  s.feed().place(&Fingerprint::new("alice"));

  let err = enroll_finger(&mut s, &policy()).unwrap_err();
  assert!(matches!(err, Error::Timeout(Awaiting::Finger)), "{err:?}");
}

#[test]
fn enroll_rejects_two_different_fingers() {
  let mut s = sensor();
  let feed = s.feed();
  feed.place(&Fingerprint::new("left-thumb"));
  feed.lift();
  feed.place(&Fingerprint::new("right-thumb"));

  let err = enroll_finger(&mut s, &policy()).unwrap_err();
  assert!(
    matches!(err, Error::Sensor(SensorError::FingersDoNotMatch)),
    "{err:?}"
  );
  assert_eq!(s.template_count().unwrap(), 0);
}

#[test]
fn enroll_fails_when_storage_is_full() {
  let mut s = SimulatedSensor::builder()
    .capacity(1)
    .with_template(1, Fingerprint::new("bob"))
    .connect(&conn(0))
    .unwrap();
  s.feed().place_twice(&Fingerprint::new("alice"));

  let err = enroll_finger(&mut s, &policy()).unwrap_err();
  assert!(matches!(err, Error::Sensor(SensorError::StorageFull)), "{err:?}");
}

// ─── Identification ──────────────────────────────────────────────────────────

#[test]
fn scan_matches_stored_template() {
  let alice = Fingerprint::new("alice").with_quality(142);
  let mut s = SimulatedSensor::builder()
    .with_template(4, alice.clone())
    .connect(&conn(0))
    .unwrap();
  s.feed().place(&alice);

  let hit = scan_finger(&mut s, &policy()).unwrap();
  assert_eq!(hit.slot, 4);
  assert_eq!(hit.accuracy, 142);
}

#[test]
fn scan_unknown_finger_is_not_recognized() {
  let mut s = SimulatedSensor::builder()
    .with_template(1, Fingerprint::new("bob"))
    .connect(&conn(0))
    .unwrap();
  s.feed().place(&Fingerprint::new("mallory"));

  let err = scan_finger(&mut s, &policy()).unwrap_err();
  assert!(matches!(err, Error::NotRecognized), "{err:?}");
}

#[test]
fn scan_times_out_after_max_attempts() {
  let mut s = sensor();
  let feed = s.feed();
  for _ in 0..60 {
    feed.lift();
  }

  let err = scan_finger(&mut s, &policy()).unwrap_err();
  assert_eq!(err.to_string(), "Timeout waiting for finger");
  assert_eq!(feed.pending(), 10);
}

#[test]
fn scan_surfaces_communication_faults() {
  let mut s = sensor();
  s.feed().push(Reading::Fault("link down".into()));

  let err = scan_finger(&mut s, &policy()).unwrap_err();
  assert!(
    matches!(err, Error::Sensor(SensorError::Communication(_))),
    "{err:?}"
  );
}

#[test]
fn convert_without_image_fails() {
  let mut s = sensor();
  assert!(matches!(s.convert(Buffer::One), Err(SensorError::NoImage)));
}
