//! [`Device`] — exclusive access to the fingerprint sensor.
//!
//! The capture sequences share the module's image and feature buffers, so only
//! one workflow may drive the sensor at a time. A call that finds the sensor in
//! use is rejected with [`ApiError::SensorBusy`] rather than queued behind a
//! poll loop that may run for seconds.

use std::sync::{Arc, Mutex, TryLockError};

use rollcall_core::{capture::PollPolicy, sensor::Sensor};

use crate::error::ApiError;

/// A shared handle to the attached sensor and its capture policy.
///
/// Cloning is cheap; all clones guard the same device.
#[derive(Clone)]
pub struct Device {
  sensor: Arc<Mutex<Box<dyn Sensor>>>,
  policy: PollPolicy,
}

impl Device {
  pub fn new(sensor: impl Sensor + 'static, policy: PollPolicy) -> Self {
    let sensor: Box<dyn Sensor> = Box::new(sensor);
    Self { sensor: Arc::new(Mutex::new(sensor)), policy }
  }

  pub fn policy(&self) -> PollPolicy { self.policy }

  /// Run `op` against the sensor on the blocking thread pool.
  ///
  /// Fails with [`ApiError::SensorBusy`] if another operation holds the
  /// sensor.
  pub async fn run<T, F>(&self, op: F) -> Result<T, ApiError>
  where
    F: FnOnce(&mut dyn Sensor, &PollPolicy) -> rollcall_core::Result<T>
      + Send
      + 'static,
    T: Send + 'static,
  {
    let sensor = Arc::clone(&self.sensor);
    let policy = self.policy;

    tokio::task::spawn_blocking(move || {
      let mut guard = match sensor.try_lock() {
        Ok(guard) => guard,
        Err(TryLockError::WouldBlock) => return Err(ApiError::SensorBusy),
        // A panic mid-sequence leaves nothing to repair on our side; the
        // next sequence starts from a fresh capture.
        Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
      };
      op(&mut **guard, &policy).map_err(ApiError::from)
    })
    .await
    .unwrap_or_else(|e| match e.try_into_panic() {
      // Re-raised on the request task so the panic layer answers it.
      Ok(payload) => std::panic::resume_unwind(payload),
      Err(e) => Err(ApiError::Adapter(format!("sensor task failed: {e}"))),
    })
  }
}

#[cfg(test)]
mod tests {
  use std::time::Duration;

  use rollcall_core::{
    capture::scan_finger,
    sensor::{Connection, StorageInfo},
  };
  use rollcall_sensor_sim::{Fingerprint, SimulatedSensor};

  use super::*;

  fn device(interval: Duration) -> (Device, rollcall_sensor_sim::FingerFeed) {
    let sensor = SimulatedSensor::builder()
      .capacity(20)
      .with_template(1, Fingerprint::new("alice"))
      .connect(&Connection {
        port:      "sim".to_string(),
        baud_rate: 57600,
        address:   0xFFFF_FFFF,
        password:  0,
      })
      .unwrap();
    let feed = sensor.feed();
    let policy = PollPolicy { max_attempts: 50, interval };
    (Device::new(sensor, policy), feed)
  }

  #[tokio::test]
  async fn run_reports_storage_info() {
    let (device, _feed) = device(Duration::ZERO);
    let info = device
      .run(|sensor, _| Ok(sensor.storage_info()?))
      .await
      .unwrap();
    assert_eq!(info, StorageInfo { templates_stored: 1, storage_capacity: 20 });
  }

  #[tokio::test]
  async fn run_maps_workflow_errors() {
    let (device, _feed) = device(Duration::ZERO);
    let err = device.run(|s, p| scan_finger(s, p)).await.unwrap_err();
    assert!(matches!(err, ApiError::Timeout(_)), "{err:?}");
  }

  #[tokio::test]
  async fn concurrent_run_is_rejected_as_busy() {
    // 50 polls at 20ms keep the first scan on the sensor for about a second.
    let (device, _feed) = device(Duration::from_millis(20));

    let first = tokio::spawn({
      let device = device.clone();
      async move { device.run(|s, p| scan_finger(s, p)).await }
    });
    tokio::time::sleep(Duration::from_millis(200)).await;

    let second = device.run(|s, p| scan_finger(s, p)).await.unwrap_err();
    assert!(matches!(second, ApiError::SensorBusy), "{second:?}");

    let first = first.await.unwrap().unwrap_err();
    assert!(matches!(first, ApiError::Timeout(_)), "{first:?}");
  }

  #[tokio::test]
  async fn device_is_released_after_run() {
    let (device, feed) = device(Duration::ZERO);
    feed.place(&Fingerprint::new("alice"));
    let hit = device.run(|s, p| scan_finger(s, p)).await.unwrap();
    assert_eq!(hit.slot, 1);

    feed.place(&Fingerprint::new("alice"));
    assert!(device.run(|s, p| scan_finger(s, p)).await.is_ok());
  }
}
