//! The sensor-side halves of the enrollment and identification workflows.
//!
//! Both are short, linear sequences over a [`Sensor`]: poll for a finger,
//! extract features, search the template library, and (for enrollment) fuse a
//! second capture into a new template. Persisting the outcome is left to the
//! caller.

use std::{thread, time::Duration};

use tracing::debug;

use crate::{
  Error, Result,
  error::Awaiting,
  sensor::{Buffer, Sensor, TemplateMatch},
};

/// Attempt ceiling used when none is configured.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 50;

/// Delay between polls used when none is configured.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// A bounded retry budget for capture polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
  pub max_attempts: u32,
  /// Sleep between unsuccessful attempts.
  pub interval:     Duration,
}

impl Default for PollPolicy {
  fn default() -> Self {
    Self {
      max_attempts: DEFAULT_MAX_ATTEMPTS,
      interval:     DEFAULT_POLL_INTERVAL,
    }
  }
}

impl PollPolicy {
  /// Poll `capture()` until it reports `present`, or fail with a timeout.
  fn wait<S: Sensor + ?Sized>(
    &self,
    sensor: &mut S,
    awaiting: Awaiting,
  ) -> Result<()> {
    let present = awaiting == Awaiting::Finger;
    for attempt in 1..=self.max_attempts {
      if sensor.capture()? == present {
        debug!(%awaiting, attempt, "capture poll satisfied");
        return Ok(());
      }
      if attempt < self.max_attempts && !self.interval.is_zero() {
        thread::sleep(self.interval);
      }
    }
    Err(Error::Timeout(awaiting))
  }

  pub fn wait_for_finger<S: Sensor + ?Sized>(&self, sensor: &mut S) -> Result<()> {
    self.wait(sensor, Awaiting::Finger)
  }

  pub fn wait_for_removal<S: Sensor + ?Sized>(&self, sensor: &mut S) -> Result<()> {
    self.wait(sensor, Awaiting::Removal)
  }
}

/// Capture the same finger twice and store the fused template.
///
/// Fails with [`Error::AlreadyEnrolled`] if the first capture already matches
/// a stored template; nothing is written to the device in that case. Returns
/// the slot the new template was stored at.
pub fn enroll_finger<S: Sensor + ?Sized>(
  sensor: &mut S,
  policy: &PollPolicy,
) -> Result<u32> {
  policy.wait_for_finger(sensor)?;
  sensor.convert(Buffer::One)?;

  if let Some(hit) = sensor.search()? {
    return Err(Error::AlreadyEnrolled { slot: hit.slot });
  }

  // The finger has to leave the sensor so the second image is a new placement.
  policy.wait_for_removal(sensor)?;
  policy.wait_for_finger(sensor)?;
  sensor.convert(Buffer::Two)?;

  sensor.create_template()?;
  let slot = sensor.store()?;
  debug!(slot, "template stored");
  Ok(slot)
}

/// Capture one finger and search the template library for it.
pub fn scan_finger<S: Sensor + ?Sized>(
  sensor: &mut S,
  policy: &PollPolicy,
) -> Result<TemplateMatch> {
  policy.wait_for_finger(sensor)?;
  sensor.convert(Buffer::One)?;
  sensor.search()?.ok_or(Error::NotRecognized)
}
