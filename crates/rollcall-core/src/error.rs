//! Error types for `rollcall-core`.

use std::fmt;

use thiserror::Error;

use crate::sensor::SensorError;

/// What a capture poll was waiting for when it ran out of attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Awaiting {
  Finger,
  Removal,
}

impl fmt::Display for Awaiting {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Finger => f.write_str("finger"),
      Self::Removal => f.write_str("finger removal"),
    }
  }
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("Timeout waiting for {0}")]
  Timeout(Awaiting),

  #[error("Fingerprint already enrolled at position {slot}")]
  AlreadyEnrolled { slot: u32 },

  #[error("Fingerprint not recognized")]
  NotRecognized,

  #[error("sensor error: {0}")]
  Sensor(#[from] SensorError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
