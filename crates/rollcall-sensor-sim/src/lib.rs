//! An in-process fingerprint sensor.
//!
//! [`SimulatedSensor`] keeps a template library in memory and reads finger
//! placements from a [`FingerFeed`] instead of an optical window. It backs the
//! server when no hardware is attached and drives the workflow tests.

mod feed;
mod sensor;

pub use feed::{FingerFeed, Fingerprint, Reading};
pub use sensor::{Builder, SimulatedSensor};

#[cfg(test)]
mod tests;
