//! The fingerprint sensor capability.
//!
//! Mirrors the primitive operations a fingerprint module exposes: capture an
//! image, extract features into one of two working buffers, search the
//! device's template library, fuse both buffers into a template, and store
//! it. Adapters implement [`Sensor`]; the workflows in [`crate::capture`] only
//! ever talk to the trait.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One of the two on-device feature buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Buffer {
  One,
  Two,
}

/// A hit returned by [`Sensor::search`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateMatch {
  pub slot:     u32,
  /// Adapter-reported match score.
  pub accuracy: u16,
}

/// Template library occupancy, as reported by the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageInfo {
  pub templates_stored: u32,
  pub storage_capacity: u32,
}

/// How to reach and authenticate against a sensor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
  /// Serial port or other device endpoint.
  pub port:      String,
  pub baud_rate: u32,
  pub address:   u32,
  pub password:  u32,
}

#[derive(Debug, Error)]
pub enum SensorError {
  #[error("sensor password rejected")]
  Authentication,

  #[error("sensor communication failed: {0}")]
  Communication(String),

  #[error("no image captured")]
  NoImage,

  #[error("feature buffer {0:?} is empty")]
  EmptyBuffer(Buffer),

  #[error("the fingers do not match")]
  FingersDoNotMatch,

  #[error("no template to store")]
  NoTemplate,

  #[error("template storage is full")]
  StorageFull,
}

/// A fingerprint module.
///
/// Every method is a single blocking round-trip to the device. Callers are
/// responsible for serialising access: the operations form a sequence over
/// shared device buffers and must not interleave.
pub trait Sensor: Send {
  /// Try to read a finger image. Returns `true` once an image was captured.
  fn capture(&mut self) -> Result<bool, SensorError>;

  /// Extract features from the last image into `buffer`.
  fn convert(&mut self, buffer: Buffer) -> Result<(), SensorError>;

  /// Match [`Buffer::One`] against every stored template.
  fn search(&mut self) -> Result<Option<TemplateMatch>, SensorError>;

  /// Merge both buffers into a single template.
  fn create_template(&mut self) -> Result<(), SensorError>;

  /// Persist the merged template and return the slot it was stored at.
  fn store(&mut self) -> Result<u32, SensorError>;

  fn template_count(&mut self) -> Result<u32, SensorError>;

  fn storage_capacity(&mut self) -> Result<u32, SensorError>;

  fn storage_info(&mut self) -> Result<StorageInfo, SensorError> {
    Ok(StorageInfo {
      templates_stored: self.template_count()?,
      storage_capacity: self.storage_capacity()?,
    })
  }
}

impl<S: Sensor + ?Sized> Sensor for Box<S> {
  fn capture(&mut self) -> Result<bool, SensorError> { (**self).capture() }

  fn convert(&mut self, buffer: Buffer) -> Result<(), SensorError> {
    (**self).convert(buffer)
  }

  fn search(&mut self) -> Result<Option<TemplateMatch>, SensorError> {
    (**self).search()
  }

  fn create_template(&mut self) -> Result<(), SensorError> {
    (**self).create_template()
  }

  fn store(&mut self) -> Result<u32, SensorError> { (**self).store() }

  fn template_count(&mut self) -> Result<u32, SensorError> {
    (**self).template_count()
  }

  fn storage_capacity(&mut self) -> Result<u32, SensorError> {
    (**self).storage_capacity()
  }
}
