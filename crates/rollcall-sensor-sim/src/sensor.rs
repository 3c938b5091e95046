//! [`SimulatedSensor`] — the in-memory implementation of [`Sensor`].

use std::collections::BTreeMap;

use rollcall_core::sensor::{
  Buffer, Connection, Sensor, SensorError, TemplateMatch,
};
use tracing::{debug, info};

use crate::feed::{FingerFeed, Fingerprint, Reading};

/// Library size of the common optical modules.
const DEFAULT_CAPACITY: u32 = 1000;

/// Configures and connects a [`SimulatedSensor`].
#[derive(Debug, Clone)]
pub struct Builder {
  capacity: u32,
  password: u32,
  library:  BTreeMap<u32, Fingerprint>,
  feed:     FingerFeed,
}

impl Default for Builder {
  fn default() -> Self {
    Self {
      capacity: DEFAULT_CAPACITY,
      password: 0,
      library:  BTreeMap::new(),
      feed:     FingerFeed::default(),
    }
  }
}

impl Builder {
  pub fn capacity(mut self, capacity: u32) -> Self {
    self.capacity = capacity;
    self
  }

  /// The secret the device expects on connect.
  pub fn password(mut self, password: u32) -> Self {
    self.password = password;
    self
  }

  /// Pre-load a template at `slot`, as if enrolled in an earlier session.
  pub fn with_template(mut self, slot: u32, print: Fingerprint) -> Self {
    self.library.insert(slot, print);
    self
  }

  /// Read placements from an existing feed instead of a fresh one.
  pub fn feed(mut self, feed: FingerFeed) -> Self {
    self.feed = feed;
    self
  }

  /// Authenticate with the credentials in `conn` and open the device.
  pub fn connect(self, conn: &Connection) -> Result<SimulatedSensor, SensorError> {
    if conn.password != self.password {
      return Err(SensorError::Authentication);
    }
    info!(
      port = %conn.port,
      baud_rate = conn.baud_rate,
      templates = self.library.len(),
      capacity = self.capacity,
      "simulated sensor connected"
    );
    Ok(SimulatedSensor {
      feed:     self.feed,
      image:    None,
      buffers:  [None, None],
      template: None,
      library:  self.library,
      capacity: self.capacity,
    })
  }
}

/// A fingerprint module emulated in memory.
///
/// Template slots are numbered from 1.
#[derive(Debug)]
pub struct SimulatedSensor {
  feed:     FingerFeed,
  image:    Option<Fingerprint>,
  buffers:  [Option<Fingerprint>; 2],
  template: Option<Fingerprint>,
  library:  BTreeMap<u32, Fingerprint>,
  capacity: u32,
}

impl SimulatedSensor {
  pub fn builder() -> Builder { Builder::default() }

  /// A handle for scripting finger placements.
  pub fn feed(&self) -> FingerFeed { self.feed.clone() }

  fn buffer(&self, buffer: Buffer) -> Result<&Fingerprint, SensorError> {
    let index = match buffer {
      Buffer::One => 0,
      Buffer::Two => 1,
    };
    self.buffers[index]
      .as_ref()
      .ok_or(SensorError::EmptyBuffer(buffer))
  }
}

impl Sensor for SimulatedSensor {
  fn capture(&mut self) -> Result<bool, SensorError> {
    match self.feed.next() {
      Some(Reading::Finger(print)) => {
        self.image = Some(print);
        Ok(true)
      }
      Some(Reading::Fault(reason)) => Err(SensorError::Communication(reason)),
      Some(Reading::Lifted) | None => Ok(false),
    }
  }

  fn convert(&mut self, buffer: Buffer) -> Result<(), SensorError> {
    let image = self.image.clone().ok_or(SensorError::NoImage)?;
    match buffer {
      Buffer::One => self.buffers[0] = Some(image),
      Buffer::Two => self.buffers[1] = Some(image),
    }
    Ok(())
  }

  fn search(&mut self) -> Result<Option<TemplateMatch>, SensorError> {
    let probe = self.buffer(Buffer::One)?;
    let hit = self
      .library
      .iter()
      .find(|(_, stored)| stored.label == probe.label)
      .map(|(&slot, _)| TemplateMatch { slot, accuracy: probe.quality });
    debug!(?hit, "template search");
    Ok(hit)
  }

  fn create_template(&mut self) -> Result<(), SensorError> {
    let first = self.buffer(Buffer::One)?;
    let second = self.buffer(Buffer::Two)?;
    if first.label != second.label {
      return Err(SensorError::FingersDoNotMatch);
    }
    self.template = Some(first.clone());
    Ok(())
  }

  fn store(&mut self) -> Result<u32, SensorError> {
    let slot = (1..=self.capacity)
      .find(|slot| !self.library.contains_key(slot))
      .ok_or(SensorError::StorageFull)?;
    let template = self.template.take().ok_or(SensorError::NoTemplate)?;
    self.library.insert(slot, template);
    Ok(slot)
  }

  fn template_count(&mut self) -> Result<u32, SensorError> {
    Ok(self.library.len() as u32)
  }

  fn storage_capacity(&mut self) -> Result<u32, SensorError> {
    Ok(self.capacity)
  }
}
