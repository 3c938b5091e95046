//! Runtime configuration.
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! `ROLLCALL_*` environment variables (nested keys joined with `__`, e.g.
//! `ROLLCALL_SENSOR__PORT=/dev/ttyAMA0`).

use std::{path::Path, path::PathBuf, time::Duration};

use config::{Config, ConfigError, Environment, File};
use rollcall_core::{capture::PollPolicy, sensor::Connection};
use serde::Deserialize;

/// Runtime server configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
  pub sensor:     SensorConfig,
}

/// Which sensor adapter to attach at startup.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SensorKind {
  /// The in-process simulated module. Its finger feed is only driven from
  /// code, so a physical finger is never seen.
  Simulated,
  /// No sensor; only the offline endpoints work.
  Disabled,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SensorConfig {
  pub kind:             SensorKind,
  pub port:             String,
  pub baud_rate:        u32,
  pub address:          u32,
  pub password:         u32,
  /// Template library size of the simulated module.
  pub capacity:         u32,
  pub max_attempts:     u32,
  pub poll_interval_ms: u64,
}

impl SensorConfig {
  pub fn connection(&self) -> Connection {
    Connection {
      port:      self.port.clone(),
      baud_rate: self.baud_rate,
      address:   self.address,
      password:  self.password,
    }
  }

  pub fn poll_policy(&self) -> PollPolicy {
    PollPolicy {
      max_attempts: self.max_attempts,
      interval:     Duration::from_millis(self.poll_interval_ms),
    }
  }
}

impl ServerConfig {
  /// Load configuration from `path` (if it exists) and the environment.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    Config::builder()
      .set_default("host", "0.0.0.0")?
      .set_default("port", 5000_i64)?
      .set_default("store_path", "attendance.db")?
      .set_default("sensor.kind", "disabled")?
      .set_default("sensor.port", "/dev/ttyUSB0")?
      .set_default("sensor.baud_rate", 57600_i64)?
      .set_default("sensor.address", i64::from(u32::MAX))?
      .set_default("sensor.password", 0_i64)?
      .set_default("sensor.capacity", 1000_i64)?
      .set_default("sensor.max_attempts", 50_i64)?
      .set_default("sensor.poll_interval_ms", 100_i64)?
      .add_source(File::from(path).required(false))
      .add_source(
        Environment::with_prefix("ROLLCALL")
          .prefix_separator("_")
          .separator("__")
          .try_parsing(true),
      )
      .build()?
      .try_deserialize()
  }
}

#[cfg(test)]
mod tests {
  use std::io::Write as _;

  use super::*;

  #[test]
  fn defaults_apply_without_file() {
    let cfg = ServerConfig::load(Path::new("/nonexistent/rollcall.toml")).unwrap();
    assert_eq!(cfg.port, 5000);
    assert_eq!(cfg.store_path, PathBuf::from("attendance.db"));
    assert_eq!(cfg.sensor.kind, SensorKind::Disabled);
    assert_eq!(cfg.sensor.baud_rate, 57600);
    assert_eq!(cfg.sensor.address, u32::MAX);
    assert_eq!(cfg.sensor.poll_policy().max_attempts, 50);
  }

  #[test]
  fn file_overrides_defaults() {
    let dir = std::env::temp_dir().join(format!("rollcall-cfg-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("config.toml");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(
      file,
      "port = 8080\n[sensor]\nkind = \"simulated\"\nport = \"COM3\"\nmax_attempts = 5"
    )
    .unwrap();

    let cfg = ServerConfig::load(&path).unwrap();
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.sensor.kind, SensorKind::Simulated);
    assert_eq!(cfg.sensor.port, "COM3");
    assert_eq!(cfg.sensor.poll_policy().max_attempts, 5);
    assert_eq!(cfg.sensor.baud_rate, 57600);

    std::fs::remove_dir_all(&dir).ok();
  }
}
