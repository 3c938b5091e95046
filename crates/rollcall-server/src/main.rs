//! Rollcall server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), opens the SQLite
//! store, attaches the configured fingerprint sensor and serves the JSON API
//! over HTTP.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Parser;
use rollcall_sensor_sim::SimulatedSensor;
use rollcall_server::{AppState, Device, SensorConfig, SensorKind, ServerConfig};
use rollcall_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Fingerprint attendance server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let server_cfg = ServerConfig::load(&cli.config)
    .with_context(|| format!("failed to load config from {:?}", cli.config))?;

  let store_path = expand_tilde(&server_cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;
  tracing::info!(path = %store_path.display(), "store opened");

  let device = open_device(&server_cfg.sensor);
  let state = AppState::new(store, device);

  let app = rollcall_server::router(state);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Attach the configured sensor. A sensor that fails to initialise is logged
/// and left detached; the offline endpoints keep working.
fn open_device(cfg: &SensorConfig) -> Option<Device> {
  match cfg.kind {
    SensorKind::Disabled => {
      tracing::warn!("fingerprint sensor disabled; only offline endpoints are available");
      None
    }
    SensorKind::Simulated => {
      let connected = SimulatedSensor::builder()
        .capacity(cfg.capacity)
        .connect(&cfg.connection());
      match connected {
        Ok(sensor) => Some(Device::new(sensor, cfg.poll_policy())),
        Err(e) => {
          tracing::error!(port = %cfg.port, error = %e, "fingerprint sensor initialisation failed");
          None
        }
      }
    }
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
