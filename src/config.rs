use crate::error::{Result, SyncError};
use crate::parser::ParseOptions;

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub logging: Logging,
    pub parser: ParseOptions,
    pub playback: Playback,
}

impl Config {
    /// Reads `path`, or `./config.toml` when present, or falls back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let default_path = Path::new("config.toml");
        let path = match path {
            Some(p) => p,
            None if default_path.exists() => default_path,
            None => return Ok(Config::default()),
        };

        let raw = fs::read_to_string(path)?;
        Self::from_toml(&raw)
            .map_err(|e| SyncError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn from_toml(raw: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    pub fn to_toml_pretty(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| SyncError::Config(e.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Logging {
    pub level: String,
    pub format: String,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Playback {
    pub sample_interval_ms: u64,
    /// Sleep between simulated samples instead of running flat out.
    pub realtime: bool,
}

impl Default for Playback {
    fn default() -> Self {
        Self {
            sample_interval_ms: 100,
            realtime: false,
        }
    }
}

impl Playback {
    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sample_interval_ms)
    }
}

/// Installs the global subscriber. `RUST_LOG` wins over `override_level`,
/// which wins over the configured level. Logs go to stderr.
pub fn init_tracing(logging: &Logging, override_level: Option<&str>) -> anyhow::Result<()> {
    use tracing_subscriber::{fmt, EnvFilter};

    let level = override_level.unwrap_or(logging.level.as_str());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if logging.format.eq_ignore_ascii_case("json") {
        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .event_format(fmt::format().json())
            .with_target(true)
            .try_init()
            .map_err(|e| anyhow::anyhow!(e))?;
    } else {
        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .pretty()
            .try_init()
            .map_err(|e| anyhow::anyhow!(e))?;
    }

    tracing::debug!(level, format = logging.format.as_str(), "logging initialized");
    Ok(())
}
