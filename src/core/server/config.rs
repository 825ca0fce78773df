//! Server configuration.

use crate::core::error::{Result, ThingError};
use crate::core::protocol::DEFAULT_POLL_INTERVAL_MS;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;

/// Settings for a [`ThingServer`](super::ThingServer).
///
/// Every field has a default, so a partial (or empty) JSON object is a valid
/// configuration file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// First path segment of every resource and the TD title.
    #[serde(default = "default_thing_name")]
    pub thing_name: String,
    #[serde(default = "default_hostname")]
    pub hostname: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// How often the subscription poller checks for changes.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Where to write the expanded description on startup, if anywhere.
    #[serde(default)]
    pub description_path: Option<PathBuf>,
}

fn default_thing_name() -> String {
    "counter".to_string()
}

fn default_hostname() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            thing_name: default_thing_name(),
            hostname: default_hostname(),
            port: default_port(),
            poll_interval_ms: default_poll_interval_ms(),
            description_path: None,
        }
    }
}

impl ServerConfig {
    /// Read a JSON configuration file. A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// [`ThingError::Io`] when the file exists but cannot be read,
    /// [`ThingError::Config`] when it is not a valid configuration.
    pub async fn load(path: &Path) -> Result<Self> {
        if !fs::try_exists(path).await? {
            tracing::debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).await?;
        serde_json::from_str(&content)
            .map_err(|e| ThingError::Config(format!("failed to parse {:?}: {}", path, e)))
    }

    pub async fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).await?;
        Ok(())
    }

    /// Reject values the server cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.thing_name.is_empty() {
            return Err(ThingError::Config("thing_name must not be empty".to_string()));
        }
        if self.thing_name.contains('/') {
            return Err(ThingError::Config(format!(
                "thing_name must be a single path segment: {:?}",
                self.thing_name
            )));
        }
        if self.poll_interval_ms == 0 {
            return Err(ThingError::Config(
                "poll_interval_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    #[inline]
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// `host:port` to bind.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.hostname, self.port)
    }
}
