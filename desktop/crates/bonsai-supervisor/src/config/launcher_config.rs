//! Launcher configuration with validation and versioning.

use crate::config::{BackendSettings, LoggingSettings, ReadinessSettings, ShutdownSettings};
use crate::{SupervisorError, SupervisorResult};

use std::panic::Location;
use std::path::Path;

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Configuration version for migration support.
/// Increment when adding new fields or changing structure.
pub const CONFIG_VERSION: u32 = 1;

pub const CONFIG_FILENAME: &str = "config.toml";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 61712;

const DEFAULT_SERVER_EXECUTABLE: &str = "bonsai_dca_server";
const DEFAULT_DAEMON_EXECUTABLE: &str = "bonsai_dca_daemon";
const DEFAULT_INITIAL_BACKOFF_MS: u64 = 100;
const DEFAULT_MAX_BACKOFF_MS: u64 = 2000;
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 1000;
const DEFAULT_STARTUP_TIMEOUT_SECS: u64 = 120;
const DEFAULT_EXIT_GRACE_MS: u64 = 3000;
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_LOG_RETENTION_DAYS: usize = 7;

const MIN_PORT: u16 = 1024;
const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LauncherConfig {
    /// Config file format version
    #[serde(default = "default_version")]
    pub version: u32,

    /// Backend process settings
    #[serde(default)]
    pub backend: BackendSettings,

    /// Readiness polling settings
    #[serde(default)]
    pub readiness: ReadinessSettings,

    /// Process teardown settings
    #[serde(default)]
    pub shutdown: ShutdownSettings,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingSettings,
}

// === Default Value Functions ===

fn default_version() -> u32 {
    CONFIG_VERSION
}
pub(crate) fn default_host() -> String {
    DEFAULT_HOST.into()
}
pub(crate) fn default_port() -> u16 {
    DEFAULT_PORT
}
pub(crate) fn default_server_executable() -> String {
    DEFAULT_SERVER_EXECUTABLE.into()
}
pub(crate) fn default_daemon_executable() -> String {
    DEFAULT_DAEMON_EXECUTABLE.into()
}
pub(crate) fn default_initial_backoff() -> u64 {
    DEFAULT_INITIAL_BACKOFF_MS
}
pub(crate) fn default_max_backoff() -> u64 {
    DEFAULT_MAX_BACKOFF_MS
}
pub(crate) fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_MS
}
pub(crate) fn default_startup_timeout() -> u64 {
    DEFAULT_STARTUP_TIMEOUT_SECS
}
pub(crate) fn default_exit_grace() -> u64 {
    DEFAULT_EXIT_GRACE_MS
}
pub(crate) fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.into()
}
pub(crate) fn default_log_retention() -> usize {
    DEFAULT_LOG_RETENTION_DAYS
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            backend: BackendSettings::default(),
            readiness: ReadinessSettings::default(),
            shutdown: ShutdownSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

// === Configuration Operations ===

impl LauncherConfig {
    /// URL probed for readiness and displayed once the backend is up.
    pub fn backend_url(&self) -> String {
        format!("http://{}:{}", self.backend.host, self.backend.port)
    }

    /// Load config from file, creating default if not exists.
    pub fn load_or_create(data_dir: &Path) -> SupervisorResult<Self> {
        let config_path = data_dir.join(CONFIG_FILENAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let mut config: Self =
                toml::from_str(&content).map_err(|e| SupervisorError::ConfigInvalid {
                    message: e.to_string(),
                    location: ErrorLocation::from(Location::caller()),
                })?;

            if config.version < CONFIG_VERSION {
                config = Self::migrate(config);
                config.save(data_dir)?;
            }

            config.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save(data_dir)?;
            info!("Wrote default config to {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to file atomically.
    ///
    /// Uses write-to-temp-then-rename pattern to prevent
    /// partial writes if the process is interrupted.
    pub fn save(&self, data_dir: &Path) -> SupervisorResult<()> {
        let config_path = data_dir.join(CONFIG_FILENAME);
        let content =
            toml::to_string_pretty(self).map_err(|e| SupervisorError::ConfigInvalid {
                message: e.to_string(),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let temp_path = config_path.with_extension("toml.tmp");
        std::fs::write(&temp_path, &content)?;
        std::fs::rename(&temp_path, &config_path)?;

        Ok(())
    }

    /// Migrate config from older version.
    fn migrate(mut config: Self) -> Self {
        // Version 0 -> 1: shutdown settings introduced
        if config.version == 0 {
            config.shutdown = ShutdownSettings::default();
            config.version = 1;
        }

        config
    }

    /// Validate configuration values.
    pub fn validate(&self) -> SupervisorResult<()> {
        if self.backend.port < MIN_PORT {
            return Err(Self::invalid(format!(
                "Port must be >= {MIN_PORT} (unprivileged)"
            )));
        }

        // Backend must never be reachable from the network
        if self.backend.host != DEFAULT_HOST && self.backend.host != "localhost" {
            return Err(Self::invalid(format!(
                "Host must be {DEFAULT_HOST} or localhost"
            )));
        }

        if self.backend.server_executable.trim().is_empty()
            || self.backend.daemon_executable.trim().is_empty()
        {
            return Err(Self::invalid("Executable names must not be empty".into()));
        }

        if self.readiness.initial_backoff_ms == 0 {
            return Err(Self::invalid("Initial backoff must be > 0".into()));
        }

        if self.readiness.max_backoff_ms < self.readiness.initial_backoff_ms {
            return Err(Self::invalid(
                "Max backoff must be >= initial backoff".into(),
            ));
        }

        if self.readiness.request_timeout_ms == 0 {
            return Err(Self::invalid("Request timeout must be > 0".into()));
        }

        if !LOG_LEVELS.contains(&self.logging.level.to_ascii_lowercase().as_str()) {
            return Err(Self::invalid(format!(
                "Log level must be one of {}",
                LOG_LEVELS.join(", ")
            )));
        }

        Ok(())
    }

    #[track_caller]
    fn invalid(message: String) -> SupervisorError {
        SupervisorError::ConfigInvalid {
            message,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
