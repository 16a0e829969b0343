//! # Register Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     TOURDESK_DB_PATH=/srv/tourdesk.db                                  │
//! │     TOURDESK_CLOSING_HOUR=6                                            │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/tourdesk/register.toml (Linux)                           │
//! │     ~/Library/Application Support/com.tourdesk.register/... (macOS)    │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     closing from 05:00, re-evaluated every 60 s                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # register.toml
//! [store]
//! name = "Tour Desk"
//! currency_symbol = "R$"
//!
//! [database]
//! path = "/var/lib/tourdesk/tourdesk.db"  # optional
//! max_connections = 5
//!
//! [closing]
//! opens_at_hour = 5
//! poll_interval_secs = 60
//! timezone = "America/Sao_Paulo"
//! ```

use chrono_tz::Tz;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use tourdesk_core::closing::DEFAULT_CLOSING_HOUR;
use tourdesk_core::ClosingWindow;

const CONFIG_FILE_NAME: &str = "register.toml";
const DATABASE_FILE_NAME: &str = "tourdesk.db";

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Unknown time zone: {0}")]
    InvalidTimezone(String),

    #[error("Could not determine app data directory")]
    NoDataDir,
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Sections
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Name printed on the dashboard header.
    #[serde(default = "default_store_name")]
    pub name: String,

    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

fn default_store_name() -> String {
    "Tour Desk".to_string()
}

fn default_currency_symbol() -> String {
    "R$".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            name: default_store_name(),
            currency_symbol: default_currency_symbol(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// Database file. `None` means the platform data directory.
    #[serde(default)]
    pub path: Option<PathBuf>,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: None,
            max_connections: default_max_connections(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClosingSettings {
    /// First local hour at which the day may be closed.
    #[serde(default = "default_opens_at_hour")]
    pub opens_at_hour: u32,

    /// How often the closing watcher re-evaluates the status.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// IANA zone used for the eligibility gate.
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_opens_at_hour() -> u32 {
    DEFAULT_CLOSING_HOUR
}

fn default_poll_interval() -> u64 {
    60
}

fn default_timezone() -> String {
    "America/Sao_Paulo".to_string()
}

impl Default for ClosingSettings {
    fn default() -> Self {
        ClosingSettings {
            opens_at_hour: default_opens_at_hour(),
            poll_interval_secs: default_poll_interval(),
            timezone: default_timezone(),
        }
    }
}

// =============================================================================
// Register Config
// =============================================================================

/// Complete register configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterConfig {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub closing: ClosingSettings,
}

impl RegisterConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (register.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading register config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load register config: {}. Using defaults.", e);
            Self::default()
        })
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.closing.opens_at_hour > 23 {
            return Err(ConfigError::Invalid(format!(
                "closing.opens_at_hour must be between 0 and 23, got {}",
                self.closing.opens_at_hour
            )));
        }

        if self.closing.poll_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "closing.poll_interval_secs must be greater than 0".into(),
            ));
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.max_connections must be greater than 0".into(),
            ));
        }

        self.timezone()?;

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("TOURDESK_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = Some(PathBuf::from(path));
        }

        if let Ok(name) = std::env::var("TOURDESK_STORE_NAME") {
            self.store.name = name;
        }

        if let Ok(hour) = std::env::var("TOURDESK_CLOSING_HOUR") {
            match hour.parse::<u32>() {
                Ok(h) => {
                    debug!(hour = h, "Overriding closing hour from environment");
                    self.closing.opens_at_hour = h;
                }
                Err(_) => warn!(value = %hour, "Ignoring non-numeric TOURDESK_CLOSING_HOUR"),
            }
        }

        if let Ok(secs) = std::env::var("TOURDESK_POLL_SECS") {
            if let Ok(s) = secs.parse::<u64>() {
                self.closing.poll_interval_secs = s;
            }
        }

        if let Ok(tz) = std::env::var("TOURDESK_TIMEZONE") {
            debug!(timezone = %tz, "Overriding time zone from environment");
            self.closing.timezone = tz;
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "tourdesk", "register")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Resolves the database file, creating the data directory when the
    /// platform default is used.
    pub fn database_path(&self) -> ConfigResult<PathBuf> {
        if let Some(path) = &self.database.path {
            return Ok(path.clone());
        }

        let dirs = ProjectDirs::from("com", "tourdesk", "register").ok_or(ConfigError::NoDataDir)?;
        let data_dir = dirs.data_dir();
        std::fs::create_dir_all(data_dir)?;

        Ok(data_dir.join(DATABASE_FILE_NAME))
    }

    pub fn timezone(&self) -> ConfigResult<Tz> {
        self.closing
            .timezone
            .parse::<Tz>()
            .map_err(|_| ConfigError::InvalidTimezone(self.closing.timezone.clone()))
    }

    pub fn window(&self) -> ConfigResult<ClosingWindow> {
        ClosingWindow::new(self.closing.opens_at_hour).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.closing.poll_interval_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RegisterConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.closing.opens_at_hour, 5);
        assert_eq!(config.poll_interval(), Duration::from_secs(60));
        assert_eq!(config.timezone().unwrap(), chrono_tz::America::Sao_Paulo);
        assert!(config.database.path.is_none());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: RegisterConfig = toml::from_str(
            r#"
            [closing]
            opens_at_hour = 6
            "#,
        )
        .unwrap();

        assert_eq!(config.closing.opens_at_hour, 6);
        assert_eq!(config.closing.poll_interval_secs, 60);
        assert_eq!(config.store.currency_symbol, "R$");
        assert_eq!(config.database.max_connections, 5);
    }

    #[test]
    fn test_config_validation() {
        let mut config = RegisterConfig::default();
        config.closing.opens_at_hour = 24;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = RegisterConfig::default();
        config.closing.poll_interval_secs = 0;
        assert!(config.validate().is_err());

        let mut config = RegisterConfig::default();
        config.database.max_connections = 0;
        assert!(config.validate().is_err());

        let mut config = RegisterConfig::default();
        config.closing.timezone = "Mars/Olympus_Mons".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::InvalidTimezone(_))));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("register-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(
            &path,
            r#"
            [store]
            name = "Pier 3"

            [database]
            path = "/tmp/pier3.db"

            [closing]
            timezone = "UTC"
            "#,
        )
        .unwrap();

        let loaded = RegisterConfig::load(Some(path.clone()));
        std::fs::remove_file(&path).ok();
        let config = loaded.unwrap();

        assert_eq!(config.store.name, "Pier 3");
        assert_eq!(config.database_path().unwrap(), PathBuf::from("/tmp/pier3.db"));
        assert_eq!(config.timezone().unwrap(), chrono_tz::UTC);
    }

    #[test]
    fn test_invalid_file_is_parse_error() {
        let path = std::env::temp_dir().join(format!("register-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, "[closing]\nopens_at_hour = \"five\"\n").unwrap();

        let loaded = RegisterConfig::load(Some(path.clone()));
        std::fs::remove_file(&path).ok();

        assert!(matches!(loaded, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_toml_serialization() {
        let config = RegisterConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[store]"));
        assert!(toml_str.contains("[closing]"));
    }
}
