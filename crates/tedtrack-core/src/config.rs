//! TedTrack configuration system.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TedTrackConfig {
    #[serde(default)]
    pub mail: MailConfig,
    #[serde(default)]
    pub operator: OperatorConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

impl Default for TedTrackConfig {
    fn default() -> Self {
        Self {
            mail: MailConfig::default(),
            operator: OperatorConfig::default(),
            schedule: ScheduleConfig::default(),
            storage: StorageConfig::default(),
            session: SessionConfig::default(),
        }
    }
}

impl TedTrackConfig {
    /// Load config from the default path (~/.tedtrack/config.toml).
    /// A missing file yields defaults; environment overrides are applied
    /// on top in both cases.
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        let mut config = if path.exists() {
            Self::load_from(&path)?
        } else {
            Self::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load config from a specific path, without environment overrides.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::error::TedTrackError::Config(format!("Failed to read config: {e}")))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| crate::error::TedTrackError::Config(format!("Failed to parse config: {e}")))?;
        Ok(config)
    }

    /// Save config to the default path.
    pub fn save(&self) -> Result<()> {
        let path = Self::default_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::TedTrackError::Config(format!("Failed to serialize config: {e}")))?;
        std::fs::write(&path, content)?;
        Ok(())
    }

    /// Get the default config path.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".tedtrack")
            .join("config.toml")
    }

    /// Get the TedTrack home directory.
    pub fn home_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".tedtrack")
    }

    /// Secrets come from the environment when set, taking precedence
    /// over anything in the config file.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("TEDTRACK_MAIL_PASSWORD") {
            self.mail.password = v;
        }
        if let Ok(v) = std::env::var("TEDTRACK_OPERATOR_USER") {
            self.operator.username = v;
        }
        if let Ok(v) = std::env::var("TEDTRACK_OPERATOR_PASSWORD") {
            self.operator.password = v;
        }
    }
}

/// SMTP mail configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    #[serde(default = "default_sender")]
    pub sender: String,
    #[serde(default = "default_recipient")]
    pub recipient: String,
    /// App password for the sender account. Prefer TEDTRACK_MAIL_PASSWORD
    /// over storing this on disk.
    #[serde(default)]
    pub password: String,
}

fn default_smtp_host() -> String { "smtp.gmail.com".into() }
fn default_smtp_port() -> u16 { 587 }
fn default_sender() -> String { "gptdornelles@gmail.com".into() }
fn default_recipient() -> String { "diogenes.dornelles@gmail.com".into() }

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            sender: default_sender(),
            recipient: default_recipient(),
            password: String::new(),
        }
    }
}

/// Operator login credentials for the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OperatorConfig {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Daily check schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Local wall-clock time of the daily check, "HH:MM".
    #[serde(default = "default_daily_at")]
    pub daily_at: String,
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
}

fn default_daily_at() -> String { "06:00".into() }
fn default_poll_interval() -> u64 { 60 }

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            daily_at: default_daily_at(),
            poll_interval_secs: default_poll_interval(),
        }
    }
}

/// Artifact storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path of the saved spreadsheet. `~` is expanded by the binary.
    #[serde(default = "default_artifact")]
    pub artifact: String,
}

fn default_artifact() -> String { "~/.tedtrack/planilha.xlsx".into() }

impl Default for StorageConfig {
    fn default() -> Self {
        Self { artifact: default_artifact() }
    }
}

/// Dashboard session configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Seconds of inactivity before an operator session expires.
    #[serde(default = "default_max_timeout")]
    pub max_timeout_secs: u32,
}

fn default_max_timeout() -> u32 { 300 }

impl Default for SessionConfig {
    fn default() -> Self {
        Self { max_timeout_secs: default_max_timeout() }
    }
}
