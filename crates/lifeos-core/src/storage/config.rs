//! TOML-based application configuration.
//!
//! Stores:
//! - The posting timezone (IANA name) used for day keys and windows
//! - Posting window definitions
//! - Telegram bot credentials for the alert channel
//! - Alert daemon settings
//!
//! Configuration is stored at `~/.config/lifeos/config.toml`.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::ConfigError;
use crate::windows::PostingWindow;

/// Alert daemon configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Seconds between scheduler ticks. The firing band is one minute
    /// wide, so values above 60 will miss alerts.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
}

/// Telegram bot credentials. Both token and chat id must be present for
/// alerts to be delivered; absence is the valid "disabled" state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TelegramConfig {
    #[serde(default)]
    pub bot_token: Option<String>,
    #[serde(default)]
    pub chat_id: Option<String>,
    /// Optional deep link appended to every alert message.
    #[serde(default)]
    pub deep_link: Option<String>,
}

/// One posting window as configured (`HH:MM` clock times).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    pub label: String,
    pub start: String,
    pub end: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/lifeos/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default)]
    pub alerts: AlertsConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default = "default_windows")]
    pub windows: Vec<WindowConfig>,
}

fn default_timezone() -> String {
    "Europe/Kyiv".to_string()
}
fn default_true() -> bool {
    true
}
fn default_poll_interval() -> u64 {
    60
}
fn default_windows() -> Vec<WindowConfig> {
    vec![
        WindowConfig {
            label: "US Morning".to_string(),
            start: "15:00".to_string(),
            end: "17:00".to_string(),
        },
        WindowConfig {
            label: "US Prime".to_string(),
            start: "19:00".to_string(),
            end: "22:00".to_string(),
        },
    ]
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            poll_interval_secs: default_poll_interval(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            alerts: AlertsConfig::default(),
            telegram: TelegramConfig::default(),
            windows: default_windows(),
        }
    }
}

impl Config {
    /// Path of the config file inside the data directory.
    pub fn path() -> Result<PathBuf, Box<dyn std::error::Error>> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load the configuration, falling back to defaults if the file does
    /// not exist yet.
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let path = Config::path()?;
        Ok(Config::load_from(&path)?)
    }

    /// Load from an explicit path; a missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let raw = std::fs::read_to_string(path).map_err(|err| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        toml::from_str(&raw).map_err(|err| ConfigError::ParseFailed(err.to_string()))
    }

    /// Save the configuration.
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let path = Config::path()?;
        Ok(self.save_to(&path)?)
    }

    /// Save to an explicit path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let raw = toml::to_string_pretty(self).map_err(|err| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        std::fs::write(path, raw).map_err(|err| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: err.to_string(),
        })
    }

    /// Parse the configured windows into calculator inputs.
    ///
    /// # Errors
    /// Returns an error on a malformed `HH:MM` clock time.
    pub fn posting_windows(&self) -> Result<Vec<PostingWindow>, ConfigError> {
        self.windows
            .iter()
            .map(|w| {
                Ok(PostingWindow {
                    label: w.label.clone(),
                    start: parse_clock_time(&w.label, &w.start)?,
                    end: parse_clock_time(&w.label, &w.end)?,
                })
            })
            .collect()
    }
}

fn parse_clock_time(label: &str, value: &str) -> Result<NaiveTime, ConfigError> {
    NaiveTime::parse_from_str(value, "%H:%M").map_err(|_| ConfigError::InvalidValue {
        key: format!("windows.{label}"),
        message: format!("invalid clock time (expected HH:MM): {value}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_parse_into_two_windows() {
        let config = Config::default();
        let windows = config.posting_windows().unwrap();
        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0].label, "US Morning");
        assert_eq!(windows[0].start, NaiveTime::from_hms_opt(15, 0, 0).unwrap());
        assert_eq!(windows[1].end, NaiveTime::from_hms_opt(22, 0, 0).unwrap());
    }

    #[test]
    fn malformed_clock_time_is_rejected() {
        let mut config = Config::default();
        config.windows[0].start = "25:99".to_string();
        assert!(config.posting_windows().is_err());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.timezone, "Europe/Kyiv");
        assert!(config.alerts.enabled);
    }

    #[test]
    fn round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.timezone = "America/New_York".to_string();
        config.telegram.bot_token = Some("123:abc".to_string());
        config.telegram.chat_id = Some("42".to_string());
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.timezone, "America/New_York");
        assert_eq!(loaded.telegram.bot_token.as_deref(), Some("123:abc"));
        assert_eq!(loaded.windows.len(), 2);
    }
}
