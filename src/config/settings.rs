//! User settings for FinTrack
//!
//! There is no login: the acting user is whoever `current_user` names.

use serde::{Deserialize, Serialize};

use super::paths::FinTrackPaths;
use crate::error::{FinTrackError, FinTrackResult};
use crate::models::UserId;

/// User settings for FinTrack
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// User id that owns new records and decides visibility
    #[serde(default = "default_user")]
    pub current_user: UserId,

    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_user() -> UserId {
    UserId::from("me")
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            current_user: default_user(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or return defaults if the file doesn't exist
    pub fn load_or_create(paths: &FinTrackPaths) -> FinTrackResult<Self> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            // Not persisted until the caller saves
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| FinTrackError::Io(format!("Failed to read settings file: {}", e)))?;

        serde_json::from_str(&contents)
            .map_err(|e| FinTrackError::Config(format!("Failed to parse settings file: {}", e)))
    }

    pub fn save(&self, paths: &FinTrackPaths) -> FinTrackResult<()> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| FinTrackError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| FinTrackError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Set a value by its key name, as used by `fintrack config`
    pub fn set(&mut self, key: &str, value: &str) -> FinTrackResult<()> {
        let value = value.trim();
        if value.is_empty() {
            return Err(FinTrackError::Config(format!("Empty value for '{}'", key)));
        }
        match key {
            "current_user" | "user" => self.current_user = UserId::from(value),
            "currency_symbol" | "currency" => self.currency_symbol = value.to_string(),
            "date_format" => self.date_format = value.to_string(),
            other => {
                return Err(FinTrackError::Config(format!(
                    "Unknown setting '{}'. Valid keys: current_user, currency_symbol, date_format",
                    other
                )))
            }
        }
        Ok(())
    }
}
