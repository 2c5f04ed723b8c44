// History store configuration
// Cookie names, size limits, expiry and the optional notification endpoint.
// Loadable from a JSON file; every field falls back to its default.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::types::errors::ConfigError;

/// Browsers refuse cookie lifetimes longer than 400 days.
pub const MAX_EXPIRY_DAYS: i64 = 400;

/// Tunables for [`HistoryStore`](crate::managers::history_store::HistoryStore).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HistoryConfig {
    /// Cookie holding the encoded history collection.
    pub cookie_name: String,
    /// Cookie holding the JSON settings collection.
    pub settings_cookie_name: String,
    /// Budget for the serialized history collection, in bytes.
    pub max_size: usize,
    /// URLs of this length or longer are not recorded.
    pub max_url_size: usize,
    /// Entries kept per (username, context) slice.
    pub max_entries_per_context: usize,
    /// Distinct titles returned for display.
    pub max_display_entries: usize,
    /// Cookie lifetime, counted from store construction.
    pub expiry_days: i64,
    /// Host the cookies belong to; the default cookie domain derives from it.
    pub hostname: String,
    /// Endpoint that receives a POST for every recorded entry.
    pub notification_url: Option<String>,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            cookie_name: "clr.history".to_string(),
            settings_cookie_name: "clr.history.settings".to_string(),
            max_size: 1024,
            max_url_size: 256,
            max_entries_per_context: 4,
            max_display_entries: 4,
            expiry_days: 365,
            hostname: "localhost".to_string(),
            notification_url: None,
        }
    }
}

impl HistoryConfig {
    /// Loads a config from a JSON file.
    ///
    /// A missing file yields the defaults. A malformed or invalid file is an error.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no history config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(format!("Failed to read config file: {}", e)))?;

        let config: HistoryConfig = serde_json::from_str(&content).map_err(|e| {
            ConfigError::SerializationError(format!("Failed to parse config file: {}", e))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Sets the notification endpoint, builder style.
    pub fn with_notification_url(mut self, url: &str) -> Self {
        self.notification_url = Some(url.to_string());
        self
    }

    /// Sets the current host name, builder style.
    pub fn with_hostname(mut self, hostname: &str) -> Self {
        self.hostname = hostname.to_string();
        self
    }

    /// Checks that every limit is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cookie_name.is_empty() || self.settings_cookie_name.is_empty() {
            return Err(ConfigError::InvalidValue(
                "cookie names cannot be empty".to_string(),
            ));
        }
        if self.cookie_name == self.settings_cookie_name {
            return Err(ConfigError::InvalidValue(format!(
                "history and settings cookies share the name '{}'",
                self.cookie_name
            )));
        }
        for (name, value) in [
            ("max_size", self.max_size),
            ("max_url_size", self.max_url_size),
            ("max_entries_per_context", self.max_entries_per_context),
            ("max_display_entries", self.max_display_entries),
        ] {
            if value == 0 {
                return Err(ConfigError::InvalidValue(format!("{} must be positive", name)));
            }
        }
        if !(1..=MAX_EXPIRY_DAYS).contains(&self.expiry_days) {
            return Err(ConfigError::InvalidValue(format!(
                "expiry_days must be between 1 and {}, got {}",
                MAX_EXPIRY_DAYS, self.expiry_days
            )));
        }
        if self.hostname.trim().is_empty() {
            return Err(ConfigError::InvalidValue("hostname cannot be empty".to_string()));
        }
        Ok(())
    }
}
