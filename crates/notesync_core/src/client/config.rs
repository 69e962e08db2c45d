//! Remote client configuration.

use std::time::Duration;

/// Server used when no override is configured.
pub const DEFAULT_SERVER_URL: &str = "http://51.254.201.22:8500";
/// Overrides the server base URL.
pub const SERVER_URL_ENV: &str = "NOTESYNC_SERVER_URL";
/// Optional whole-request timeout in seconds.
pub const TIMEOUT_SECS_ENV: &str = "NOTESYNC_TIMEOUT_SECS";

/// Settings for [`crate::client::HttpNoteDbClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL; endpoint names are appended after a `/`.
    pub base_url: String,
    /// `None` keeps the transport default.
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SERVER_URL.to_string(),
            timeout: None,
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Reads overrides from the process environment.
    ///
    /// Blank values fall back to defaults.
    ///
    /// # Errors
    /// - Returns an error when the timeout value is not a whole number.
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`ClientConfig::from_env`] over an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let mut config = Self::default();

        if let Some(raw) = lookup(SERVER_URL_ENV) {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                config.base_url = trimmed.to_string();
            }
        }

        if let Some(raw) = lookup(TIMEOUT_SECS_ENV) {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                let secs = trimmed.parse::<u64>().map_err(|err| {
                    format!("invalid {TIMEOUT_SECS_ENV} value `{trimmed}`: {err}")
                })?;
                config.timeout = Some(Duration::from_secs(secs));
            }
        }

        Ok(config)
    }
}
