//! API connection settings.
//!
//! Defaults are embedded at compile time from `config/police_api.toml`
//! and may be overridden per process with `POLICE_API_BASE_URL` and
//! `POLICE_API_TIMEOUT_SECS`.

use std::time::Duration;

use serde::Deserialize;

/// Environment variable overriding [`ApiConfig::base_url`].
pub const BASE_URL_ENV: &str = "POLICE_API_BASE_URL";

/// Environment variable overriding [`ApiConfig::timeout_secs`].
pub const TIMEOUT_ENV: &str = "POLICE_API_TIMEOUT_SECS";

const DEFAULT_TOML: &str = include_str!("../config/police_api.toml");

/// Errors from loading API configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The TOML document was malformed.
    #[error("invalid API config: {0}")]
    Toml(#[from] toml::de::Error),

    /// An environment override could not be parsed.
    #[error("invalid value {value:?} for {name}")]
    InvalidEnv {
        /// Variable name.
        name: &'static str,
        /// Rejected value.
        value: String,
    },
}

/// Connection settings for the police data API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to.
    pub base_url: String,
    /// `User-Agent` header sent with each request.
    pub user_agent: String,
    /// Whole-request timeout applied by the transport.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

const fn default_timeout_secs() -> u64 {
    30
}

impl ApiConfig {
    /// Parses a config from a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Toml`] if the document is malformed.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::de::from_str(toml_str)?)
    }

    /// Loads the embedded defaults and applies environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the embedded config is malformed or an
    /// override is not a valid value.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_toml(DEFAULT_TOML)?;
        config.apply_overrides(
            std::env::var(BASE_URL_ENV).ok(),
            std::env::var(TIMEOUT_ENV).ok(),
        )?;
        Ok(config)
    }

    /// Applies override values, ignoring empty strings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnv`] if the timeout is not an integer.
    pub fn apply_overrides(
        &mut self,
        base_url: Option<String>,
        timeout_secs: Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(url) = base_url.filter(|u| !u.trim().is_empty()) {
            self.base_url = url.trim().to_string();
        }
        if let Some(raw) = timeout_secs.filter(|t| !t.trim().is_empty()) {
            self.timeout_secs = raw.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                name: TIMEOUT_ENV,
                value: raw.clone(),
            })?;
        }
        Ok(())
    }

    /// Request timeout as a [`Duration`].
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
