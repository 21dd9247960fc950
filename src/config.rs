//! # Configuration
//!
//! Shop origin and live carrier settings.
//!
//! Sources, lowest precedence first:
//!
//! ```text
//! built-in defaults
//! parcel-rates.toml              (optional, working directory)
//! .env                           (loaded into the environment by dotenvy)
//! PARCEL_RATES__*                (environment, "__" separates nesting)
//! ```
//!
//! Live rates are enabled only when a `[live_api]` table (or the matching
//! `PARCEL_RATES__LIVE_API__*` variables) is present.
//!
//! # Examples
//!
//! ```
//! use parcel_rates::config::{LiveApiConfig, ShippingConfig};
//!
//! let config = ShippingConfig::new("98101")
//!     .with_live_api(LiveApiConfig::new("https://apis.usps.com", "id", "secret").with_timeout_ms(3000));
//! assert!(config.validate().is_ok());
//! ```

use crate::domain::value_objects::PostalCode;
use crate::infrastructure::carrier::DEFAULT_SAFETY_MARGIN_SECS;
use ::config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Default carrier request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Base name of the optional configuration file.
pub const CONFIG_FILE: &str = "parcel-rates";

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "PARCEL_RATES";

/// Configuration loading or validation failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or deserialized.
    #[error("failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    /// A value is present but unusable.
    #[error("invalid configuration value for {field}: {message}")]
    Invalid {
        /// Dotted key of the offending field.
        field: &'static str,
        /// What is wrong with it.
        message: String,
    },
}

impl ConfigError {
    fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            message: message.into(),
        }
    }
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Credentials and endpoint for the live rate API.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveApiConfig {
    /// API root, e.g. `https://apis.usps.com`.
    pub base_url: String,
    /// OAuth client id.
    pub client_id: String,
    /// OAuth client secret.
    pub client_secret: String,
    /// Timeout for each outbound call.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Seconds before expiry at which a cached token is replaced.
    #[serde(default = "default_safety_margin_secs")]
    pub token_safety_margin_secs: u64,
}

const fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

const fn default_safety_margin_secs() -> u64 {
    DEFAULT_SAFETY_MARGIN_SECS
}

impl LiveApiConfig {
    /// Creates live API settings with default timeout and margin.
    #[must_use]
    pub fn new(
        base_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            token_safety_margin_secs: DEFAULT_SAFETY_MARGIN_SECS,
        }
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Sets the token safety margin.
    #[must_use]
    pub fn with_token_safety_margin_secs(mut self, secs: u64) -> Self {
        self.token_safety_margin_secs = secs;
        self
    }

    fn validate(&self) -> ConfigResult<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::invalid(
                "live_api.base_url",
                format!("'{}' is not an http(s) URL", self.base_url),
            ));
        }
        if self.client_id.trim().is_empty() {
            return Err(ConfigError::invalid("live_api.client_id", "must not be empty"));
        }
        if self.client_secret.trim().is_empty() {
            return Err(ConfigError::invalid("live_api.client_secret", "must not be empty"));
        }
        if self.timeout_ms == 0 {
            return Err(ConfigError::invalid("live_api.timeout_ms", "must be positive"));
        }
        Ok(())
    }
}

impl fmt::Debug for LiveApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveApiConfig")
            .field("base_url", &self.base_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("timeout_ms", &self.timeout_ms)
            .field("token_safety_margin_secs", &self.token_safety_margin_secs)
            .finish()
    }
}

/// Top-level shipping configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingConfig {
    /// Postal code packages ship from.
    pub origin_zip: String,
    /// Live rate API; absent means estimate-only.
    #[serde(default)]
    pub live_api: Option<LiveApiConfig>,
}

impl ShippingConfig {
    /// Creates an estimate-only configuration.
    #[must_use]
    pub fn new(origin_zip: impl Into<String>) -> Self {
        Self {
            origin_zip: origin_zip.into(),
            live_api: None,
        }
    }

    /// Enables live rates.
    #[must_use]
    pub fn with_live_api(mut self, live_api: LiveApiConfig) -> Self {
        self.live_api = Some(live_api);
        self
    }

    /// Loads from `parcel-rates.toml`, `.env` and the environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source is malformed or validation fails.
    pub fn load() -> ConfigResult<Self> {
        Self::load_from(None, None)
    }

    /// Loads like [`ShippingConfig::load`], reading `path` instead of the
    /// default file and letting `origin_zip` override every source. An
    /// explicit path must exist.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source is missing or malformed, or
    /// validation fails.
    pub fn load_from(path: Option<&Path>, origin_zip: Option<&str>) -> ConfigResult<Self> {
        if let Ok(env_file) = dotenvy::dotenv() {
            tracing::debug!(path = %env_file.display(), "loaded .env");
        }

        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(CONFIG_FILE).required(false),
        };

        let config: Self = Config::builder()
            .add_source(file)
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .set_override_option("origin_zip", origin_zip)?
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the document is malformed or validation fails.
    pub fn from_toml(document: &str) -> ConfigResult<Self> {
        let config: Self = Config::builder()
            .add_source(File::from_str(document, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every field.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` naming the first bad field.
    pub fn validate(&self) -> ConfigResult<()> {
        PostalCode::parse(&self.origin_zip)
            .map_err(|e| ConfigError::invalid("origin_zip", e.to_string()))?;
        if let Some(live_api) = &self.live_api {
            live_api.validate()?;
        }
        Ok(())
    }

    /// Returns true when live rates are configured.
    #[must_use]
    pub fn live_enabled(&self) -> bool {
        self.live_api.is_some()
    }
}
