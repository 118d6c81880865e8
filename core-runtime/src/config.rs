//! # Core Configuration Module
//!
//! Provides configuration management for the song catalog core.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a `CoreConfig`
//! instance that holds the storage, enrichment and logging settings plus the
//! HTTP bridge the enrichment client talks through. It enforces fail-fast
//! validation so a bad setting is reported before any pool is opened.
//!
//! ## Dependencies
//!
//! - `HttpClient` - Required whenever an enrichment endpoint is configured.
//!   When the `desktop-shims` feature is enabled a reqwest-backed client is
//!   injected automatically if none is provided.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::CoreConfig;
//!
//! let config = CoreConfig::builder()
//!     .database_url("sqlite:music.db")
//!     .metadata_api_url("http://localhost:8081/info")
//!     .build()?;
//! ```
//!
//! ### From the environment
//!
//! | Variable                    | Meaning                              | Default                    |
//! |-----------------------------|--------------------------------------|----------------------------|
//! | `DATABASE_URL`              | `sqlite:` URL of the catalog         | `sqlite:music_library.db`  |
//! | `DB_MAX_CONNECTIONS`        | Pool size                            | `5`                        |
//! | `EXTERNAL_API_URL`          | Song info endpoint                   | unset (enrichment fails)   |
//! | `EXTERNAL_API_TIMEOUT_SECS` | Per-request enrichment timeout       | `10`                       |
//! | `LOG_LEVEL`                 | `trace`/`debug`/`info`/`warn`/`error` | `info`                    |
//! | `LOG_FORMAT`                | `pretty`/`json`/`compact`            | build dependent            |
//! | `SEED_DEMO_DATA`            | Insert the demo catalog when empty   | `false`                    |

use crate::error::{Error, Result};
use crate::logging::{LogFormat, LogLevel, LoggingConfig};
use bridge_traits::HttpClient;
use std::sync::Arc;
use std::time::Duration;

/// Database URL used when none is configured
pub const DEFAULT_DATABASE_URL: &str = "sqlite:music_library.db";

/// Pool size used when none is configured
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Enrichment request timeout used when none is configured
pub const DEFAULT_METADATA_TIMEOUT: Duration = Duration::from_secs(10);

/// Core configuration for the song catalog.
///
/// Use [`CoreConfigBuilder`] or [`CoreConfig::from_env`] to construct
/// instances.
#[derive(Clone)]
pub struct CoreConfig {
    /// `sqlite:` URL of the catalog database
    pub database_url: String,

    /// Maximum number of pooled connections
    pub max_connections: u32,

    /// HTTP client for the enrichment service
    pub http_client: Option<Arc<dyn HttpClient>>,

    /// External song information service
    pub metadata_api: MetadataApiConfig,

    /// Logging settings
    pub logging: LoggingConfig,

    /// Insert the demo catalog on bootstrap when the catalog is empty
    pub seed_demo_data: bool,
}

impl std::fmt::Debug for CoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreConfig")
            .field("database_url", &self.database_url)
            .field("max_connections", &self.max_connections)
            .field(
                "http_client",
                &self.http_client.as_ref().map(|_| "HttpClient { ... }"),
            )
            .field("metadata_api", &self.metadata_api)
            .field("logging", &self.logging)
            .field("seed_demo_data", &self.seed_demo_data)
            .finish()
    }
}

/// Settings of the external song information service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataApiConfig {
    /// Endpoint URL; `None` leaves enrichment unconfigured
    pub base_url: Option<String>,

    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for MetadataApiConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: DEFAULT_METADATA_TIMEOUT,
        }
    }
}

impl MetadataApiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the endpoint URL
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Validates the endpoint settings
    pub fn validate(&self) -> Result<()> {
        if let Some(url) = &self.base_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(Error::Config(format!(
                    "Metadata API URL must be an http(s) URL, got '{}'",
                    url
                )));
            }
        }

        if self.timeout.is_zero() {
            return Err(Error::Config(
                "Metadata API timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    pub fn is_configured(&self) -> bool {
        self.base_url.is_some()
    }
}

impl CoreConfig {
    /// Creates a new builder for constructing a `CoreConfig`.
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }

    /// Builds a configuration from process environment variables.
    ///
    /// See the module documentation for the recognised variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary variable lookup.
    ///
    /// Unset or blank variables fall back to their defaults; present but
    /// malformed values are configuration errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut builder = CoreConfig::builder();

        if let Some(url) = var("DATABASE_URL") {
            builder = builder.database_url(url);
        }
        if let Some(raw) = var("DB_MAX_CONNECTIONS") {
            builder = builder.max_connections(parse_number("DB_MAX_CONNECTIONS", &raw)?);
        }

        let mut metadata_api = MetadataApiConfig::new();
        if let Some(url) = var("EXTERNAL_API_URL") {
            metadata_api = metadata_api.with_base_url(url);
        }
        if let Some(raw) = var("EXTERNAL_API_TIMEOUT_SECS") {
            let secs: u64 = parse_number("EXTERNAL_API_TIMEOUT_SECS", &raw)?;
            metadata_api = metadata_api.with_timeout(Duration::from_secs(secs));
        }
        builder = builder.metadata_api_config(metadata_api);

        let mut logging = LoggingConfig::default();
        if let Some(raw) = var("LOG_LEVEL") {
            logging = logging.with_level(raw.parse::<LogLevel>()?);
        }
        if let Some(raw) = var("LOG_FORMAT") {
            logging = logging.with_format(raw.parse::<LogFormat>()?);
        }
        builder = builder.logging(logging);

        if let Some(raw) = var("SEED_DEMO_DATA") {
            builder = builder.seed_demo_data(parse_flag("SEED_DEMO_DATA", &raw)?);
        }

        builder.build()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - Database URL is a non-empty `sqlite:` URL
    /// - Pool size is within 1..=100
    /// - Enrichment settings are well formed
    /// - An HTTP client is present when an enrichment endpoint is configured
    pub fn validate(&self) -> Result<()> {
        if self.database_url.trim().is_empty() {
            return Err(Error::Config("Database URL cannot be empty".to_string()));
        }

        if !self.database_url.starts_with("sqlite:") {
            return Err(Error::Config(format!(
                "Database URL must start with 'sqlite:', got '{}'",
                self.database_url
            )));
        }

        if self.max_connections == 0 {
            return Err(Error::Config(
                "Max connections must be greater than 0".to_string(),
            ));
        }

        if self.max_connections > 100 {
            return Err(Error::Config(
                "Max connections exceeds maximum of 100".to_string(),
            ));
        }

        self.metadata_api.validate()?;

        if self.metadata_api.is_configured() && self.http_client.is_none() {
            return Err(http_client_missing_error());
        }

        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.parse()
        .map_err(|_| Error::Config(format!("{} must be a number, got '{}'", key, raw)))
}

fn parse_flag(key: &str, raw: &str) -> Result<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::Config(format!(
            "{} must be a boolean, got '{}'",
            key, raw
        ))),
    }
}

fn http_client_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "HttpClient".to_string(),
        message: "An HttpClient implementation is required when a metadata API URL is set. \
                 Desktop: enable the 'desktop-shims' feature to use the default reqwest client. \
                 Otherwise inject one with .http_client()."
            .to_string(),
    }
}

#[cfg(feature = "desktop-shims")]
fn provide_default_http_client(timeout: Duration) -> Result<Option<Arc<dyn HttpClient>>> {
    let client = bridge_desktop::ReqwestHttpClient::with_timeout(timeout).map_err(|e| {
        Error::CapabilityMissing {
            capability: "HttpClient".to_string(),
            message: format!("Failed to create default reqwest client: {}", e),
        }
    })?;
    Ok(Some(Arc::new(client)))
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_http_client(_timeout: Duration) -> Result<Option<Arc<dyn HttpClient>>> {
    Ok(None)
}

/// Builder for [`CoreConfig`].
#[derive(Default)]
pub struct CoreConfigBuilder {
    database_url: Option<String>,
    max_connections: Option<u32>,
    http_client: Option<Arc<dyn HttpClient>>,
    metadata_api_config: Option<MetadataApiConfig>,
    logging: Option<LoggingConfig>,
    seed_demo_data: bool,
}

impl CoreConfigBuilder {
    /// Sets the database URL.
    ///
    /// # Examples
    ///
    /// ```
    /// use core_runtime::config::CoreConfig;
    ///
    /// let config = CoreConfig::builder()
    ///     .database_url("sqlite:catalog.db")
    ///     .build()?;
    /// assert_eq!(config.database_url, "sqlite:catalog.db");
    /// # Ok::<(), core_runtime::Error>(())
    /// ```
    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = Some(url.into());
        self
    }

    /// Sets the maximum number of pooled connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = Some(max);
        self
    }

    /// Sets the HTTP client used for enrichment.
    pub fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Sets the song information endpoint URL.
    pub fn metadata_api_url(mut self, url: impl Into<String>) -> Self {
        let config = self.metadata_api_config.take().unwrap_or_default();
        self.metadata_api_config = Some(config.with_base_url(url));
        self
    }

    /// Sets the full enrichment configuration.
    pub fn metadata_api_config(mut self, config: MetadataApiConfig) -> Self {
        self.metadata_api_config = Some(config);
        self
    }

    /// Sets the logging configuration.
    pub fn logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = Some(logging);
        self
    }

    /// Insert the demo catalog on bootstrap when the catalog is empty.
    pub fn seed_demo_data(mut self, enabled: bool) -> Self {
        self.seed_demo_data = enabled;
        self
    }

    /// Builds and validates the configuration.
    pub fn build(self) -> Result<CoreConfig> {
        let metadata_api = self.metadata_api_config.unwrap_or_default();

        let http_client = match self.http_client {
            Some(client) => Some(client),
            None if metadata_api.is_configured() => {
                provide_default_http_client(metadata_api.timeout)?
            }
            None => None,
        };

        let config = CoreConfig {
            database_url: self
                .database_url
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            max_connections: self.max_connections.unwrap_or(DEFAULT_MAX_CONNECTIONS),
            http_client,
            metadata_api,
            logging: self.logging.unwrap_or_default(),
            seed_demo_data: self.seed_demo_data,
        };

        config.validate()?;

        Ok(config)
    }
}
