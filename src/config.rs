//! Configuration loading and constants.
//!
//! Loads application configuration from an optional TOML file, applies environment
//! overrides, and defines constants for the upstream data.gov.il datastore, HTTP
//! response headers, logging, and default paths. `AppConfig` is the root configuration
//! struct containing all settings.

use const_format::formatcp;
use serde::Deserialize;
use std::path::Path;

// =============================================================================
// Upstream Registry
// =============================================================================
// The vehicle registry is a CKAN datastore resource published on data.gov.il.
// Lookups go through `datastore_search` with an exact-match `filters` object.

/// Base URL of the government open-data portal
pub const DEFAULT_UPSTREAM_BASE_URL: &str = "https://data.gov.il";

/// Path of the CKAN datastore search action, relative to the base URL
pub const DATASTORE_SEARCH_PATH: &str = "/api/3/action/datastore_search";

/// Resource identifier of the private and commercial vehicles table
pub const DEFAULT_RESOURCE_ID: &str = "053cea08-09bc-40ec-8f7a-156f0677aff3";

/// Column holding the license plate number
pub const DEFAULT_PLATE_FIELD: &str = "mispar_rechev";

/// Upper bound on a single upstream call, in seconds
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;

/// Number of records requested per lookup
pub const UPSTREAM_RESULT_LIMIT: u32 = 1;

/// User-Agent sent to the upstream portal
pub const DEFAULT_USER_AGENT: &str =
    formatcp!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

// =============================================================================
// HTTP Server
// =============================================================================

/// Default bind address
pub const DEFAULT_HTTP_HOST: &str = "0.0.0.0";

/// Default listen port when neither PORT nor config sets one
pub const DEFAULT_HTTP_PORT: u16 = 3000;

/// Environment variable that overrides the listen port
pub const PORT_ENV_VAR: &str = "PORT";

/// Lookups are live pass-through; never let intermediaries store them
pub const CACHE_CONTROL_NO_STORE: &str = "no-store";

/// Response header echoing the per-request correlation ID
pub const REQUEST_ID_HEADER: &str = "x-request-id";

// =============================================================================
// Default Paths and Strings
// =============================================================================

/// Configuration file picked up automatically when present
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Default log filter when RUST_LOG is not set
pub const DEFAULT_LOG_FILTER: &str = "plate_relay=debug,tower_http=info";

/// Default log format (text or json)
pub const DEFAULT_LOG_FORMAT: &str = "text";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub http: HttpServerConfig,
    /// Vehicle registry settings
    #[serde(default)]
    pub upstream: UpstreamConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpServerConfig {
    #[serde(default = "HttpServerConfig::default_host")]
    pub host: String,
    #[serde(default = "HttpServerConfig::default_port")]
    pub port: u16,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
        }
    }
}

impl HttpServerConfig {
    fn default_host() -> String {
        DEFAULT_HTTP_HOST.to_string()
    }

    fn default_port() -> u16 {
        DEFAULT_HTTP_PORT
    }
}

/// Upstream datastore configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    /// Scheme and host of the CKAN portal (default: https://data.gov.il)
    #[serde(default = "UpstreamConfig::default_base_url")]
    pub base_url: String,
    /// Datastore resource holding vehicle records
    #[serde(default = "UpstreamConfig::default_resource_id")]
    pub resource_id: String,
    /// Column matched exactly against the normalized plate
    #[serde(default = "UpstreamConfig::default_plate_field")]
    pub plate_field: String,
    /// Request timeout in seconds (default: 10)
    #[serde(default = "UpstreamConfig::default_timeout")]
    pub timeout_seconds: u64,
    #[serde(default = "UpstreamConfig::default_user_agent")]
    pub user_agent: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: Self::default_base_url(),
            resource_id: Self::default_resource_id(),
            plate_field: Self::default_plate_field(),
            timeout_seconds: Self::default_timeout(),
            user_agent: Self::default_user_agent(),
        }
    }
}

impl UpstreamConfig {
    fn default_base_url() -> String {
        DEFAULT_UPSTREAM_BASE_URL.to_string()
    }

    fn default_resource_id() -> String {
        DEFAULT_RESOURCE_ID.to_string()
    }

    fn default_plate_field() -> String {
        DEFAULT_PLATE_FIELD.to_string()
    }

    fn default_timeout() -> u64 {
        DEFAULT_UPSTREAM_TIMEOUT_SECS
    }

    fn default_user_agent() -> String {
        DEFAULT_USER_AGENT.to_string()
    }

    /// Full URL of the datastore search action
    pub fn search_url(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            DATASTORE_SEARCH_PATH
        )
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log format: "text" (human-readable, default) or "json" (structured)
    #[serde(default = "LoggingConfig::default_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: DEFAULT_LOG_FORMAT.to_string(),
        }
    }
}

impl LoggingConfig {
    fn default_format() -> String {
        DEFAULT_LOG_FORMAT.to_string()
    }

    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Resolve configuration for startup.
    ///
    /// An explicit path must exist. Without one, `config/default.toml` is used when
    /// present and built-in defaults otherwise. The `PORT` environment variable is
    /// applied last.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match explicit {
            Some(path) => Self::load(path)?,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => Self::load(DEFAULT_CONFIG_PATH)?,
            None => Self::default(),
        };

        config.apply_port_override(std::env::var(PORT_ENV_VAR).ok().as_deref())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Replace the listen port with an environment-provided value, if any.
    pub fn apply_port_override(&mut self, value: Option<&str>) -> Result<(), ConfigError> {
        let Some(raw) = value.map(str::trim).filter(|v| !v.is_empty()) else {
            return Ok(());
        };

        self.http.port = raw.parse().map_err(|_| ConfigError::Env {
            var: PORT_ENV_VAR,
            value: raw.to_string(),
        })?;
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let upstream = &self.upstream;

        if !(upstream.base_url.starts_with("http://") || upstream.base_url.starts_with("https://"))
        {
            return Err(ConfigError::Validation(format!(
                "upstream.base_url must be an http(s) URL, got '{}'",
                upstream.base_url
            )));
        }
        if upstream.resource_id.trim().is_empty() {
            return Err(ConfigError::Validation(
                "upstream.resource_id must not be empty".to_string(),
            ));
        }
        if upstream.plate_field.trim().is_empty() {
            return Err(ConfigError::Validation(
                "upstream.plate_field must not be empty".to_string(),
            ));
        }
        if upstream.timeout_seconds == 0 {
            return Err(ConfigError::Validation(
                "upstream.timeout_seconds must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid value for {var}: '{value}'")]
    Env { var: &'static str, value: String },
    #[error("Configuration error: {0}")]
    Validation(String),
}
