//! Configuration management for the weather-near application
//!
//! Handles loading configuration from files and environment variables
//! and provides validation for all configuration settings.

use crate::WeatherNearError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Outbound HTTP settings
    #[serde(default)]
    pub http: HttpConfig,
    /// Upstream service locations
    #[serde(default)]
    pub endpoints: EndpointConfig,
    /// Forecast cache settings
    #[serde(default)]
    pub cache: CacheConfig,
    /// Inbound HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Outbound HTTP client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Identifying User-Agent sent on every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_http_timeout")]
    pub timeout_seconds: u32,
    /// Permit plain-HTTP upstreams (local test doubles only)
    #[serde(default)]
    pub allow_insecure: bool,
}

/// Upstream endpoint base URLs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Nominatim-compatible search service
    #[serde(default = "default_geocoder_base_url")]
    pub geocoder_base_url: String,
    /// api.weather.gov-compatible points service
    #[serde(default = "default_forecast_base_url")]
    pub forecast_base_url: String,
}

/// Cache configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Entry lifetime in minutes
    #[serde(default = "default_cache_ttl")]
    pub ttl_minutes: u32,
    /// How often expired entries are swept, in seconds
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_seconds: u32,
}

/// Inbound server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    /// Request timeout applied to every inbound request, in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u32,
    /// PEM certificate for serving HTTPS
    #[serde(default)]
    pub tls_cert_path: Option<PathBuf>,
    /// PEM private key for serving HTTPS
    #[serde(default)]
    pub tls_key_path: Option<PathBuf>,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_user_agent() -> String {
    "weather-script (your-email@example.com)".to_string()
}

fn default_http_timeout() -> u32 {
    10
}

fn default_geocoder_base_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_forecast_base_url() -> String {
    "https://api.weather.gov".to_string()
}

fn default_cache_ttl() -> u32 {
    30
}

fn default_sweep_interval() -> u32 {
    300
}

fn default_server_host() -> String {
    "0.0.0.0".to_string()
}

fn default_server_port() -> u16 {
    3000
}

fn default_request_timeout() -> u32 {
    60
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_seconds: default_http_timeout(),
            allow_insecure: false,
        }
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            geocoder_base_url: default_geocoder_base_url(),
            forecast_base_url: default_forecast_base_url(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_minutes: default_cache_ttl(),
            sweep_interval_seconds: default_sweep_interval(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            request_timeout_seconds: default_request_timeout(),
            tls_cert_path: None,
            tls_key_path: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl HttpConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.into())
    }
}

impl CacheConfig {
    #[must_use]
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(u64::from(self.ttl_minutes) * 60)
    }

    #[must_use]
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_seconds.into())
    }
}

impl AppConfig {
    /// Load configuration from `config_path`, or the default location when `None`
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // WEATHER_NEAR_CACHE__TTL_MINUTES=5 overrides cache.ttl_minutes
        builder = builder.add_source(
            Environment::with_prefix("WEATHER_NEAR")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: AppConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("weather-near").join("config.toml"))
    }

    /// Apply default values to blank configuration fields
    pub fn apply_defaults(&mut self) {
        if self.http.user_agent.trim().is_empty() {
            self.http.user_agent = default_user_agent();
        }
        if self.http.timeout_seconds == 0 {
            self.http.timeout_seconds = default_http_timeout();
        }
        if self.endpoints.geocoder_base_url.is_empty() {
            self.endpoints.geocoder_base_url = default_geocoder_base_url();
        }
        if self.endpoints.forecast_base_url.is_empty() {
            self.endpoints.forecast_base_url = default_forecast_base_url();
        }
        if self.cache.ttl_minutes == 0 {
            self.cache.ttl_minutes = default_cache_ttl();
        }
        if self.cache.sweep_interval_seconds == 0 {
            self.cache.sweep_interval_seconds = default_sweep_interval();
        }
        if self.server.request_timeout_seconds == 0 {
            self.server.request_timeout_seconds = default_request_timeout();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        self.validate_tls_pair()?;
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> crate::Result<()> {
        if self.http.timeout_seconds > 120 {
            return Err(WeatherNearError::config("HTTP timeout cannot exceed 120 seconds"));
        }

        if self.cache.ttl_minutes > 24 * 60 {
            return Err(WeatherNearError::config("Cache TTL cannot exceed 1440 minutes (1 day)"));
        }

        if self.server.port == 0 {
            return Err(WeatherNearError::config("Server port must be non-zero"));
        }

        Ok(())
    }

    fn validate_string_values(&self) -> crate::Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(WeatherNearError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            )));
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(WeatherNearError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            )));
        }

        for (name, url) in [
            ("geocoder_base_url", &self.endpoints.geocoder_base_url),
            ("forecast_base_url", &self.endpoints.forecast_base_url),
        ] {
            let secure = url.starts_with("https://");
            let insecure_ok = self.http.allow_insecure && url.starts_with("http://");
            if !secure && !insecure_ok {
                return Err(WeatherNearError::config(format!(
                    "Endpoint {name} must be an HTTPS URL, got '{url}'"
                )));
            }
        }

        Ok(())
    }

    fn validate_tls_pair(&self) -> crate::Result<()> {
        match (&self.server.tls_cert_path, &self.server.tls_key_path) {
            (Some(_), None) | (None, Some(_)) => Err(WeatherNearError::config(
                "tls_cert_path and tls_key_path must be set together",
            )),
            _ => Ok(()),
        }
    }
}
