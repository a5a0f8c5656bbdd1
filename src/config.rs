//! Configuration management for the geomarketing clients
//!
//! Handles loading configuration from files and environment variables and
//! validates the upstream endpoints before any client is built.

use crate::{GeoMarketingError, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeoMarketingConfig {
    /// Settings shared by every outbound request
    pub http: HttpConfig,
    /// Country list endpoint
    pub countries: CountriesConfig,
    /// IP lookup, reverse geocoding and country-by-ISO endpoints
    pub geolocation: GeolocationConfig,
    /// Weather endpoint and API key
    pub weather: WeatherConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// HTTP transport settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
    /// User agent sent with every request (Nominatim rejects anonymous clients)
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountriesConfig {
    /// Endpoint returning every country as a JSON array
    #[serde(default = "default_countries_url")]
    pub list_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeolocationConfig {
    /// IP geolocation endpoint; the client IP is appended to the path
    #[serde(default = "default_ip_lookup_url")]
    pub ip_lookup_url: String,
    /// Reverse geocoding endpoint taking `lat`/`lon` query parameters
    #[serde(default = "default_reverse_geocoding_url")]
    pub reverse_geocoding_url: String,
    /// Country lookup endpoint taking a `codes` query parameter
    #[serde(default = "default_country_iso_url")]
    pub country_iso_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Base URL for the current weather endpoint
    #[serde(default = "default_weather_url")]
    pub base_url: String,
    /// Weather API key, sent as `appid`
    pub api_key: Option<String>,
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
fn default_timeout() -> u32 {
    30
}

fn default_user_agent() -> String {
    format!("geomarketing/{}", crate::VERSION)
}

fn default_countries_url() -> String {
    "https://restcountries.com/v2/all".to_string()
}

fn default_ip_lookup_url() -> String {
    "https://ipinfo.io".to_string()
}

fn default_reverse_geocoding_url() -> String {
    "https://nominatim.openstreetmap.org/reverse".to_string()
}

fn default_country_iso_url() -> String {
    "https://restcountries.com/v2/alpha".to_string()
}

fn default_weather_url() -> String {
    "https://api.openweathermap.org/data/2.5/weather".to_string()
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
            timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for CountriesConfig {
    fn default() -> Self {
        Self {
            list_url: default_countries_url(),
        }
    }
}

impl Default for GeolocationConfig {
    fn default() -> Self {
        Self {
            ip_lookup_url: default_ip_lookup_url(),
            reverse_geocoding_url: default_reverse_geocoding_url(),
            country_iso_url: default_country_iso_url(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_weather_url(),
            api_key: None,
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

impl GeoMarketingConfig {
    /// Load configuration from the default file location and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    ///
    /// Environment variables override file values, e.g.
    /// `GEOMARKETING_WEATHER__API_KEY` sets `weather.api_key`.
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

        builder = builder.add_source(
            Environment::with_prefix("GEOMARKETING")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder.build().map_err(|e| {
            GeoMarketingError::config(format!("Failed to build configuration: {e}"))
        })?;

        let config: GeoMarketingConfig = settings.try_deserialize().map_err(|e| {
            GeoMarketingError::config(format!("Failed to deserialize configuration: {e}"))
        })?;

        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("geomarketing").join("config.toml"))
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_keys()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate API keys and credentials
    pub fn validate_api_keys(&self) -> Result<()> {
        if let Some(api_key) = &self.weather.api_key {
            if api_key.trim().is_empty() {
                return Err(GeoMarketingError::config(
                    "Weather API key cannot be empty if provided. Either remove it or provide a valid key.",
                ));
            }
        }

        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.http.timeout_seconds == 0 {
            return Err(GeoMarketingError::config(
                "HTTP timeout must be at least 1 second",
            ));
        }

        if self.http.timeout_seconds > 300 {
            return Err(GeoMarketingError::config(
                "HTTP timeout cannot exceed 300 seconds",
            ));
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(GeoMarketingError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            )));
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(GeoMarketingError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            )));
        }

        let endpoints = [
            ("countries.list_url", &self.countries.list_url),
            ("geolocation.ip_lookup_url", &self.geolocation.ip_lookup_url),
            (
                "geolocation.reverse_geocoding_url",
                &self.geolocation.reverse_geocoding_url,
            ),
            ("geolocation.country_iso_url", &self.geolocation.country_iso_url),
            ("weather.base_url", &self.weather.base_url),
        ];
        for (name, url) in endpoints {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(GeoMarketingError::config(format!(
                    "{name} must be a valid HTTP or HTTPS URL"
                )));
            }
        }

        Ok(())
    }

    /// Point every endpoint at a single base URL; used to aim the clients at a
    /// local mock server or a proxy.
    #[must_use]
    pub fn with_base_url(mut self, base: &str) -> Self {
        let base = base.trim_end_matches('/');
        self.countries.list_url = format!("{base}/all");
        self.geolocation.ip_lookup_url = base.to_string();
        self.geolocation.reverse_geocoding_url = format!("{base}/reverse");
        self.geolocation.country_iso_url = format!("{base}/alpha");
        self.weather.base_url = format!("{base}/weather");
        self
    }
}
