//! Error types and handling for the geomarketing clients

use thiserror::Error;

/// Main error type for the geomarketing clients
///
/// Every upstream API has its own variant so callers can tell which lookup
/// failed. The message is surfaced unchanged through `Display`.
#[derive(Error, Debug)]
pub enum GeoMarketingError {
    /// Empty latitude, longitude or city, or an unusable combination of them
    #[error("{message}")]
    InvalidArgument { message: String },

    /// Client IP is not a syntactically valid IPv4/IPv6 address
    #[error("{message}")]
    InvalidIp { message: String },

    /// Neither coordinates nor a client IP were supplied
    #[error("{message}")]
    MissingLocation { message: String },

    /// Country list endpoint failed
    #[error("{message}")]
    CountryList { message: String },

    /// Country-by-ISO endpoint failed
    #[error("{message}")]
    CountryIso { message: String },

    /// Reverse geocoding endpoint failed or reported an error
    #[error("{message}")]
    ReverseGeocoding { message: String },

    /// IP geolocation endpoint failed
    #[error("{message}")]
    IpGeolocation { message: String },

    /// Weather endpoint failed
    #[error("{message}")]
    Weather { message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Transport-level failure (DNS, connect, timeout, ...)
    #[error("HTTP error: {source}")]
    Http {
        #[from]
        source: reqwest::Error,
    },
}

impl GeoMarketingError {
    pub fn invalid_argument<S: Into<String>>(message: S) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn invalid_ip<S: Into<String>>(message: S) -> Self {
        Self::InvalidIp {
            message: message.into(),
        }
    }

    pub fn missing_location<S: Into<String>>(message: S) -> Self {
        Self::MissingLocation {
            message: message.into(),
        }
    }

    pub fn country_list<S: Into<String>>(message: S) -> Self {
        Self::CountryList {
            message: message.into(),
        }
    }

    pub fn country_iso<S: Into<String>>(message: S) -> Self {
        Self::CountryIso {
            message: message.into(),
        }
    }

    pub fn reverse_geocoding<S: Into<String>>(message: S) -> Self {
        Self::ReverseGeocoding {
            message: message.into(),
        }
    }

    pub fn ip_geolocation<S: Into<String>>(message: S) -> Self {
        Self::IpGeolocation {
            message: message.into(),
        }
    }

    pub fn weather<S: Into<String>>(message: S) -> Self {
        Self::Weather {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Returns true for failures caused by caller input rather than upstream APIs
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument { .. } | Self::InvalidIp { .. } | Self::MissingLocation { .. }
        )
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            Self::Http { .. } => {
                "Unable to connect to external services. Please check your internet connection."
                    .to_string()
            }
            Self::InvalidArgument { message }
            | Self::InvalidIp { message }
            | Self::MissingLocation { message }
            | Self::CountryList { message }
            | Self::CountryIso { message }
            | Self::ReverseGeocoding { message }
            | Self::IpGeolocation { message }
            | Self::Weather { message } => message.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_err = GeoMarketingError::config("missing API key");
        assert!(matches!(config_err, GeoMarketingError::Config { .. }));

        let ip_err = GeoMarketingError::invalid_ip("bad ip");
        assert!(matches!(ip_err, GeoMarketingError::InvalidIp { .. }));

        let weather_err = GeoMarketingError::weather("Invalid API key");
        assert!(matches!(weather_err, GeoMarketingError::Weather { .. }));
    }

    #[test]
    fn test_upstream_message_is_displayed_unchanged() {
        let err = GeoMarketingError::weather("Invalid API key");
        assert_eq!(err.to_string(), "Invalid API key");

        let err = GeoMarketingError::reverse_geocoding("Unable to geocode");
        assert_eq!(err.to_string(), "Unable to geocode");
    }

    #[test]
    fn test_input_errors() {
        assert!(GeoMarketingError::invalid_argument("x").is_input_error());
        assert!(GeoMarketingError::missing_location("x").is_input_error());
        assert!(!GeoMarketingError::country_iso("x").is_input_error());
    }

    #[test]
    fn test_user_messages() {
        let config_err = GeoMarketingError::config("test");
        assert!(config_err.user_message().contains("Configuration error"));
        assert_eq!(config_err.to_string(), "Configuration error: test");

        let list_err = GeoMarketingError::country_list("down");
        assert_eq!(list_err.user_message(), "down");
    }
}
