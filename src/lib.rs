//! `geomarketing` - country autocomplete, geolocation and weather lookups
//!
//! This library wraps three unrelated web APIs behind small blocking clients:
//! a country directory for autocompletion, a geolocation client resolving
//! coordinates or a client IP to an address, and a current-weather client.

pub mod api;
pub mod config;
pub mod error;
pub mod http;
pub mod logging;
pub mod models;

// Re-export core types for public API
pub use api::{CountryDirectoryClient, GeolocationClient, WeatherClient};
pub use config::GeoMarketingConfig;
pub use error::GeoMarketingError;
pub use models::{
    ClientIp, Coordinates, CountryList, LocationRequest, LocationResult, WeatherQuery,
    WeatherRequest, WeatherResult,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, GeoMarketingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
