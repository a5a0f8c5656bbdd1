//! Clients for the upstream country, geolocation and weather APIs
//!
//! Each client owns its HTTP client and endpoint configuration and issues one
//! blocking request per call (the IP geolocation path chains three).

pub mod countries;
pub mod geolocation;
pub mod weather;

pub use countries::CountryDirectoryClient;
pub use geolocation::GeolocationClient;
pub use weather::WeatherClient;
