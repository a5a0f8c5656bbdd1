//! Data models for the geomarketing clients
//!
//! This module contains the per-call inputs and flattened results organized by concern:
//! - Location: coordinates, client IP and the resolved location record
//! - Weather: weather request and current conditions
//! - Countries: the autocomplete country list

pub mod countries;
pub mod location;
pub mod weather;

// Re-export all public types for convenient access
pub use countries::CountryList;
pub use location::{ClientIp, Coordinates, LocationRequest, LocationResult};
pub use weather::{WeatherQuery, WeatherRequest, WeatherResult};
