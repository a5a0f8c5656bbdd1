//! Weather inputs and the flattened current-conditions record

use super::location::{Coordinates, require_non_empty};
use crate::{GeoMarketingError, Result};
use serde::{Deserialize, Serialize};

const KELVIN_OFFSET: f64 = 273.15;

/// Convert a Kelvin reading to Celsius
#[must_use]
pub fn kelvin_to_celsius(kelvin: f64) -> f64 {
    kelvin - KELVIN_OFFSET
}

/// Per-call input for a weather lookup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeatherRequest {
    latitude: Option<String>,
    longitude: Option<String>,
    search_city: Option<String>,
}

/// The single location form a weather request resolves to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WeatherQuery {
    Coordinates(Coordinates),
    City(String),
}

impl WeatherRequest {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_latitude(&mut self, latitude: impl Into<String>) -> Result<&mut Self> {
        self.latitude = Some(require_non_empty(
            latitude.into(),
            "You need to set a correct latitude",
        )?);
        Ok(self)
    }

    pub fn set_longitude(&mut self, longitude: impl Into<String>) -> Result<&mut Self> {
        self.longitude = Some(require_non_empty(
            longitude.into(),
            "You need to set a correct longitude",
        )?);
        Ok(self)
    }

    pub fn set_search_city(&mut self, city: impl Into<String>) -> Result<&mut Self> {
        self.search_city = Some(require_non_empty(
            city.into(),
            "You need to set a valid city for search",
        )?);
        Ok(self)
    }

    #[must_use]
    pub fn latitude(&self) -> Option<&str> {
        self.latitude.as_deref()
    }

    #[must_use]
    pub fn longitude(&self) -> Option<&str> {
        self.longitude.as_deref()
    }

    #[must_use]
    pub fn search_city(&self) -> Option<&str> {
        self.search_city.as_deref()
    }

    /// Resolve to exactly one location form.
    ///
    /// Coordinates and a city together are rejected, as is a request with
    /// neither.
    pub fn query(&self) -> Result<WeatherQuery> {
        let coordinates = match (&self.latitude, &self.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinates {
                latitude: latitude.clone(),
                longitude: longitude.clone(),
            }),
            _ => None,
        };

        match (coordinates, &self.search_city) {
            (Some(_), Some(_)) => Err(GeoMarketingError::invalid_argument(
                "You need to set either the latitude and longitude or a city, not both",
            )),
            (Some(coordinates), None) => Ok(WeatherQuery::Coordinates(coordinates)),
            (None, Some(city)) => Ok(WeatherQuery::City(city.clone())),
            (None, None) => Err(GeoMarketingError::invalid_argument(
                "You need to set the latitude and longitude or a city for search",
            )),
        }
    }
}

/// Current weather conditions, temperatures in Celsius
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherResult {
    /// Relative humidity in %
    pub humidity: u32,
    /// Pressure in hPa
    pub pressure: u32,
    /// Primary condition, e.g. "Clouds"
    pub weather: String,
    pub description: String,
    /// Wind speed in m/s
    #[serde(rename = "windSpeed")]
    pub wind_speed: f64,
    #[serde(rename = "tempActual")]
    pub temp_actual: f64,
    pub temp_max: f64,
    pub temp_min: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kelvin_to_celsius() {
        assert!((kelvin_to_celsius(300.0) - 26.85).abs() < 1e-9);
        assert!(kelvin_to_celsius(273.15).abs() < 1e-9);
    }

    #[test]
    fn test_setters_reject_empty_values() {
        let mut request = WeatherRequest::new();
        assert_eq!(
            request.set_latitude("").unwrap_err().to_string(),
            "You need to set a correct latitude"
        );
        assert_eq!(
            request.set_longitude(" ").unwrap_err().to_string(),
            "You need to set a correct longitude"
        );
        assert_eq!(
            request.set_search_city("").unwrap_err().to_string(),
            "You need to set a valid city for search"
        );
        assert_eq!(request, WeatherRequest::new());
    }

    #[test]
    fn test_query_by_coordinates() {
        let mut request = WeatherRequest::new();
        request.set_latitude("51.5").unwrap().set_longitude("-0.12").unwrap();
        assert_eq!(
            request.query().unwrap(),
            WeatherQuery::Coordinates(Coordinates::new("51.5", "-0.12").unwrap())
        );
    }

    #[test]
    fn test_query_by_city() {
        let mut request = WeatherRequest::new();
        request.set_search_city("London").unwrap();
        assert_eq!(request.query().unwrap(), WeatherQuery::City("London".into()));
    }

    #[test]
    fn test_query_rejects_both_modes() {
        let mut request = WeatherRequest::new();
        request
            .set_latitude("51.5")
            .unwrap()
            .set_longitude("-0.12")
            .unwrap()
            .set_search_city("London")
            .unwrap();
        let err = request.query().unwrap_err();
        assert!(matches!(err, GeoMarketingError::InvalidArgument { .. }));
    }

    #[test]
    fn test_query_rejects_missing_input() {
        let mut request = WeatherRequest::new();
        assert!(request.query().is_err());

        // latitude alone is not a coordinate pair
        request.set_latitude("51.5").unwrap();
        assert!(request.query().is_err());
    }

    #[test]
    fn test_result_serializes_with_upstream_keys() {
        let result = WeatherResult {
            humidity: 81,
            pressure: 1012,
            weather: "Clouds".into(),
            description: "broken clouds".into(),
            wind_speed: 4.1,
            temp_actual: 12.5,
            temp_max: 14.0,
            temp_min: 11.0,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["windSpeed"], 4.1);
        assert_eq!(json["tempActual"], 12.5);
        assert_eq!(json["temp_max"], 14.0);
        assert_eq!(json["weather"], "Clouds");
        assert!(json["humidity"].is_u64());
        assert_eq!(json["pressure"], 1012);
        assert!(serde_json::to_string(&result).unwrap().contains("\"humidity\":81,"));
    }
}
