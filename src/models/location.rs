//! Location inputs and the flattened location record

use crate::{GeoMarketingError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;

/// Latitude/longitude pair, stored exactly as supplied
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in decimal degrees
    pub latitude: String,
    /// Longitude in decimal degrees
    pub longitude: String,
}

impl Coordinates {
    /// Both values must be non-empty; no range check is done.
    pub fn new(latitude: impl Into<String>, longitude: impl Into<String>) -> Result<Self> {
        Ok(Self {
            latitude: require_latitude(latitude.into())?,
            longitude: require_longitude(longitude.into())?,
        })
    }

    /// Split an `"lat,lon"` string as returned by IP lookup services.
    pub fn parse_pair(loc: &str) -> Option<Self> {
        let (lat, lon) = loc.split_once(',')?;
        Self::new(lat.trim(), lon.trim()).ok()
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.latitude, self.longitude)
    }
}

/// A syntactically valid IPv4 or IPv6 address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientIp(IpAddr);

impl ClientIp {
    pub fn parse(ip: &str) -> Result<Self> {
        ip.parse::<IpAddr>()
            .map(Self)
            .map_err(|_| GeoMarketingError::invalid_ip("You need to give a valid IP address"))
    }

    #[must_use]
    pub fn addr(&self) -> IpAddr {
        self.0
    }
}

impl fmt::Display for ClientIp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Per-call input for location resolution.
///
/// Coordinates win over the client IP when both are present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationRequest {
    latitude: Option<String>,
    longitude: Option<String>,
    client_ip: Option<ClientIp>,
}

impl LocationRequest {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_client_ip(&mut self, ip: &str) -> Result<&mut Self> {
        self.client_ip = Some(ClientIp::parse(ip)?);
        Ok(self)
    }

    pub fn set_latitude(&mut self, latitude: impl Into<String>) -> Result<&mut Self> {
        self.latitude = Some(require_latitude(latitude.into())?);
        Ok(self)
    }

    pub fn set_longitude(&mut self, longitude: impl Into<String>) -> Result<&mut Self> {
        self.longitude = Some(require_longitude(longitude.into())?);
        Ok(self)
    }

    #[must_use]
    pub fn client_ip(&self) -> Option<ClientIp> {
        self.client_ip
    }

    #[must_use]
    pub fn latitude(&self) -> Option<&str> {
        self.latitude.as_deref()
    }

    #[must_use]
    pub fn longitude(&self) -> Option<&str> {
        self.longitude.as_deref()
    }

    /// Coordinates, if both halves were set
    #[must_use]
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (&self.latitude, &self.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinates {
                latitude: latitude.clone(),
                longitude: longitude.clone(),
            }),
            _ => None,
        }
    }
}

/// Flattened location record returned by both resolution paths
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationResult {
    pub country: Option<String>,
    pub city: Option<String>,
    pub postcode: Option<String>,
    pub region: Option<String>,
    pub lat: String,
    pub lng: String,
}

/// Keep the first entry of a `;`-separated postcode list
#[must_use]
pub fn first_postcode(raw: &str) -> String {
    raw.split(';').next().unwrap_or_default().to_string()
}

pub(crate) fn require_non_empty(value: String, message: &str) -> Result<String> {
    if value.trim().is_empty() {
        return Err(GeoMarketingError::invalid_argument(message));
    }
    Ok(value)
}

fn require_latitude(value: String) -> Result<String> {
    require_non_empty(value, "You need to set a valid latitude")
}

fn require_longitude(value: String) -> Result<String> {
    require_non_empty(value, "You need to set a valid longitude")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("192.168.0.1")]
    #[case("8.8.8.8")]
    #[case("0.0.0.0")]
    #[case("::1")]
    #[case("2001:db8::ff00:42:8329")]
    fn test_valid_client_ip(#[case] ip: &str) {
        let mut request = LocationRequest::new();
        request.set_client_ip(ip).unwrap();
        assert_eq!(request.client_ip().unwrap().to_string(), ip);
    }

    #[rstest]
    #[case("999.1.1.1")]
    #[case("not-an-ip")]
    #[case("")]
    #[case("1.2.3")]
    #[case("2001:db8:::1")]
    fn test_invalid_client_ip(#[case] ip: &str) {
        let mut request = LocationRequest::new();
        let err = request.set_client_ip(ip).unwrap_err();
        assert!(matches!(err, GeoMarketingError::InvalidIp { .. }));
        assert!(request.client_ip().is_none());
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn test_empty_coordinates_rejected(#[case] value: &str) {
        let mut request = LocationRequest::new();
        let err = request.set_latitude(value).unwrap_err();
        assert_eq!(err.to_string(), "You need to set a valid latitude");
        let err = request.set_longitude(value).unwrap_err();
        assert_eq!(err.to_string(), "You need to set a valid longitude");
    }

    #[test]
    fn test_coordinates_stored_verbatim() {
        let mut request = LocationRequest::new();
        request.set_latitude("48.8566").unwrap().set_longitude("2.3522").unwrap();
        assert_eq!(request.latitude(), Some("48.8566"));
        assert_eq!(request.longitude(), Some("2.3522"));
        assert_eq!(
            request.coordinates(),
            Some(Coordinates::new("48.8566", "2.3522").unwrap())
        );
    }

    #[test]
    fn test_zero_is_a_valid_coordinate() {
        let coordinates = Coordinates::new("0", "0").unwrap();
        assert_eq!(coordinates.to_string(), "0, 0");
    }

    #[test]
    fn test_half_set_coordinates() {
        let mut request = LocationRequest::new();
        request.set_latitude("48.8566").unwrap();
        assert!(request.coordinates().is_none());
    }

    #[test]
    fn test_parse_pair() {
        let coordinates = Coordinates::parse_pair("37.3860,-122.0838").unwrap();
        assert_eq!(coordinates.latitude, "37.3860");
        assert_eq!(coordinates.longitude, "-122.0838");

        assert!(Coordinates::parse_pair("37.3860").is_none());
        assert!(Coordinates::parse_pair(",").is_none());
    }

    #[rstest]
    #[case("75001;75002", "75001")]
    #[case("75001", "75001")]
    #[case("", "")]
    #[case("10115 ; 10117", "10115 ")]
    fn test_first_postcode(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(first_postcode(raw), expected);
    }
}
