//! Geolocation client: reverse geocoding, IP lookup and country-by-ISO lookup
//!
//! A location is resolved either from a latitude/longitude pair through the
//! reverse geocoding endpoint, or from a client IP. The IP path chains three
//! calls: the IP lookup itself, a country-by-ISO lookup for the full country
//! name, and a reverse geocoding call on the coordinates the IP lookup
//! returned, used only for the postcode.

use crate::config::GeoMarketingConfig;
use crate::http::{self, HttpClient};
use crate::models::location::first_postcode;
use crate::models::{ClientIp, Coordinates, LocationRequest, LocationResult};
use crate::{GeoMarketingError, Result};
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Deserialize)]
struct ReverseGeocodingResponse {
    #[serde(default)]
    error_message: Option<String>,
    /// Nominatim reports failures in `error` rather than `error_message`
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    address: Option<Address>,
}

#[derive(Debug, Default, Deserialize)]
struct Address {
    country: Option<String>,
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    municipality: Option<String>,
    postcode: Option<String>,
    state: Option<String>,
}

impl ReverseGeocodingResponse {
    fn upstream_error(&self) -> Option<&str> {
        [&self.error_message, &self.error]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|message| !message.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct IpLookupResponse {
    country: Option<String>,
    city: Option<String>,
    region: Option<String>,
    loc: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CountryEntry {
    name: String,
}

/// Client resolving locations from coordinates or a client IP
#[derive(Debug, Clone)]
pub struct GeolocationClient {
    http: HttpClient,
    ip_lookup_url: String,
    reverse_geocoding_url: String,
    country_iso_url: String,
}

impl GeolocationClient {
    pub fn new(config: &GeoMarketingConfig) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new(&config.http)?,
            ip_lookup_url: config.geolocation.ip_lookup_url.clone(),
            reverse_geocoding_url: config.geolocation.reverse_geocoding_url.clone(),
            country_iso_url: config.geolocation.country_iso_url.clone(),
        })
    }

    /// Resolve a location, preferring coordinates over the client IP
    pub fn resolve_location(&self, request: &LocationRequest) -> Result<LocationResult> {
        if let Some(coordinates) = request.coordinates() {
            self.resolve_by_coordinates(&coordinates)
        } else if let Some(ip) = request.client_ip() {
            self.resolve_by_ip(&ip)
        } else {
            Err(GeoMarketingError::missing_location(
                "You need to set the longitude and latitude or the clientIP",
            ))
        }
    }

    /// Reverse geocode a coordinate pair; the result echoes the input lat/lng
    #[instrument(skip(self, coordinates), fields(lat = %coordinates.latitude, lon = %coordinates.longitude))]
    pub fn resolve_by_coordinates(&self, coordinates: &Coordinates) -> Result<LocationResult> {
        let response = self.http.get(
            &self.reverse_geocoding_url,
            &[
                ("format", "json"),
                ("lat", coordinates.latitude.as_str()),
                ("lon", coordinates.longitude.as_str()),
            ],
        )?;

        if response.status() != StatusCode::OK {
            warn!("Reverse geocoding returned status {}", response.status());
            return Err(GeoMarketingError::reverse_geocoding(format!(
                "The reverse geocoding API can't be requested for the moment, url: {}?format=json&lat={}&lon={}",
                self.reverse_geocoding_url, coordinates.latitude, coordinates.longitude
            )));
        }

        let body: ReverseGeocodingResponse = http::decode(response, |e| {
            GeoMarketingError::reverse_geocoding(format!(
                "Invalid reverse geocoding data received: {e}"
            ))
        })?;

        if let Some(message) = body.upstream_error() {
            warn!("Reverse geocoding reported an error: {}", message);
            return Err(GeoMarketingError::reverse_geocoding(message));
        }

        let address = body.address.unwrap_or_default();
        let city = address
            .city
            .or(address.town)
            .or(address.village)
            .or(address.municipality);

        let result = LocationResult {
            country: address.country,
            city,
            postcode: address.postcode.as_deref().map(first_postcode),
            region: address.state,
            lat: coordinates.latitude.clone(),
            lng: coordinates.longitude.clone(),
        };

        info!("Reverse geocoded {} to {:?}", coordinates, result.city);
        Ok(result)
    }

    /// Resolve a location from a client IP
    #[instrument(skip(self, ip), fields(ip = %ip))]
    pub fn resolve_by_ip(&self, ip: &ClientIp) -> Result<LocationResult> {
        let url = format!("{}/{}", self.ip_lookup_url.trim_end_matches('/'), ip);
        let response = self.http.get(&url, &[])?;

        if response.status() != StatusCode::OK {
            warn!("IP lookup returned status {}", response.status());
            return Err(GeoMarketingError::ip_geolocation(format!(
                "The API is not accessible actually with the request: {url}"
            )));
        }

        let body: IpLookupResponse = http::decode(response, |e| {
            GeoMarketingError::ip_geolocation(format!("Invalid IP lookup data received: {e}"))
        })?;

        let iso_code = body.country.as_deref().ok_or_else(|| {
            GeoMarketingError::ip_geolocation(format!("No country returned for {ip}"))
        })?;
        let country = self.resolve_country_name_from_iso(iso_code)?;

        let coordinates = body
            .loc
            .as_deref()
            .and_then(Coordinates::parse_pair)
            .ok_or_else(|| {
                GeoMarketingError::ip_geolocation(format!(
                    "No usable coordinates returned for {ip}: {:?}",
                    body.loc
                ))
            })?;
        debug!("IP {} located at {}", ip, coordinates);

        let postcode = self.resolve_by_coordinates(&coordinates)?.postcode;

        Ok(LocationResult {
            country: Some(country),
            city: body.city,
            postcode,
            region: body.region,
            lat: coordinates.latitude,
            lng: coordinates.longitude,
        })
    }

    /// Look up the full country name for a two-letter ISO code
    #[instrument(skip(self))]
    pub fn resolve_country_name_from_iso(&self, code: &str) -> Result<String> {
        let response = self.http.get(&self.country_iso_url, &[("codes", code)])?;

        if response.status() != StatusCode::OK {
            warn!("Country lookup returned status {}", response.status());
            return Err(GeoMarketingError::country_iso(
                "The connection with the country API failed",
            ));
        }

        let entries: Vec<CountryEntry> = http::decode(response, |e| {
            GeoMarketingError::country_iso(format!("Invalid country data received: {e}"))
        })?;

        entries
            .into_iter()
            .next()
            .map(|entry| entry.name)
            .ok_or_else(|| GeoMarketingError::country_iso(format!("No country found for code {code}")))
    }
}
