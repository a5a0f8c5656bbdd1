//! Current weather client for OpenWeatherMap-compatible endpoints

use crate::config::GeoMarketingConfig;
use crate::http::{self, HttpClient};
use crate::models::weather::kelvin_to_celsius;
use crate::models::{WeatherQuery, WeatherRequest, WeatherResult};
use crate::{GeoMarketingError, Result};
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{error, info, instrument, warn};

const INVALID_KEY: &str = "API Key isn't valid";
const REQUEST_FAILED: &str = "An error occurred when attempted to request the weather webservice";

/// Current weather response structures
mod openweather {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct CurrentResponse {
        pub main: Main,
        pub weather: Vec<Condition>,
        pub wind: Wind,
    }

    /// Temperatures are in Kelvin
    #[derive(Debug, Deserialize)]
    pub struct Main {
        pub humidity: u32,
        pub pressure: u32,
        pub temp: f64,
        pub temp_max: f64,
        pub temp_min: f64,
    }

    #[derive(Debug, Deserialize)]
    pub struct Condition {
        pub main: String,
        pub description: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct Wind {
        pub speed: f64,
    }
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Client for the current weather endpoint
#[derive(Debug, Clone)]
pub struct WeatherClient {
    http: HttpClient,
    base_url: String,
    api_key: Option<String>,
}

impl WeatherClient {
    pub fn new(config: &GeoMarketingConfig) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new(&config.http)?,
            base_url: config.weather.base_url.clone(),
            api_key: config.weather.api_key.clone(),
        })
    }

    /// Fetch current conditions for either a coordinate pair or a city
    #[instrument(skip(self))]
    pub fn fetch_weather(&self, request: &WeatherRequest) -> Result<WeatherResult> {
        let query = request.query()?;
        let api_key = self.api_key.as_deref().unwrap_or_default();

        let response = match &query {
            WeatherQuery::Coordinates(coordinates) => self.http.get(
                &self.base_url,
                &[
                    ("lat", coordinates.latitude.as_str()),
                    ("lon", coordinates.longitude.as_str()),
                    ("appid", api_key),
                ],
            )?,
            WeatherQuery::City(city) => self
                .http
                .get(&self.base_url, &[("q", city.as_str()), ("appid", api_key)])?,
        };

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            // A body that fails to decode falls back to the generic message
            let body: ErrorBody = response.json().unwrap_or_default();
            let message = body
                .message
                .filter(|message| !message.trim().is_empty())
                .unwrap_or_else(|| INVALID_KEY.to_string());
            error!("Weather API authentication failed (HTTP 401): {}", message);
            return Err(GeoMarketingError::weather(message));
        }
        if status != StatusCode::OK {
            warn!("Weather API returned status {}", status);
            return Err(GeoMarketingError::weather(REQUEST_FAILED));
        }

        let body: openweather::CurrentResponse = http::decode(response, |e| {
            GeoMarketingError::weather(format!("Invalid weather data received: {e}"))
        })?;

        let result = to_result(body)?;
        info!(
            "Fetched weather for {:?}: {} {:.1}°C",
            query, result.weather, result.temp_actual
        );
        Ok(result)
    }
}

fn to_result(body: openweather::CurrentResponse) -> Result<WeatherResult> {
    let condition = body
        .weather
        .into_iter()
        .next()
        .ok_or_else(|| GeoMarketingError::weather("No weather condition in response"))?;

    Ok(WeatherResult {
        humidity: body.main.humidity,
        pressure: body.main.pressure,
        weather: condition.main,
        description: condition.description,
        wind_speed: body.wind.speed,
        temp_actual: kelvin_to_celsius(body.main.temp),
        temp_max: kelvin_to_celsius(body.main.temp_max),
        temp_min: kelvin_to_celsius(body.main.temp_min),
    })
}
