//! Blocking HTTP plumbing shared by the API clients
//!
//! Requests are issued once; there is no retry or rate limiting. Status codes
//! are left to the caller because each upstream API maps failures to its own
//! error.

use crate::Result;
use crate::config::HttpConfig;
use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};

/// Thin wrapper around a blocking `reqwest` client
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Build a client with the configured timeout and user agent
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self { client })
    }

    /// Issue a GET with the given query parameters.
    ///
    /// Query values are never logged so API keys stay out of the logs.
    #[instrument(skip(self, url, query), fields(url = %url))]
    pub fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<Response> {
        let start = Instant::now();
        debug!("Making HTTP request with {} query parameters", query.len());

        let response = self.client.get(url).query(query).send().map_err(|e| {
            warn!("Network error after {:.3}s: {}", start.elapsed().as_secs_f64(), e);
            e
        })?;

        debug!(
            "HTTP response received: {} in {:.3}s",
            response.status(),
            start.elapsed().as_secs_f64()
        );

        Ok(response)
    }
}

/// Decode a JSON body, mapping decode failures through `on_error`.
pub(crate) fn decode<T, F>(response: Response, on_error: F) -> Result<T>
where
    T: DeserializeOwned,
    F: FnOnce(String) -> crate::GeoMarketingError,
{
    let body = response.text()?;
    serde_json::from_str(&body).map_err(|e| {
        warn!("Failed to parse response body: {}", e);
        on_error(e.to_string())
    })
}
