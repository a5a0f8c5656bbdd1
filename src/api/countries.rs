//! Country directory client for autocompletion

use crate::config::GeoMarketingConfig;
use crate::http::{self, HttpClient};
use crate::models::CountryList;
use crate::{GeoMarketingError, Result};
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{info, instrument, warn};

const UNAVAILABLE: &str = "The API country aren't accessible for this moment";

#[derive(Debug, Deserialize)]
struct CountryEntry {
    name: String,
}

/// Client for the REST country-data endpoint
#[derive(Debug, Clone)]
pub struct CountryDirectoryClient {
    http: HttpClient,
    list_url: String,
}

impl CountryDirectoryClient {
    pub fn new(config: &GeoMarketingConfig) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new(&config.http)?,
            list_url: config.countries.list_url.clone(),
        })
    }

    #[must_use]
    pub fn list_url(&self) -> &str {
        &self.list_url
    }

    /// Fetch every country name, trimmed, in upstream order
    #[instrument(skip(self))]
    pub fn fetch_country_names(&self) -> Result<CountryList> {
        let response = self.http.get(&self.list_url, &[])?;

        if response.status() != StatusCode::OK {
            warn!("Country list returned status {}", response.status());
            return Err(GeoMarketingError::country_list(UNAVAILABLE));
        }

        let entries: Vec<CountryEntry> = http::decode(response, |e| {
            GeoMarketingError::country_list(format!("Invalid country list received: {e}"))
        })?;

        let countries = CountryList::from_names(entries.iter().map(|entry| &entry.name));
        info!("Fetched {} country names", countries.len());
        Ok(countries)
    }
}
