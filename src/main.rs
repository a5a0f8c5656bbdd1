use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use geomarketing::{
    CountryDirectoryClient, GeoMarketingConfig, GeolocationClient, LocationRequest, WeatherClient,
    WeatherRequest, logging,
};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "geomarketing")]
#[command(about = "Country autocomplete, geolocation and weather lookups")]
#[command(version)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every country name
    Countries,
    /// Resolve a location from coordinates or a client IP
    Locate {
        #[arg(long, allow_hyphen_values = true)]
        lat: Option<String>,

        #[arg(long, allow_hyphen_values = true)]
        lon: Option<String>,

        /// Client IPv4 or IPv6 address
        #[arg(long)]
        ip: Option<String>,
    },
    /// Current weather for coordinates or a city
    Weather {
        #[arg(long, allow_hyphen_values = true)]
        lat: Option<String>,

        #[arg(long, allow_hyphen_values = true)]
        lon: Option<String>,

        #[arg(long)]
        city: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = GeoMarketingConfig::load_from_path(cli.config.clone())
        .context("Failed to load configuration")?;
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    logging::init(&config.logging)?;

    match cli.command {
        Commands::Countries => {
            let client = CountryDirectoryClient::new(&config)?;
            println!("{}", client.fetch_country_names()?.to_json()?);
        }
        Commands::Locate { lat, lon, ip } => {
            let mut request = LocationRequest::new();
            if let Some(lat) = lat {
                request.set_latitude(lat)?;
            }
            if let Some(lon) = lon {
                request.set_longitude(lon)?;
            }
            if let Some(ip) = ip {
                request.set_client_ip(&ip)?;
            }
            let client = GeolocationClient::new(&config)?;
            print_json(&client.resolve_location(&request)?)?;
        }
        Commands::Weather { lat, lon, city } => {
            let mut request = WeatherRequest::new();
            if let Some(lat) = lat {
                request.set_latitude(lat)?;
            }
            if let Some(lon) = lon {
                request.set_longitude(lon)?;
            }
            if let Some(city) = city {
                request.set_search_city(city)?;
            }
            let client = WeatherClient::new(&config)?;
            print_json(&client.fetch_weather(&request)?)?;
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
