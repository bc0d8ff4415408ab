#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI for Gaode reverse geocoding.
//!
//! ```text
//! gaode_regeo transform --lat 39.90923 --lon 116.397428
//! gaode_regeo normalize response.json
//! gaode_regeo reverse --lat 39.90923 --lon 116.397428 [--key KEY] [--config gaode.toml]
//! ```
//!
//! `reverse` reads the API key from `--key` or the environment variable
//! named in the service config (`GAODE_API_KEY` by default). Set
//! `RUST_LOG=debug` to see outbound request URLs.

use std::io::Read as _;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use gaode_regeo_coords::{GeoPoint, is_in_coverage, offset_meters, wgs84_to_gcj02};
use gaode_regeo_geocoder::gaode::GaodeClient;
use gaode_regeo_geocoder::normalize::normalize_value;
use gaode_regeo_geocoder::service_registry::{GeocodingService, default_service};

#[derive(Parser)]
#[command(name = "gaode_regeo", about = "Reverse geocode WGS-84 coordinates with Gaode")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a WGS-84 point to GCJ-02
    Transform {
        /// Latitude in degrees (WGS-84)
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        /// Longitude in degrees (WGS-84)
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
    },
    /// Normalize a raw Gaode regeo JSON response (file or stdin)
    Normalize {
        /// Path to the JSON response; reads stdin when omitted
        file: Option<PathBuf>,
    },
    /// Reverse geocode a WGS-84 point against Gaode
    Reverse {
        /// Latitude in degrees (WGS-84)
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        /// Longitude in degrees (WGS-84)
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
        /// API key (overrides the configured environment variable)
        #[arg(long)]
        key: Option<String>,
        /// Service TOML to use instead of the built-in one
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Transform { lat, lon } => {
            let point = GeoPoint::new(lat, lon)?;
            let gcj = wgs84_to_gcj02(point);

            if is_in_coverage(point) {
                println!("WGS-84:  {:.6}, {:.6}", point.latitude, point.longitude);
                println!("GCJ-02:  {:.6}, {:.6}", gcj.latitude, gcj.longitude);
                println!("Offset:  {:.1} m", offset_meters(point, gcj));
            } else {
                println!("Outside coverage; coordinates unchanged.");
            }
            println!("Query:   location={}", gcj.to_query_param());
        }
        Commands::Normalize { file } => {
            let raw = read_input(file.as_deref())?;
            let body: serde_json::Value = serde_json::from_str(&raw)?;
            let location = normalize_value(&body)?;
            println!("{}", serde_json::to_string_pretty(&location)?);
        }
        Commands::Reverse {
            lat,
            lon,
            key,
            config,
        } => {
            let point = GeoPoint::new(lat, lon)?;
            let service = match config {
                Some(path) => GeocodingService::from_path(&path)?,
                None => default_service()?,
            };
            log::info!(
                "Using service {} ({}) at {}, {} ms between requests",
                service.id,
                service.name,
                service.base_url(),
                service.rate_limit_ms()
            );

            let client = match key {
                Some(key) => GaodeClient::new(&service, key)?,
                None => GaodeClient::from_env(&service)?,
            };

            let location = client.reverse_geocode(point).await?;
            println!("{}", serde_json::to_string_pretty(&location)?);
        }
    }

    Ok(())
}

/// Reads the whole input from `path`, or stdin when `None`.
fn read_input(path: Option<&Path>) -> std::io::Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}
