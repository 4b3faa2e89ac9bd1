//! One-shot loading of stations and trips from a URL or a local file.
//!
//! Failures are logged and degrade to an empty collection, which the
//! traffic pipeline treats as valid input.

use anyhow::{Context, Result};
use tracing::{error, info};

use crate::analyzers::types::{Station, Trip};
use crate::fetch::{HttpClient, fetch_bytes};
use crate::parser::{parse_stations, parse_trips};

/// Reads `source` over HTTP when it starts with `http`, otherwise from disk.
#[tracing::instrument(skip(client))]
pub async fn read_source<C: HttpClient>(client: &C, source: &str) -> Result<Vec<u8>> {
    if source.starts_with("http") {
        fetch_bytes(client, source).await
    } else {
        tokio::fs::read(source)
            .await
            .with_context(|| format!("Failed to read '{source}'"))
    }
}

/// Loads and parses the station feed, returning an empty list on failure.
pub async fn load_stations<C: HttpClient>(client: &C, source: &str) -> Vec<Station> {
    let result = read_source(client, source)
        .await
        .and_then(|bytes| parse_stations(&bytes));

    match result {
        Ok(stations) => {
            info!(source, count = stations.len(), "Loaded stations");
            stations
        }
        Err(e) => {
            error!(source, error = %format!("{e:#}"), "Error loading stations");
            Vec::new()
        }
    }
}

/// Loads and parses the trip CSV, returning an empty list on failure.
pub async fn load_trips<C: HttpClient>(client: &C, source: &str) -> Vec<Trip> {
    let result = read_source(client, source)
        .await
        .and_then(|bytes| parse_trips(&bytes));

    match result {
        Ok(trips) => {
            info!(source, count = trips.len(), "Loaded trips");
            trips
        }
        Err(e) => {
            error!(source, error = %format!("{e:#}"), "Error loading trips");
            Vec::new()
        }
    }
}
