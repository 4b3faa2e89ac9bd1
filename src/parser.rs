//! Parsers for the station JSON feed and the monthly trip CSV.
//!
//! A malformed station entry or trip row is logged and skipped; only a
//! document that cannot be read at all is an error.

use anyhow::{Context, Result, anyhow, bail};
use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::{debug, warn};

use crate::analyzers::types::{Station, Trip};

const TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"];

/// Columns a trip CSV must carry for any row to be usable.
const REQUIRED_TRIP_COLUMNS: &[&str] = &["started_at", "ended_at", "start_station_id", "end_station_id"];

#[derive(Deserialize)]
struct StationFeed {
    #[serde(default)]
    data: Option<StationFeedData>,
}

#[derive(Deserialize)]
struct StationFeedData {
    #[serde(default)]
    stations: Option<Vec<Value>>,
}

/// Decodes a GBFS-style `{ "data": { "stations": [...] } }` document.
///
/// A document missing the `data` or `stations` level yields no stations
/// rather than an error. Entries lacking `short_name`, `lat` or `lon`, or
/// with non-numeric coordinates, are skipped with a warning.
///
/// # Errors
///
/// Returns an error if the bytes are not JSON or `stations` is not an array.
pub fn parse_stations(bytes: &[u8]) -> Result<Vec<Station>> {
    let feed: StationFeed = serde_json::from_slice(bytes).context("Invalid station JSON")?;
    let entries = feed.data.and_then(|d| d.stations).unwrap_or_default();

    let mut stations = Vec::with_capacity(entries.len());
    let mut skipped = 0usize;

    for (index, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<Station>(entry) {
            Ok(station) => stations.push(station),
            Err(e) => {
                skipped += 1;
                warn!(index, error = %e, "Skipping invalid station entry");
            }
        }
    }

    debug!(parsed = stations.len(), skipped, "Parsed stations");
    Ok(stations)
}

/// Decodes a trip CSV with a header row. Columns other than the station
/// ids, timestamps and optional `ride_id` are ignored.
///
/// Rows that fail to decode (bad timestamp, wrong field count, invalid
/// UTF-8) are skipped with a warning naming the record number.
///
/// # Errors
///
/// Returns an error if the header row lacks a required column or the
/// input cannot be read.
pub fn parse_trips(bytes: &[u8]) -> Result<Vec<Trip>> {
    let mut rdr = csv::Reader::from_reader(bytes);

    let headers = rdr.headers().context("Invalid trip CSV header")?.clone();
    if !headers.is_empty() {
        for column in REQUIRED_TRIP_COLUMNS {
            if !headers.iter().any(|h| h == *column) {
                bail!("Trip CSV is missing the '{column}' column");
            }
        }
    }

    let mut trips = Vec::new();
    let mut skipped = 0usize;

    for (index, result) in rdr.deserialize::<Trip>().enumerate() {
        match result {
            Ok(trip) => trips.push(trip),
            Err(e) if is_row_error(&e) => {
                skipped += 1;
                warn!(record = index + 1, error = %e, "Skipping invalid trip row");
            }
            Err(e) => return Err(e).context("Failed to read trip CSV"),
        }
    }

    debug!(parsed = trips.len(), skipped, "Parsed trips");
    Ok(trips)
}

fn is_row_error(e: &csv::Error) -> bool {
    matches!(
        e.kind(),
        csv::ErrorKind::Deserialize { .. } | csv::ErrorKind::UnequalLengths { .. } | csv::ErrorKind::Utf8 { .. }
    )
}

/// Parses a trip timestamp as local wall-clock time.
///
/// RFC 3339 values keep their local time and drop the offset, matching how
/// the times are read off the station's clock.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime> {
    let value = value.trim();

    for format in TIMESTAMP_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(ts);
        }
    }

    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.naive_local())
        .map_err(|_| anyhow!("Unrecognized timestamp '{value}'"))
}

pub(crate) fn deserialize_timestamp<'de, D>(deserializer: D) -> std::result::Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}
