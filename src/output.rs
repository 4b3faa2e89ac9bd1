//! Output formatting and persistence for traffic snapshots.
//!
//! Supports pretty-printing, JSON serialization, CSV export, and the short
//! labels shown next to the time slider and on station tooltips.

use anyhow::{Context, Result};
use chrono::NaiveTime;
use csv::WriterBuilder;
use serde::Serialize;
use std::fs::File;
use tracing::{debug, info};

use crate::analyzers::analyzer::TrafficSnapshot;
use crate::analyzers::types::{StationTraffic, TimeFilter};

/// Flat CSV row for one station in a snapshot.
#[derive(Debug, Serialize)]
struct SnapshotRow<'a> {
    time: String,
    short_name: &'a str,
    lat: f64,
    lon: f64,
    arrivals: usize,
    departures: usize,
    total_traffic: usize,
    radius: f64,
    departure_ratio: f64,
}

fn minute_to_time(minute: u16) -> NaiveTime {
    let minute = u32::from(minute) % (24 * 60);
    NaiveTime::from_hms_opt(minute / 60, minute % 60, 0).unwrap_or_default()
}

/// Formats a minute of day as a 12-hour short time, e.g. `8:10 AM`.
pub fn format_time(minute: u16) -> String {
    minute_to_time(minute).format("%-I:%M %p").to_string()
}

/// Formats a minute of day as a zero-padded `HH:MM` value.
pub fn datetime_attr(minute: u16) -> String {
    minute_to_time(minute).format("%H:%M").to_string()
}

/// Slider caption for a filter selection.
pub fn filter_label(filter: TimeFilter) -> String {
    match filter {
        TimeFilter::Any => "(any time)".to_string(),
        TimeFilter::Around(m) => format_time(m),
    }
}

/// Tooltip text for a station.
pub fn tooltip(traffic: &StationTraffic) -> String {
    format!(
        "{} trips ({} departures, {} arrivals)",
        traffic.total_traffic, traffic.departures, traffic.arrivals
    )
}

/// Logs a snapshot using Rust's debug pretty-print format.
pub fn print_pretty(snapshot: &TrafficSnapshot) {
    debug!("{:#?}", snapshot);
}

/// Logs a snapshot as pretty-printed JSON.
pub fn print_json(snapshot: &TrafficSnapshot) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(snapshot)?);
    Ok(())
}

/// Writes one CSV row per station in `snapshot`, replacing `path`.
pub fn write_snapshot_csv(path: &str, snapshot: &TrafficSnapshot) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create '{path}'"))?;
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(file);

    let time = match snapshot.filter {
        TimeFilter::Any => "any".to_string(),
        TimeFilter::Around(m) => datetime_attr(m),
    };

    for view in &snapshot.stations {
        let station = &view.traffic.station;
        writer.serialize(SnapshotRow {
            time: time.clone(),
            short_name: &station.short_name,
            lat: station.lat,
            lon: station.lon,
            arrivals: view.traffic.arrivals,
            departures: view.traffic.departures,
            total_traffic: view.traffic.total_traffic,
            radius: view.radius,
            departure_ratio: view.departure_ratio,
        })?;
    }

    writer.flush()?;
    debug!(path, rows = snapshot.stations.len(), "Wrote snapshot CSV");
    Ok(())
}
