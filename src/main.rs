//! CLI entry point for the bike-share traffic tool.
//!
//! Loads the station feed and a month of trips once, then reports station
//! traffic for a time-of-day selection, a sweep over the whole day, or a
//! single station.

use anyhow::{Result, bail};
use bikeshare_traffic::analyzers::analyzer::{snapshot, timeline};
use bikeshare_traffic::analyzers::types::{Station, TimeFilter, Trip};
use bikeshare_traffic::config::Config;
use bikeshare_traffic::fetch::BasicClient;
use bikeshare_traffic::loader::{load_stations, load_trips};
use bikeshare_traffic::output::{
    datetime_attr, filter_label, print_json, print_pretty, tooltip, write_snapshot_csv,
};
use clap::{Args, Parser, Subcommand};
use std::ffi::OsStr;
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "bikeshare_traffic")]
#[command(about = "Bike-share station traffic by time of day", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Sources {
    /// Station JSON feed, as a path or URL (overrides BIKESHARE_STATIONS_URL)
    #[arg(long, value_name = "FILE_OR_URL")]
    stations: Option<String>,

    /// Trip CSV, as a path or URL (overrides BIKESHARE_TRIPS_URL)
    #[arg(long, value_name = "FILE_OR_URL")]
    trips: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute station traffic for one time-of-day selection
    Traffic {
        #[command(flatten)]
        sources: Sources,

        /// Time of day: "any", HH:MM, or minutes since midnight
        #[arg(short, long, default_value = "any")]
        time: TimeFilter,

        /// CSV file to write per-station results to
        #[arg(short, long)]
        output: Option<String>,

        /// Log the full snapshot as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Sweep the day and report the busiest station at each step
    Timeline {
        #[command(flatten)]
        sources: Sources,

        /// Minutes between steps
        #[arg(short, long, default_value_t = 60)]
        step: u16,
    },
    /// Show traffic for a single station
    Station {
        /// Station short code, e.g. A32000
        short_name: String,

        #[command(flatten)]
        sources: Sources,

        /// Time of day: "any", HH:MM, or minutes since midnight
        #[arg(short, long, default_value = "any")]
        time: TimeFilter,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file
    let config = Config::from_env();

    // Logging setup: colored stderr + JSON rolling log file
    let log_dir = Path::new(&config.log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&config.log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("bikeshare_traffic.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Traffic {
            sources,
            time,
            output,
            json,
        } => {
            let (stations, trips) = load(config, sources).await;
            let snap = snapshot(&stations, &trips, time);

            info!(
                time = %filter_label(time),
                trips = snap.trip_count,
                stations = snap.stations.len(),
                max_traffic = snap.max_traffic,
                "Traffic computed"
            );

            if let Some(busiest) = snap.busiest() {
                info!(
                    station = %busiest.traffic.station.short_name,
                    summary = %tooltip(&busiest.traffic),
                    "Busiest station"
                );
            }

            if json {
                print_json(&snap)?;
            } else {
                print_pretty(&snap);
            }

            if let Some(path) = output {
                write_snapshot_csv(&path, &snap)?;
                info!(path = %path, "Snapshot written");
            }
        }
        Commands::Timeline { sources, step } => {
            let (stations, trips) = load(config, sources).await;

            for entry in timeline(&stations, &trips, step)? {
                info!(
                    time = %datetime_attr(entry.minute),
                    trips = entry.trip_count,
                    busiest = entry.busiest_station.as_deref().unwrap_or("-"),
                    max_traffic = entry.max_traffic,
                    "Timeline step"
                );
            }
        }
        Commands::Station {
            short_name,
            sources,
            time,
        } => {
            let (stations, trips) = load(config, sources).await;
            let snap = snapshot(&stations, &trips, time);

            let Some(view) = snap.station(&short_name) else {
                bail!("station '{short_name}' not found among {} stations", stations.len());
            };

            info!(
                station = %short_name,
                time = %filter_label(time),
                arrivals = view.traffic.arrivals,
                departures = view.traffic.departures,
                total_traffic = view.traffic.total_traffic,
                radius = view.radius,
                departure_ratio = view.departure_ratio,
                "{}",
                tooltip(&view.traffic)
            );
        }
    }

    Ok(())
}

/// Loads stations and trips concurrently. Either side may come back empty
/// if its source failed; the run continues on what was loaded.
#[tracing::instrument(skip_all, fields(stations = tracing::field::Empty, trips = tracing::field::Empty))]
async fn load(config: Config, sources: Sources) -> (Vec<Station>, Vec<Trip>) {
    let config = config.with_sources(sources.stations, sources.trips);
    let client = BasicClient::new();

    let (stations, trips) = tokio::join!(
        load_stations(&client, &config.stations_source),
        load_trips(&client, &config.trips_source),
    );

    if stations.is_empty() {
        warn!(source = %config.stations_source, "No stations loaded");
    }
    if trips.is_empty() {
        warn!(source = %config.trips_source, "No trips loaded");
    }

    tracing::Span::current().record("stations", stations.len());
    tracing::Span::current().record("trips", trips.len());

    (stations, trips)
}
