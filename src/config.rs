//! Runtime configuration read from the environment (and `.env`).

use std::env;

pub const DEFAULT_STATIONS_URL: &str = "https://dsc106.com/labs/lab07/data/bluebikes-stations.json";
pub const DEFAULT_TRIPS_URL: &str = "https://dsc106.com/labs/lab07/data/bluebikes-traffic-2024-03.csv";
pub const DEFAULT_LOG_FILE_PATH: &str = "logs/bikeshare_traffic.log";

/// Data sources and log destination.
///
/// | Variable                 | Default                  |
/// |--------------------------|--------------------------|
/// | `BIKESHARE_STATIONS_URL` | [`DEFAULT_STATIONS_URL`] |
/// | `BIKESHARE_TRIPS_URL`    | [`DEFAULT_TRIPS_URL`]    |
/// | `LOG_FILE_PATH`          | [`DEFAULT_LOG_FILE_PATH`]|
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub stations_source: String,
    pub trips_source: String,
    pub log_file_path: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup. Empty values count as
    /// unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Config {
            stations_source: get("BIKESHARE_STATIONS_URL", DEFAULT_STATIONS_URL),
            trips_source: get("BIKESHARE_TRIPS_URL", DEFAULT_TRIPS_URL),
            log_file_path: get("LOG_FILE_PATH", DEFAULT_LOG_FILE_PATH),
        }
    }

    /// Replaces the sources with any values given on the command line.
    pub fn with_sources(mut self, stations: Option<String>, trips: Option<String>) -> Self {
        if let Some(stations) = stations {
            self.stations_source = stations;
        }
        if let Some(trips) = trips {
            self.trips_source = trips;
        }
        self
    }
}
