//! Data types shared by the loaders and the traffic pipeline.

use anyhow::{Result, anyhow, bail};
use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Last valid minute of a day (23:59).
pub const LAST_MINUTE_OF_DAY: u16 = 24 * 60 - 1;

/// A bike-share dock, as published in the GBFS `station_information` feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub short_name: String,
    #[serde(deserialize_with = "number_or_string")]
    pub lat: f64,
    #[serde(deserialize_with = "number_or_string")]
    pub lon: f64,

    /// Every other field of the feed entry, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Station {
    pub fn new(short_name: &str, lat: f64, lon: f64) -> Self {
        Station {
            short_name: short_name.to_string(),
            lat,
            lon,
            extra: Map::new(),
        }
    }
}

/// A single rental, one row of the monthly trip CSV.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Trip {
    #[serde(default)]
    pub ride_id: Option<String>,
    pub start_station_id: String,
    pub end_station_id: String,
    #[serde(deserialize_with = "crate::parser::deserialize_timestamp")]
    pub started_at: NaiveDateTime,
    #[serde(deserialize_with = "crate::parser::deserialize_timestamp")]
    pub ended_at: NaiveDateTime,
}

/// A station joined with its arrival and departure counts.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StationTraffic {
    #[serde(flatten)]
    pub station: Station,
    pub arrivals: usize,
    pub departures: usize,
    pub total_traffic: usize,
}

/// Time-of-day selection driving a recomputation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeFilter {
    /// No filtering, every trip counts.
    #[default]
    Any,
    /// Minutes since midnight, `0..=1439`.
    Around(u16),
}

impl TimeFilter {
    pub fn is_active(&self) -> bool {
        matches!(self, TimeFilter::Around(_))
    }

    pub fn around(minute: u16) -> Result<Self> {
        if minute > LAST_MINUTE_OF_DAY {
            bail!("minute of day {minute} is out of range 0..={LAST_MINUTE_OF_DAY}");
        }
        Ok(TimeFilter::Around(minute))
    }
}

/// Slider values: `-1` means any time, otherwise minutes since midnight.
impl TryFrom<i32> for TimeFilter {
    type Error = anyhow::Error;

    fn try_from(value: i32) -> Result<Self> {
        match value {
            -1 => Ok(TimeFilter::Any),
            v if (0..=LAST_MINUTE_OF_DAY as i32).contains(&v) => Ok(TimeFilter::Around(v as u16)),
            v => Err(anyhow!("slider value {v} is neither -1 nor a minute of day")),
        }
    }
}

impl FromStr for TimeFilter {
    type Err = anyhow::Error;

    /// Accepts `any`, `-1`, a bare minute count such as `480`, or `HH:MM`.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("any") {
            return Ok(TimeFilter::Any);
        }

        if let Some((hours, minutes)) = s.split_once(':') {
            let hours: u16 = hours
                .parse()
                .map_err(|_| anyhow!("invalid hour in time filter '{s}'"))?;
            let minutes: u16 = minutes
                .parse()
                .map_err(|_| anyhow!("invalid minute in time filter '{s}'"))?;
            if hours > 23 || minutes > 59 {
                bail!("time filter '{s}' is not a valid time of day");
            }
            return TimeFilter::around(hours * 60 + minutes);
        }

        let value: i32 = s
            .parse()
            .map_err(|_| anyhow!("time filter '{s}' is not 'any', HH:MM or a minute count"))?;
        TimeFilter::try_from(value)
    }
}

impl fmt::Display for TimeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeFilter::Any => write!(f, "any time"),
            TimeFilter::Around(m) => write!(f, "{:02}:{:02}", m / 60, m % 60),
        }
    }
}

// The GBFS feed uses numbers, but some mirrors ship coordinates as strings.
fn number_or_string<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Coord {
        Number(f64),
        Text(String),
    }

    match Coord::deserialize(deserializer)? {
        Coord::Number(n) => Ok(n),
        Coord::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}
