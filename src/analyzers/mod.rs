//! Station traffic aggregation and time-of-day filtering.
//!
//! Trips are filtered to a window around the selected time of day, joined
//! against the station list to count arrivals and departures, and encoded
//! into a radius and a bucketed departure ratio per station.

pub mod aggregate;
pub mod analyzer;
pub mod filter;
pub mod flow;
pub mod scale;
pub mod types;
