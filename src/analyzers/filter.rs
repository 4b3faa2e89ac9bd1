use crate::analyzers::types::{TimeFilter, Trip};
use chrono::{NaiveDateTime, Timelike};
use tracing::debug;

/// Tolerance, in minutes, either side of the selected time of day.
pub const WINDOW_MINUTES: u16 = 60;

/// Minutes since midnight, ignoring the date and seconds.
pub fn minutes_since_midnight(at: &NaiveDateTime) -> u16 {
    (at.hour() * 60 + at.minute()) as u16
}

/// Whether `minute` lies within [`WINDOW_MINUTES`] of `target`.
///
/// Plain minute-of-day arithmetic: 00:05 and 23:50 are 1425 minutes apart,
/// not 15.
pub fn within_window(minute: u16, target: u16) -> bool {
    minute.abs_diff(target) <= WINDOW_MINUTES
}

/// Returns the trips that start or end near the selected time of day.
///
/// [`TimeFilter::Any`] passes every trip through. The result borrows from
/// `trips` and keeps their order.
pub fn filter_by_time(trips: &[Trip], filter: TimeFilter) -> Vec<&Trip> {
    let filtered: Vec<&Trip> = match filter {
        TimeFilter::Any => trips.iter().collect(),
        TimeFilter::Around(target) => trips
            .iter()
            .filter(|trip| {
                within_window(minutes_since_midnight(&trip.started_at), target)
                    || within_window(minutes_since_midnight(&trip.ended_at), target)
            })
            .collect(),
    };

    debug!(
        %filter,
        total = trips.len(),
        kept = filtered.len(),
        "Filtered trips by time of day"
    );

    filtered
}
