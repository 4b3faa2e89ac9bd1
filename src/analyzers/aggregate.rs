use crate::analyzers::types::{Station, StationTraffic, Trip};
use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use tracing::debug;

/// Counts occurrences of each key produced by `key` over `items`.
pub fn count_by<'a, T, K, F>(items: &'a [T], key: F) -> HashMap<K, usize>
where
    K: Eq + Hash,
    F: Fn(&'a T) -> K,
{
    let mut counts = HashMap::new();
    for item in items {
        *counts.entry(key(item)).or_insert(0) += 1;
    }
    counts
}

/// Joins `stations` with arrival and departure counts taken from `trips`.
///
/// One record is produced per station, in input order. Stations without
/// trips get zero counts. Trips whose station codes match no station are
/// counted but never surface in the result.
pub fn aggregate<T>(stations: &[Station], trips: &[T]) -> Vec<StationTraffic>
where
    T: Borrow<Trip>,
{
    let departures = count_by(trips, |t| Borrow::<Trip>::borrow(t).start_station_id.as_str());
    let arrivals = count_by(trips, |t| Borrow::<Trip>::borrow(t).end_station_id.as_str());

    debug!(
        stations = stations.len(),
        trips = trips.len(),
        departure_keys = departures.len(),
        arrival_keys = arrivals.len(),
        "Aggregating station traffic"
    );

    stations
        .iter()
        .map(|station| {
            let id = station.short_name.as_str();
            let arrivals = arrivals.get(id).copied().unwrap_or(0);
            let departures = departures.get(id).copied().unwrap_or(0);

            StationTraffic {
                station: station.clone(),
                arrivals,
                departures,
                total_traffic: arrivals + departures,
            }
        })
        .collect()
}

/// Highest `total_traffic` in `traffic`, or 0 when empty.
pub fn max_traffic(traffic: &[StationTraffic]) -> usize {
    traffic.iter().map(|t| t.total_traffic).max().unwrap_or(0)
}
