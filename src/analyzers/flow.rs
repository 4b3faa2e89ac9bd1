use crate::analyzers::types::StationTraffic;

/// Output buckets for the departure ratio, evenly splitting `[0, 1]`.
pub const FLOW_BUCKETS: [f64; 3] = [0.0, 0.5, 1.0];

/// Share of a station's traffic that is departures.
///
/// Stations with no traffic are treated as balanced and return `0.5`.
pub fn departure_ratio(traffic: &StationTraffic) -> f64 {
    if traffic.total_traffic == 0 {
        0.5
    } else {
        traffic.departures as f64 / traffic.total_traffic as f64
    }
}

/// Maps a ratio in `[0, 1]` onto [`FLOW_BUCKETS`].
///
/// | Range          | Bucket |
/// |----------------|--------|
/// | < 1/3          | 0.0    |
/// | 1/3 ..< 2/3    | 0.5    |
/// | >= 2/3         | 1.0    |
///
/// Values outside `[0, 1]` clamp to the end buckets.
pub fn quantize_flow(ratio: f64) -> f64 {
    let n = FLOW_BUCKETS.len();
    let step = 1.0 / n as f64;
    let index = (1..n)
        .take_while(|i| ratio >= *i as f64 * step)
        .count();
    FLOW_BUCKETS[index]
}

/// Bucketed departure ratio, ready to hand to a style property.
pub fn station_flow(traffic: &StationTraffic) -> f64 {
    quantize_flow(departure_ratio(traffic))
}
