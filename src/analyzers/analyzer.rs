use crate::analyzers::aggregate::{aggregate, max_traffic};
use crate::analyzers::filter::filter_by_time;
use crate::analyzers::flow::station_flow;
use crate::analyzers::scale::RadiusScale;
use crate::analyzers::types::{LAST_MINUTE_OF_DAY, Station, StationTraffic, TimeFilter, Trip};
use anyhow::{Result, bail};
use serde::Serialize;
use tracing::{debug, info};

/// A station's traffic plus the visual encoding derived from it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StationView {
    #[serde(flatten)]
    pub traffic: StationTraffic,
    pub radius: f64,
    pub departure_ratio: f64,
}

/// Everything a renderer needs for one time-of-day selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficSnapshot {
    pub filter: TimeFilter,
    pub trip_count: usize,
    pub max_traffic: usize,
    pub radius_scale: RadiusScale,
    pub stations: Vec<StationView>,
}

impl TrafficSnapshot {
    pub fn station(&self, short_name: &str) -> Option<&StationView> {
        self.stations
            .iter()
            .find(|s| s.traffic.station.short_name == short_name)
    }

    /// Station with the most traffic. Ties go to the first in input order.
    pub fn busiest(&self) -> Option<&StationView> {
        self.stations
            .iter()
            .rev()
            .max_by_key(|s| s.traffic.total_traffic)
    }
}

/// Filters, aggregates and encodes traffic for `filter`.
///
/// The snapshot is built in full before it is returned, so a consumer never
/// observes a mix of two selections.
pub fn snapshot(stations: &[Station], trips: &[Trip], filter: TimeFilter) -> TrafficSnapshot {
    let filtered = filter_by_time(trips, filter);
    let traffic = aggregate(stations, &filtered);
    let max_traffic = max_traffic(&traffic);
    let radius_scale = RadiusScale::for_traffic(max_traffic, filter);

    let stations = traffic
        .into_iter()
        .map(|traffic| StationView {
            radius: radius_scale.radius(traffic.total_traffic),
            departure_ratio: station_flow(&traffic),
            traffic,
        })
        .collect();

    debug!(%filter, trips = filtered.len(), max_traffic, "Snapshot computed");

    TrafficSnapshot {
        filter,
        trip_count: filtered.len(),
        max_traffic,
        radius_scale,
        stations,
    }
}

/// One step of a slider sweep.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    pub minute: u16,
    pub trip_count: usize,
    pub busiest_station: Option<String>,
    pub max_traffic: usize,
}

/// Sweeps the time-of-day slider from midnight in `step_minutes` increments.
pub fn timeline(stations: &[Station], trips: &[Trip], step_minutes: u16) -> Result<Vec<TimelineEntry>> {
    if step_minutes == 0 {
        bail!("timeline step must be at least one minute");
    }

    let entries: Vec<TimelineEntry> = (0..=LAST_MINUTE_OF_DAY)
        .step_by(step_minutes as usize)
        .map(|minute| {
            let snap = snapshot(stations, trips, TimeFilter::Around(minute));
            TimelineEntry {
                minute,
                trip_count: snap.trip_count,
                busiest_station: snap.busiest().map(|s| s.traffic.station.short_name.clone()),
                max_traffic: snap.max_traffic,
            }
        })
        .collect();

    info!(steps = entries.len(), step_minutes, "Timeline computed");
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn trip(start: &str, end: &str, hour: u32) -> Trip {
        let day = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        Trip {
            ride_id: None,
            start_station_id: start.to_string(),
            end_station_id: end.to_string(),
            started_at: day.and_hms_opt(hour, 10, 0).unwrap(),
            ended_at: day.and_hms_opt(hour, 25, 0).unwrap(),
        }
    }

    fn stations() -> Vec<Station> {
        vec![
            Station::new("A", 42.36, -71.09),
            Station::new("B", 42.37, -71.10),
            Station::new("C", 42.35, -71.06),
        ]
    }

    #[test]
    fn test_snapshot_unfiltered() {
        let trips = vec![trip("A", "B", 8), trip("A", "C", 17), trip("A", "B", 17)];

        let snap = snapshot(&stations(), &trips, TimeFilter::Any);

        assert_eq!(snap.trip_count, 3);
        assert_eq!(snap.max_traffic, 3);
        assert_eq!(snap.radius_scale.range, (0.0, 25.0));

        let a = snap.station("A").unwrap();
        assert_eq!(a.traffic.departures, 3);
        assert_eq!(a.radius, 25.0);
        assert_eq!(a.departure_ratio, 1.0);

        let b = snap.station("B").unwrap();
        assert_eq!(b.traffic.arrivals, 2);
        assert_eq!(b.departure_ratio, 0.0);
    }

    #[test]
    fn test_snapshot_filtered() {
        let trips = vec![trip("A", "B", 8), trip("B", "C", 17), trip("C", "A", 17)];

        let snap = snapshot(&stations(), &trips, TimeFilter::Around(17 * 60));

        assert_eq!(snap.trip_count, 2);
        assert_eq!(snap.radius_scale.range, (3.0, 50.0));
        let a = snap.station("A").unwrap();
        assert_eq!(a.traffic.total_traffic, 1);
        assert_eq!(a.departure_ratio, 0.0);
        let c = snap.station("C").unwrap();
        assert_eq!(c.traffic.total_traffic, 2);
        assert_eq!(c.departure_ratio, 0.5);
        assert_eq!(c.radius, 50.0);
    }

    #[test]
    fn test_snapshot_without_trips() {
        let snap = snapshot(&stations(), &[], TimeFilter::Around(600));

        assert_eq!(snap.trip_count, 0);
        assert_eq!(snap.max_traffic, 0);
        assert_eq!(snap.radius_scale.domain, (0.0, 1.0));
        for view in &snap.stations {
            assert_eq!(view.radius, 3.0);
            assert_eq!(view.departure_ratio, 0.5);
        }
    }

    #[test]
    fn test_busiest_prefers_first_on_tie() {
        let trips = vec![trip("A", "B", 8)];
        let snap = snapshot(&stations(), &trips, TimeFilter::Any);

        assert_eq!(snap.busiest().unwrap().traffic.station.short_name, "A");
        assert!(snapshot(&[], &trips, TimeFilter::Any).busiest().is_none());
    }

    #[test]
    fn test_snapshot_json_keys_are_camel_case() {
        let trips = vec![trip("A", "B", 8)];
        let snap = snapshot(&stations(), &trips, TimeFilter::Around(480));

        let value = serde_json::to_value(&snap).unwrap();

        assert_eq!(value["tripCount"], 1);
        assert_eq!(value["maxTraffic"], 1);
        assert!(value["radiusScale"].is_object());
        let a = &value["stations"][0];
        assert_eq!(a["short_name"], "A");
        assert_eq!(a["totalTraffic"], 1);
        assert_eq!(a["departureRatio"], 1.0);
        assert_eq!(a["radius"], 50.0);
        assert!(a.get("departure_ratio").is_none());

        let entries = timeline(&stations(), &trips, 720).unwrap();
        let entry = serde_json::to_value(&entries[0]).unwrap();
        assert!(entry.get("tripCount").is_some());
        assert!(entry.get("busiestStation").is_some());
    }

    #[test]
    fn test_timeline() {
        let trips = vec![trip("A", "B", 8), trip("C", "B", 8), trip("C", "A", 20)];

        let entries = timeline(&stations(), &trips, 60).unwrap();

        assert_eq!(entries.len(), 24);
        assert_eq!(entries[0].minute, 0);
        assert_eq!(entries[0].trip_count, 0);

        let eight = &entries[8];
        assert_eq!(eight.minute, 480);
        assert_eq!(eight.trip_count, 2);
        assert_eq!(eight.busiest_station.as_deref(), Some("B"));
        assert_eq!(eight.max_traffic, 2);

        assert_eq!(entries[20].busiest_station.as_deref(), Some("A"));
    }

    #[test]
    fn test_timeline_rejects_zero_step() {
        assert!(timeline(&stations(), &[], 0).is_err());
    }
}
