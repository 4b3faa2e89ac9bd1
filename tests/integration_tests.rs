use bikeshare_traffic::analyzers::aggregate::aggregate;
use bikeshare_traffic::analyzers::analyzer::{snapshot, timeline};
use bikeshare_traffic::analyzers::filter::filter_by_time;
use bikeshare_traffic::analyzers::types::{Station, TimeFilter, Trip};
use bikeshare_traffic::output::tooltip;
use bikeshare_traffic::parser::{parse_stations, parse_trips};

fn fixtures() -> (Vec<Station>, Vec<Trip>) {
    let stations = parse_stations(include_bytes!("fixtures/stations.json")).expect("Failed to parse stations");
    let trips = parse_trips(include_bytes!("fixtures/trips.csv")).expect("Failed to parse trips");
    (stations, trips)
}

#[test]
fn test_full_pipeline_any_time() {
    let (stations, trips) = fixtures();
    assert_eq!(stations.len(), 4);
    assert_eq!(trips.len(), 8);

    let snap = snapshot(&stations, &trips, TimeFilter::Any);

    assert_eq!(snap.trip_count, 8);
    let mit = snap.station("M32006").unwrap();
    assert_eq!(mit.traffic.arrivals, 3);
    assert_eq!(mit.traffic.departures, 4);
    assert_eq!(mit.traffic.total_traffic, 7);
    assert_eq!(snap.max_traffic, 7);
    assert_eq!(mit.radius, 25.0);
    assert_eq!(mit.departure_ratio, 0.5);
    assert_eq!(snap.busiest().unwrap().traffic.station.short_name, "M32006");
    assert_eq!(tooltip(&mit.traffic), "7 trips (4 departures, 3 arrivals)");

    // Passthrough fields survive aggregation.
    assert_eq!(mit.traffic.station.extra["capacity"], 27);
}

#[test]
fn test_departures_conserved_for_known_stations() {
    let (stations, trips) = fixtures();

    let traffic = aggregate(&stations, &trips);

    let departures: usize = traffic.iter().map(|t| t.departures).sum();
    let arrivals: usize = traffic.iter().map(|t| t.arrivals).sum();
    assert_eq!(departures, 8);
    // R0008 ends at a station missing from the feed.
    assert_eq!(arrivals, 7);
}

#[test]
fn test_morning_window() {
    let (stations, trips) = fixtures();

    let filtered = filter_by_time(&trips, "08:00".parse().unwrap());
    let ids: Vec<_> = filtered.iter().filter_map(|t| t.ride_id.as_deref()).collect();
    assert_eq!(ids, vec!["R0001", "R0002", "R0003"]);

    let snap = snapshot(&stations, &trips, TimeFilter::Around(480));
    assert_eq!(snap.radius_scale.range, (3.0, 50.0));
    let central = snap.station("M32011").unwrap();
    assert_eq!(central.traffic.departures, 2);
    assert_eq!(central.traffic.arrivals, 0);
    assert_eq!(central.departure_ratio, 1.0);
    let wharf = snap.station("B32012").unwrap();
    assert_eq!(wharf.traffic.total_traffic, 0);
    assert_eq!(wharf.radius, 3.0);
    assert_eq!(wharf.departure_ratio, 0.5);
}

#[test]
fn test_late_night_trip_does_not_wrap() {
    let (_, trips) = fixtures();

    // R0007 runs 23:50 to 00:04. Only its end time is near 00:05; its start
    // counts as 1425 minutes away.
    let just_after_midnight = filter_by_time(&trips, TimeFilter::Around(5));
    assert_eq!(just_after_midnight.len(), 1);
    assert_eq!(just_after_midnight[0].ride_id.as_deref(), Some("R0007"));

    let just_before_midnight = filter_by_time(&trips, TimeFilter::Around(1439));
    assert_eq!(just_before_midnight.len(), 1);

    assert!(filter_by_time(&trips, TimeFilter::Around(22 * 60 + 45)).is_empty());
}

#[test]
fn test_timeline_over_fixtures() {
    let (stations, trips) = fixtures();

    let entries = timeline(&stations, &trips, 30).unwrap();

    assert_eq!(entries.len(), 48);
    let evening = entries.iter().find(|e| e.minute == 17 * 60 + 30).unwrap();
    assert_eq!(evening.busiest_station.as_deref(), Some("M32006"));
    assert_eq!(evening.trip_count, 3);
}

#[test]
fn test_bad_rows_do_not_drop_the_load() {
    let stations = parse_stations(
        br#"{"data": {"stations": [
            { "short_name": "A", "lat": 42.36, "lon": -71.09 },
            { "short_name": "B", "lat": "not a number", "lon": -71.1 }
        ]}}"#,
    )
    .expect("Failed to parse stations");
    let trips = parse_trips(
        b"started_at,ended_at,start_station_id,end_station_id\n\
2024-03-01 08:10:00,2024-03-01 08:25:00,A,B\n\
2024-03-01 09:10:00,,A,B\n\
2024-03-01 10:10:00,2024-03-01 10:25:00,A,B\n",
    )
    .expect("Failed to parse trips");

    assert_eq!(stations.len(), 1);
    assert_eq!(trips.len(), 2);

    let traffic = aggregate(&stations, &trips);
    assert_eq!(traffic[0].departures, 2);
}
