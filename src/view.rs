//! View state for the station traffic map.
//!
//! [`TrafficMap`] owns the loaded stations and trips. Each time selection is
//! turned into a fresh [`ViewState`] by filtering trips, re-aggregating from
//! the untouched base stations, and encoding every station as a marker.

use serde::Serialize;

use crate::filter::filter_trips_by_time;
use crate::model::{Station, StationTraffic, Trip};
use crate::scale::{SqrtScale, quantize_flow};
use crate::time::format_time;
use crate::traffic::{compute_station_traffic, max_total_traffic};

const UNFILTERED_RADIUS: (f64, f64) = (0.0, 25.0);
const FILTERED_RADIUS: (f64, f64) = (3.0, 50.0);

/// Everything a renderer needs to draw one station.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationMarker {
    pub id: String,
    pub name: Option<String>,
    pub lon: f64,
    pub lat: f64,
    pub radius: f64,
    pub departure_ratio: f64,
    pub departures: u32,
    pub arrivals: u32,
    pub total_traffic: u32,
    pub tooltip: String,
}

/// Result of one time selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewState {
    pub time_filter: Option<u16>,
    /// Formatted selected time, empty when any time is shown.
    pub time_label: String,
    pub any_time: bool,
    pub markers: Vec<StationMarker>,
}

impl ViewState {
    pub fn marker(&self, id: &str) -> Option<&StationMarker> {
        self.markers.iter().find(|m| m.id == id)
    }

    /// Marker with the most traffic; the first one wins ties.
    pub fn busiest(&self) -> Option<&StationMarker> {
        self.markers
            .iter()
            .reduce(|best, m| if m.total_traffic > best.total_traffic { m } else { best })
    }
}

/// Hover text for a station.
pub fn tooltip_text(traffic: &StationTraffic) -> String {
    format!(
        "{} trips · {} departures · {} arrivals",
        traffic.total_traffic(),
        traffic.departures,
        traffic.arrivals
    )
}

/// Loaded datasets, read-only after construction.
#[derive(Debug, Clone, Default)]
pub struct TrafficMap {
    stations: Vec<Station>,
    trips: Vec<Trip>,
}

impl TrafficMap {
    pub fn new(stations: Vec<Station>, trips: Vec<Trip>) -> Self {
        Self { stations, trips }
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    /// Recomputes the view for a time selection (`None` = any time).
    #[tracing::instrument(skip(self), fields(stations = self.stations.len()))]
    pub fn update(&self, filter: Option<u16>) -> ViewState {
        let filtered = filter_trips_by_time(&self.trips, filter);
        tracing::debug!(
            kept = filtered.len(),
            total = self.trips.len(),
            "Trips filtered"
        );

        let traffic = compute_station_traffic(&self.stations, filtered.iter().copied());
        let range = match filter {
            None => UNFILTERED_RADIUS,
            Some(_) => FILTERED_RADIUS,
        };
        let radius = SqrtScale::new(max_total_traffic(&traffic), range);

        let markers = traffic
            .iter()
            .map(|t| StationMarker {
                id: t.station.short_name.clone(),
                name: t.station.name.clone(),
                lon: t.station.lon,
                lat: t.station.lat,
                radius: radius.apply(t.total_traffic()),
                departure_ratio: quantize_flow(t.departure_ratio()),
                departures: t.departures,
                arrivals: t.arrivals,
                total_traffic: t.total_traffic(),
                tooltip: tooltip_text(t),
            })
            .collect();

        ViewState {
            time_filter: filter,
            time_label: filter.map(format_time).unwrap_or_default(),
            any_time: filter.is_none(),
            markers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn trip(start: &str, end: &str, start_min: u32, end_min: u32) -> Trip {
        let day = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        Trip {
            start_station_id: start.to_string(),
            end_station_id: end.to_string(),
            started_at: day.and_hms_opt(start_min / 60, start_min % 60, 0).unwrap(),
            ended_at: day.and_hms_opt(end_min / 60, end_min % 60, 0).unwrap(),
        }
    }

    fn sample_map() -> TrafficMap {
        TrafficMap::new(
            vec![
                Station::new("A", -71.09, 42.36),
                Station::new("B", -71.06, 42.35),
                Station::new("C", -71.12, 42.37),
            ],
            vec![
                trip("A", "B", 480, 495),
                trip("A", "A", 485, 500),
                trip("A", "B", 490, 510),
                trip("B", "A", 1020, 1040),
            ],
        )
    }

    #[test]
    fn test_unfiltered_view() {
        let view = sample_map().update(None);

        assert!(view.any_time);
        assert_eq!(view.time_label, "");
        assert_eq!(view.markers.len(), 3);

        let a = view.marker("A").unwrap();
        assert_eq!((a.departures, a.arrivals, a.total_traffic), (3, 2, 5));
        assert_eq!(a.radius, 25.0);
        assert_eq!(a.departure_ratio, 0.5);
        assert_eq!(a.tooltip, "5 trips · 3 departures · 2 arrivals");

        let c = view.marker("C").unwrap();
        assert_eq!(c.radius, 0.0);
        assert_eq!(c.departure_ratio, 0.5);
    }

    #[test]
    fn test_filtered_view_uses_wider_range() {
        let view = sample_map().update(Some(1020));

        assert!(!view.any_time);
        assert_eq!(view.time_label, "5:00 PM");

        let a = view.marker("A").unwrap();
        let b = view.marker("B").unwrap();
        let c = view.marker("C").unwrap();
        assert_eq!((a.departures, a.arrivals), (0, 1));
        assert_eq!((b.departures, b.arrivals), (1, 0));
        assert_eq!(a.radius, 50.0);
        assert_eq!(c.radius, 3.0);
        assert_eq!(a.departure_ratio, 0.0);
        assert_eq!(b.departure_ratio, 1.0);
    }

    #[test]
    fn test_updates_do_not_compound() {
        let map = sample_map();
        let first = map.update(None);
        let _ = map.update(Some(480));
        let _ = map.update(Some(1020));
        assert_eq!(map.update(None), first);
    }

    #[test]
    fn test_empty_map() {
        let view = TrafficMap::default().update(Some(600));
        assert!(view.markers.is_empty());
        assert!(view.busiest().is_none());
    }

    #[test]
    fn test_busiest() {
        let view = sample_map().update(None);
        assert_eq!(view.busiest().unwrap().id, "A");
    }
}
