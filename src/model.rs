//! Station and trip records, plus the per-station traffic derived from them.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A bike-docking location keyed by its short code.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Station {
    pub short_name: String,
    pub name: Option<String>,
    pub lon: f64,
    pub lat: f64,
}

impl Station {
    pub fn new(short_name: &str, lon: f64, lat: f64) -> Self {
        Self {
            short_name: short_name.to_string(),
            name: None,
            lon,
            lat,
        }
    }
}

/// One rental, from a start station to an end station.
///
/// Station ids may reference stations missing from the station list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Trip {
    pub start_station_id: String,
    pub end_station_id: String,
    #[serde(deserialize_with = "crate::loader::deserialize_timestamp")]
    pub started_at: NaiveDateTime,
    #[serde(deserialize_with = "crate::loader::deserialize_timestamp")]
    pub ended_at: NaiveDateTime,
}

/// A station enriched with the trips that start and end there.
#[derive(Debug, Clone, PartialEq)]
pub struct StationTraffic {
    pub station: Station,
    pub departures: u32,
    pub arrivals: u32,
}

impl StationTraffic {
    pub fn total_traffic(&self) -> u32 {
        self.departures + self.arrivals
    }

    /// Share of traffic that departs from this station, `0.5` when idle.
    pub fn departure_ratio(&self) -> f64 {
        match self.total_traffic() {
            0 => 0.5,
            total => self.departures as f64 / total as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn traffic(departures: u32, arrivals: u32) -> StationTraffic {
        StationTraffic {
            station: Station::new("A32000", -71.09, 42.36),
            departures,
            arrivals,
        }
    }

    #[test]
    fn test_total_traffic_sums_counts() {
        assert_eq!(traffic(4, 3).total_traffic(), 7);
        assert_eq!(traffic(0, 0).total_traffic(), 0);
    }

    #[test]
    fn test_departure_ratio_idle_station_is_neutral() {
        assert_eq!(traffic(0, 0).departure_ratio(), 0.5);
    }

    #[test]
    fn test_departure_ratio() {
        assert_eq!(traffic(3, 1).departure_ratio(), 0.75);
        assert_eq!(traffic(0, 5).departure_ratio(), 0.0);
    }
}
