//! Per-station departure and arrival counts.

use std::collections::HashMap;

use crate::model::{Station, StationTraffic, Trip};

/// Counts departures and arrivals for every station.
///
/// Produces one record per input station, in input order. Trips pointing at
/// stations that are not in `stations` are tallied but never attributed.
/// The inputs are left untouched, so calling this repeatedly with different
/// trip subsets never compounds counts.
pub fn compute_station_traffic<'a, I>(stations: &[Station], trips: I) -> Vec<StationTraffic>
where
    I: IntoIterator<Item = &'a Trip>,
    I::IntoIter: Clone,
{
    let trips = trips.into_iter();
    let departures = tally(trips.clone().map(|t| t.start_station_id.as_str()));
    let arrivals = tally(trips.map(|t| t.end_station_id.as_str()));

    stations
        .iter()
        .map(|station| {
            let id = station.short_name.as_str();
            StationTraffic {
                station: station.clone(),
                departures: departures.get(id).copied().unwrap_or(0),
                arrivals: arrivals.get(id).copied().unwrap_or(0),
            }
        })
        .collect()
}

/// Highest total traffic across stations, 0 when there are none.
pub fn max_total_traffic(traffic: &[StationTraffic]) -> u32 {
    traffic
        .iter()
        .map(StationTraffic::total_traffic)
        .max()
        .unwrap_or(0)
}

fn tally<'a>(keys: impl Iterator<Item = &'a str>) -> HashMap<&'a str, u32> {
    let mut counts = HashMap::new();
    for key in keys {
        *counts.entry(key).or_default() += 1;
    }
    counts
}
