//! Time-of-day filtering of trips.

use crate::model::Trip;
use crate::time::{WINDOW_MINUTES, minutes_since_midnight};

/// Returns the trips that start or end within [`WINDOW_MINUTES`] of `filter`.
///
/// `None` keeps every trip. The window does not wrap around midnight, so
/// 23:50 and 00:10 are treated as far apart. Input order is preserved.
pub fn filter_trips_by_time(trips: &[Trip], filter: Option<u16>) -> Vec<&Trip> {
    let Some(target) = filter else {
        return trips.iter().collect();
    };

    let near = |minute: u16| (minute as i32 - target as i32).abs() <= WINDOW_MINUTES as i32;

    trips
        .iter()
        .filter(|trip| {
            near(minutes_since_midnight(&trip.started_at))
                || near(minutes_since_midnight(&trip.ended_at))
        })
        .collect()
}
