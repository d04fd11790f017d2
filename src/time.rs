//! Minute-of-day helpers for the time filter.

use chrono::{NaiveTime, Timelike};

use crate::error::TrafficError;

pub const MINUTES_PER_DAY: u16 = 1440;

/// Half-width of the time filter window.
pub const WINDOW_MINUTES: u16 = 60;

/// Minutes elapsed since midnight, ignoring the date and seconds.
pub fn minutes_since_midnight<T: Timelike>(ts: &T) -> u16 {
    (ts.hour() * 60 + ts.minute()) as u16
}

/// Formats a minute of the day as a short 12-hour time, e.g. `"7:00 AM"`.
///
/// Values past the end of the day are clamped to 11:59 PM.
pub fn format_time(minutes: u16) -> String {
    let minutes = minutes.min(MINUTES_PER_DAY - 1) as u32;
    NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0)
        .unwrap_or(NaiveTime::MIN)
        .format("%-I:%M %p")
        .to_string()
}

/// Converts a raw slider position into a time filter; `-1` means any time.
pub fn parse_slider(value: i32) -> Result<Option<u16>, TrafficError> {
    match value {
        -1 => Ok(None),
        v if (0..MINUTES_PER_DAY as i32).contains(&v) => Ok(Some(v as u16)),
        v => Err(TrafficError::InvalidMinute(v)),
    }
}
