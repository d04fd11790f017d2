//! Error types for loading and filtering station traffic data.

use thiserror::Error;

/// Errors raised by the library when input data or user input is invalid.
#[derive(Error, Debug)]
pub enum TrafficError {
    /// Slider value outside `-1..=1439`.
    #[error("invalid time selection {0}: expected -1 or a minute in 0..=1439")]
    InvalidMinute(i32),

    /// A station coordinate that is neither a number nor a numeric string.
    #[error("station {station}: invalid {field} value {value:?}")]
    InvalidCoordinate {
        station: String,
        field: &'static str,
        value: String,
    },

    /// A trip timestamp in none of the accepted formats.
    #[error("unrecognized timestamp {0:?}")]
    InvalidTimestamp(String),

    /// Non-success HTTP status while fetching a data source.
    #[error("GET {url} returned status {status}")]
    HttpStatus { url: String, status: u16 },
}
