//! Parsing of the station JSON feed and the trip CSV export.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer};
use tracing::debug;

use crate::error::TrafficError;
use crate::fetch::{BasicClient, fetch_bytes};
use crate::model::{Station, Trip};

const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

#[derive(Deserialize)]
struct StationDocument {
    data: StationData,
}

#[derive(Deserialize)]
struct StationData {
    stations: Vec<RawStation>,
}

#[derive(Deserialize)]
struct RawStation {
    short_name: String,
    #[serde(default)]
    name: Option<String>,
    lon: Coordinate,
    lat: Coordinate,
}

/// Coordinates arrive either as JSON numbers or as numeric strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum Coordinate {
    Number(f64),
    Text(String),
}

impl Coordinate {
    fn resolve(self, station: &str, field: &'static str) -> Result<f64, TrafficError> {
        match self {
            Coordinate::Number(v) => Ok(v),
            Coordinate::Text(s) => s.trim().parse().map_err(|_| TrafficError::InvalidCoordinate {
                station: station.to_string(),
                field,
                value: s,
            }),
        }
    }
}

/// Loads raw bytes from an `http(s)` URL or a local file path.
#[tracing::instrument]
pub async fn load_source(source: &str) -> Result<Vec<u8>> {
    let bytes = if source.starts_with("http") {
        let client = BasicClient::new();
        fetch_bytes(&client, source).await?
    } else {
        std::fs::read(source).with_context(|| format!("failed to read {source}"))?
    };
    debug!(bytes = bytes.len(), "Source loaded");
    Ok(bytes)
}

/// Parses a `{"data": {"stations": [...]}}` station document.
pub fn parse_stations(bytes: &[u8]) -> Result<Vec<Station>> {
    let doc: StationDocument =
        serde_json::from_slice(bytes).context("malformed station document")?;

    let stations = doc
        .data
        .stations
        .into_iter()
        .map(|raw| -> Result<Station, TrafficError> {
            let lon = raw.lon.resolve(&raw.short_name, "lon")?;
            let lat = raw.lat.resolve(&raw.short_name, "lat")?;
            Ok(Station {
                short_name: raw.short_name,
                name: raw.name,
                lon,
                lat,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(stations)
}

/// Parses a trip CSV with `start_station_id`, `end_station_id`, `started_at`
/// and `ended_at` columns. Other columns are ignored.
pub fn parse_trips(bytes: &[u8]) -> Result<Vec<Trip>> {
    let mut rdr = csv::Reader::from_reader(bytes);
    let mut trips = Vec::new();

    for (line, result) in rdr.deserialize().enumerate() {
        let trip: Trip = result.with_context(|| format!("malformed trip record {}", line + 1))?;
        trips.push(trip);
    }

    Ok(trips)
}

/// Parses a wall-clock timestamp. Offsets on RFC 3339 input are dropped so
/// the local time of day is kept.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, TrafficError> {
    let value = value.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.naive_local())
        })
        .ok_or_else(|| TrafficError::InvalidTimestamp(value.to_string()))
}

pub(crate) fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_parse_stations_mixed_coordinates() {
        let json = br#"{"data": {"stations": [
            {"short_name": "A32000", "name": "Central Square", "lon": -71.1031, "lat": "42.3652"},
            {"short_name": "M32006", "lon": "-71.09", "lat": 42.36, "capacity": 19}
        ]}}"#;

        let stations = parse_stations(json).unwrap();
        assert_eq!(stations.len(), 2);
        assert_eq!(stations[0].short_name, "A32000");
        assert_eq!(stations[0].name.as_deref(), Some("Central Square"));
        assert_eq!(stations[0].lat, 42.3652);
        assert_eq!(stations[1].lon, -71.09);
        assert_eq!(stations[1].name, None);
    }

    #[test]
    fn test_parse_stations_rejects_bad_coordinate() {
        let json = br#"{"data": {"stations": [{"short_name": "X", "lon": "east", "lat": 1}]}}"#;
        let err = parse_stations(json).unwrap_err();
        assert!(err.to_string().contains("X"));
    }

    #[test]
    fn test_parse_stations_malformed() {
        assert!(parse_stations(b"not json").is_err());
        assert!(parse_stations(br#"{"stations": []}"#).is_err());
    }

    #[test]
    fn test_parse_trips() {
        let csv = b"ride_id,rideable_type,started_at,ended_at,start_station_id,end_station_id,member_casual
r1,classic_bike,2024-03-01 08:00:06.432,2024-03-01 08:14:44.100,A32000,M32006,member
r2,electric_bike,2024-03-01 17:45:00,2024-03-01 18:02:00,M32006,Z99999,casual
";
        let trips = parse_trips(csv).unwrap();
        assert_eq!(trips.len(), 2);
        assert_eq!(trips[0].start_station_id, "A32000");
        assert_eq!(trips[0].started_at.hour(), 8);
        assert_eq!(trips[1].end_station_id, "Z99999");
        assert_eq!(trips[1].ended_at.minute(), 2);
    }

    #[test]
    fn test_parse_trips_bad_timestamp() {
        let csv = b"started_at,ended_at,start_station_id,end_station_id
yesterday,2024-03-01 08:00:00,A,B
";
        assert!(parse_trips(csv).is_err());
    }

    #[test]
    fn test_parse_timestamp_formats() {
        assert_eq!(parse_timestamp("2024-03-01 13:05").unwrap().minute(), 5);
        assert_eq!(parse_timestamp("2024-03-01T13:05:00").unwrap().hour(), 13);
        assert_eq!(
            parse_timestamp("2024-03-01T13:05:00-05:00").unwrap().hour(),
            13
        );
        assert!(matches!(
            parse_timestamp("13:05"),
            Err(TrafficError::InvalidTimestamp(_))
        ));
    }
}
