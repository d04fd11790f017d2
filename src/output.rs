//! Output formatting and persistence for view states.
//!
//! Supports pretty-printing, JSON files, and CSV append of station markers.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use crate::view::{StationMarker, ViewState};
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::Path;

/// One CSV row: a marker tagged with the time selection it belongs to.
#[derive(Serialize)]
struct MarkerRow<'a> {
    time: &'a str,
    id: &'a str,
    lon: f64,
    lat: f64,
    radius: f64,
    departure_ratio: f64,
    departures: u32,
    arrivals: u32,
    total_traffic: u32,
}

/// Logs a view state using Rust's debug pretty-print format.
pub fn print_pretty(view: &ViewState) {
    debug!("{:#?}", view);
}

/// Logs a view state as pretty-printed JSON.
pub fn print_json(view: &ViewState) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(view)?);
    Ok(())
}

/// Writes a view state to `path` as JSON, replacing any existing file.
pub fn write_json(path: &str, view: &ViewState) -> Result<()> {
    let body = serde_json::to_vec_pretty(view)?;
    std::fs::write(path, body).with_context(|| format!("failed to write {path}"))?;
    info!(path, markers = view.markers.len(), "View written");
    Ok(())
}

/// Appends markers as rows to a CSV file, labelled with `time`.
///
/// Creates the file with headers if it does not already exist.
pub fn append_markers(path: &str, time: &str, markers: &[StationMarker]) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, rows = markers.len(), "Appending CSV records");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists)
        .from_writer(file);

    for m in markers {
        writer.serialize(MarkerRow {
            time,
            id: &m.id,
            lon: m.lon,
            lat: m.lat,
            radius: m.radius,
            departure_ratio: m.departure_ratio,
            departures: m.departures,
            arrivals: m.arrivals,
            total_traffic: m.total_traffic,
        })?;
    }
    writer.flush()?;

    Ok(())
}
