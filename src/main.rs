//! CLI entry point for the station traffic map.
//!
//! Loads the station feed and the trip export, then renders the traffic view
//! for a time of day, inspects a single station, or sweeps the whole day.

use anyhow::Result;
use clap::{Parser, Subcommand};
use station_traffic::{
    loader::{load_source, parse_stations, parse_trips},
    output::{append_markers, print_json, print_pretty, write_json},
    time::{MINUTES_PER_DAY, format_time, parse_slider},
    view::TrafficMap,
};
use std::ffi::OsStr;
use std::path::Path;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

const DEFAULT_STATIONS: &str = "https://dsc106.com/labs/lab07/data/bluebikes-stations.json";
const DEFAULT_TRIPS: &str = "https://dsc106.com/labs/lab07/data/bluebikes-traffic-2024-03.csv";

#[derive(Parser)]
#[command(name = "station_traffic")]
#[command(about = "Bike-share station traffic by time of day", long_about = None)]
struct Cli {
    /// Station feed path or URL [env: STATIONS_SOURCE]
    #[arg(long, global = true)]
    stations: Option<String>,

    /// Trip CSV path or URL [env: TRIPS_SOURCE]
    #[arg(long, global = true)]
    trips: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render station markers for a time of day
    Render {
        /// Minute of the day (0-1439), or -1 for any time
        #[arg(short, long, default_value_t = -1, allow_negative_numbers = true)]
        time: i32,

        /// Write the view state to this JSON file
        #[arg(long)]
        json: Option<String>,

        /// Append the markers to this CSV file
        #[arg(long)]
        csv: Option<String>,
    },
    /// Show the tooltip for one station
    Inspect {
        /// Station short code
        #[arg(value_name = "STATION_ID")]
        station: String,

        /// Minute of the day (0-1439), or -1 for any time
        #[arg(short, long, default_value_t = -1, allow_negative_numbers = true)]
        time: i32,
    },
    /// Step through the day and append every step's markers to a CSV
    Sweep {
        /// Minutes between steps
        #[arg(short, long, default_value_t = 60)]
        step: u16,

        /// CSV file to append results to
        #[arg(short, long, default_value = "sweep.csv")]
        csv: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/station_traffic.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("station_traffic.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(
            EnvFilter::try_from_env("RUST_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        );

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(
            EnvFilter::try_from_env("RUST_LOG_JSON").unwrap_or_else(|_| EnvFilter::new("debug")),
        );

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %format!("{e:#}"), "Station traffic run failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let stations_src = cli
        .stations
        .or_else(|| std::env::var("STATIONS_SOURCE").ok())
        .unwrap_or_else(|| DEFAULT_STATIONS.to_string());
    let trips_src = cli
        .trips
        .or_else(|| std::env::var("TRIPS_SOURCE").ok())
        .unwrap_or_else(|| DEFAULT_TRIPS.to_string());

    let map = load_map(&stations_src, &trips_src).await?;

    match cli.command {
        Commands::Render { time, json, csv } => {
            let view = map.update(parse_slider(time)?);
            print_pretty(&view);

            if let Some(path) = json {
                write_json(&path, &view)?;
            }
            if let Some(path) = csv {
                append_markers(&path, &view.time_label, &view.markers)?;
            }
            if let Some(busiest) = view.busiest() {
                info!(
                    time = %label(&view.time_label),
                    station = %busiest.id,
                    total_traffic = busiest.total_traffic,
                    "Busiest station"
                );
            }
            print_json(&view)?;
        }
        Commands::Inspect { station, time } => {
            let view = map.update(parse_slider(time)?);
            match view.marker(&station) {
                Some(marker) => info!(
                    station = %marker.id,
                    name = marker.name.as_deref().unwrap_or(""),
                    time = %label(&view.time_label),
                    radius = marker.radius,
                    departure_ratio = marker.departure_ratio,
                    "{}",
                    marker.tooltip
                ),
                None => warn!(station = %station, "Station not in station list"),
            }
        }
        Commands::Sweep { step, csv } => {
            sweep(&map, step, &csv)?;
        }
    }

    Ok(())
}

/// Loads stations, then trips. Either failing aborts before anything renders.
#[tracing::instrument]
async fn load_map(stations_src: &str, trips_src: &str) -> Result<TrafficMap> {
    let stations = parse_stations(&load_source(stations_src).await?)?;
    info!(count = stations.len(), "Stations loaded");

    let trips = parse_trips(&load_source(trips_src).await?)?;
    info!(count = trips.len(), "Trips loaded");

    Ok(TrafficMap::new(stations, trips))
}

/// Moves the time selection across the day in `step` minute increments.
#[tracing::instrument(skip(map))]
fn sweep(map: &TrafficMap, step: u16, csv: &str) -> Result<()> {
    let step = step.max(1);
    let mut steps = 0;

    for minute in (0..MINUTES_PER_DAY).step_by(step as usize) {
        let view = map.update(Some(minute));
        append_markers(csv, &view.time_label, &view.markers)?;

        if let Some(busiest) = view.busiest() {
            info!(
                time = %format_time(minute),
                station = %busiest.id,
                total_traffic = busiest.total_traffic,
                "Busiest station"
            );
        }
        steps += 1;
    }

    info!(steps, csv, "Sweep complete");
    Ok(())
}

fn label(time_label: &str) -> &str {
    if time_label.is_empty() {
        "any time"
    } else {
        time_label
    }
}
