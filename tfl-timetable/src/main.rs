use std::process::ExitCode;

use tfl_timetable::clock::SystemClock;
use tfl_timetable::tfl::{TflClient, TflConfig};
use tfl_timetable::timetable::extract_timetable_rows;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: tfl-snapshot <line_id> <stop_id> <stop_sequence>";

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let [line_id, stop_id, stop_sequence] = args.as_slice() else {
        eprintln!("{USAGE}");
        return ExitCode::from(2);
    };
    let Ok(stop_sequence) = stop_sequence.parse::<u32>() else {
        eprintln!("stop_sequence must be a non-negative integer, got {stop_sequence:?}");
        eprintln!("{USAGE}");
        return ExitCode::from(2);
    };

    // Credentials are optional; anonymous access works at a lower rate limit
    let config = TflConfig::from_env();
    if config.credentials.app_key().is_none() {
        info!("TFL_APP_KEY not set, using anonymous access");
    }

    let client = match TflClient::new(config) {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "Failed to create TfL client");
            return ExitCode::FAILURE;
        }
    };

    let timetable = match client.get_timetable(line_id, stop_id).await {
        Ok(Some(timetable)) => timetable,
        Ok(None) => {
            info!(%line_id, %stop_id, "No timetable for this line and stop");
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            error!(%line_id, %stop_id, error = %e, "Failed to fetch timetable");
            return ExitCode::FAILURE;
        }
    };

    let rows = extract_timetable_rows(Some(&timetable), None, Some(stop_sequence), &SystemClock);
    let rows = match rows {
        Ok(rows) => rows,
        Err(e) => {
            error!(%line_id, %stop_id, error = %e, "Failed to extract timetable rows");
            return ExitCode::FAILURE;
        }
    };

    for row in &rows {
        match serde_json::to_string(row) {
            Ok(line) => println!("{line}"),
            Err(e) => {
                error!(error = %e, "Failed to serialize row");
                return ExitCode::FAILURE;
            }
        }
    }

    info!(%line_id, %stop_id, rows = rows.len(), "Timetable snapshot complete");
    ExitCode::SUCCESS
}
