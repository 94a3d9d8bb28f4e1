//! CLI entry point for the Japow resort data validator.
//!
//! Provides subcommands for validating a resort data file once, running the
//! validation gate on a schedule, and building the daily weather snapshot
//! served next to the resort pages.

use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};
use japow_validator::{
    error::ValidatorError,
    loader::load_records,
    output::{append_summary, print_json, write_results},
    validator::{validate_records_at, RunSummary, SourceType, ValidationResult},
    weather::{build_snapshot, load_locations, write_snapshot, OpenMeteoClient},
};
use std::ffi::OsStr;
use std::path::Path;
use tracing::{error, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "japow_validator")]
#[command(about = "A data quality gate for Japow resort records", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a resort data file once and write the dated report
    Validate {
        /// Path to a JSON or CSV resort data file
        #[arg(value_name = "FILE")]
        source: String,

        /// Directory to write validation reports to
        #[arg(short, long, default_value = "results")]
        output_dir: String,

        /// Provenance of the data: "official" or "community"
        #[arg(short, long, default_value = "official")]
        source_type: String,
    },
    /// Run the validation gate repeatedly at a fixed interval
    Run {
        /// Path to a JSON or CSV resort data file
        #[arg(value_name = "FILE", default_value = "resorts_master.json")]
        source: String,

        /// Directory to write validation reports to
        #[arg(short, long, default_value = "results")]
        output_dir: String,

        /// Provenance of the data: "official" or "community"
        #[arg(short, long, default_value = "official")]
        source_type: String,

        /// Seconds to wait between runs
        #[arg(short, long, default_value_t = 86400)]
        interval: u64,

        /// Number of runs (0 = infinite)
        #[arg(short = 'n', long, default_value_t = 1)]
        num_runs: usize,
    },
    /// Build the daily weather snapshot from Open-Meteo
    Snapshot {
        /// Path to the resort locations JSON file
        #[arg(value_name = "FILE", default_value = "resorts_locations.json")]
        locations: String,

        /// Directory for dated snapshot archives
        #[arg(short, long, default_value = "snapshots/weather")]
        output_dir: String,

        /// Directory for the public latest.json
        #[arg(short, long, default_value = "public/japow-weather")]
        public_dir: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/japow_validator.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("japow_validator.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate {
            source,
            output_dir,
            source_type,
        } => {
            let (results, _) = run_once(
                Path::new(&source),
                Path::new(&output_dir),
                SourceType::from_label(&source_type),
            )?;
            print_json(&results)?;
        }
        Commands::Run {
            source,
            output_dir,
            source_type,
            interval,
            num_runs,
        } => {
            let source_type = SourceType::from_label(&source_type);

            if num_runs == 0 {
                info!(interval, "Running infinitely. Press Ctrl+C to stop.");
            } else {
                info!(num_runs, interval, "Starting validation runs");
            }

            let mut run_count = 0;
            loop {
                // Check if we've reached the run limit (0 = infinite)
                if num_runs > 0 && run_count >= num_runs {
                    break;
                }
                run_count += 1;

                info!(
                    run = run_count,
                    total = if num_runs == 0 { None } else { Some(num_runs) },
                    "Starting validation run"
                );

                // A failed run is logged and skipped; the schedule keeps going
                if let Err(e) = run_once(Path::new(&source), Path::new(&output_dir), source_type) {
                    match &e {
                        ValidatorError::InsufficientResults { .. } => {
                            error!(error = %e, "Refusing to publish undersized result set");
                        }
                        _ => error!(error = %e, "Validation run failed"),
                    }
                }

                // If not the last run, wait before the next iteration
                if num_runs == 0 || run_count < num_runs {
                    info!(interval, "Waiting before next run");
                    tokio::time::sleep(tokio::time::Duration::from_secs(interval)).await;
                }
            }

            info!(output_dir, "Finished validation runs");
        }
        Commands::Snapshot {
            locations,
            output_dir,
            public_dir,
        } => {
            build_weather_snapshot(
                Path::new(&locations),
                Path::new(&output_dir),
                Path::new(&public_dir),
            )
            .await?;
        }
    }

    Ok(())
}

/// Loads a resort data file, validates it, and persists the dated report
/// plus a summary row. Returns the results alongside the run summary.
#[tracing::instrument(skip_all, fields(source = %source.display(), source_type = ?source_type))]
fn run_once(
    source: &Path,
    output_dir: &Path,
    source_type: SourceType,
) -> Result<(Vec<ValidationResult>, RunSummary), ValidatorError> {
    let records = load_records(source)?;

    // One clock reading per run: scoring and the report date always agree
    let now = Utc::now();
    let results = validate_records_at(&records, source_type, now.naive_utc())?;
    write_results(output_dir, &results, now.date_naive())?;

    let summary = RunSummary::from_results(&results, source_type);
    append_summary(&output_dir.join("summary.csv"), &summary)?;

    info!(
        checked = summary.checked,
        valid = summary.valid,
        warnings = summary.warnings,
        "Validation run complete"
    );

    Ok((results, summary))
}

/// Fetches recent conditions for every resort and publishes the snapshot.
#[tracing::instrument(skip_all, fields(locations = %locations_path.display()))]
async fn build_weather_snapshot(
    locations_path: &Path,
    snapshot_dir: &Path,
    public_dir: &Path,
) -> Result<()> {
    let locations = load_locations(locations_path)?;
    info!(resorts = locations.len(), "Fetching recent conditions");

    let api = OpenMeteoClient::new()?;
    let now = Utc::now();
    let snapshot = build_snapshot(&api, &locations, now).await?;
    write_snapshot(&snapshot, snapshot_dir, public_dir, now.date_naive())?;

    Ok(())
}
