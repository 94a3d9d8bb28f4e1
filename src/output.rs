//! Output formatting and persistence for validation runs.
//!
//! Supports pretty-printing, the dated per-run JSON report, and the
//! append-only CSV run summary.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use csv::WriterBuilder;
use tracing::{debug, info};

use crate::error::Result;
use crate::validator::{RunSummary, ValidationResult};

/// Logs validation results as pretty-printed JSON.
pub fn print_json(results: &[ValidationResult]) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(results)?);
    Ok(())
}

/// Writes the per-run report to `dir/validation_<YYYYMMDD>.json`.
///
/// The directory is created if needed. A rerun on the same day overwrites
/// that day's report rather than accumulating copies.
pub fn write_results(dir: &Path, results: &[ValidationResult], date: NaiveDate) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;

    let path = dir.join(format!("validation_{}.json", date.format("%Y%m%d")));
    fs::write(&path, serde_json::to_string_pretty(results)?)?;
    info!(path = %path.display(), results = results.len(), "Wrote validation report");

    Ok(path)
}

/// Appends a [`RunSummary`] as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_summary(path: &Path, summary: &RunSummary) -> Result<()> {
    let file_exists = path.exists();
    debug!(path = %path.display(), file_exists, "Appending CSV summary");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    writer.serialize(summary)?;
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::{SourceType, ValidationStatus};
    use chrono::Utc;
    use std::env;

    fn sample_results() -> Vec<ValidationResult> {
        vec![
            ValidationResult {
                resort_name: "Niseko United".to_string(),
                validation_status: ValidationStatus::Valid,
                reliability_score: 1.0,
                validator_verified_at: Some("2026-01-10T08:00:00Z".to_string()),
            },
            ValidationResult {
                resort_name: "UNKNOWN".to_string(),
                validation_status: ValidationStatus::Invalid,
                reliability_score: 0.4,
                validator_verified_at: None,
            },
        ]
    }

    fn sample_summary() -> RunSummary {
        RunSummary {
            timestamp: Utc::now(),
            source_type: SourceType::Official,
            checked: 6,
            valid: 5,
            warnings: 1,
        }
    }

    #[test]
    fn test_print_json_does_not_panic() {
        print_json(&sample_results()).unwrap();
    }

    #[test]
    fn test_write_results_creates_dated_file() {
        let dir = env::temp_dir().join("japow_output_test_create");
        let _ = fs::remove_dir_all(&dir); // clean up any prior run

        let date = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        let path = write_results(&dir, &sample_results(), date).unwrap();

        assert_eq!(path, dir.join("validation_20260201.json"));
        let parsed: Vec<ValidationResult> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed, sample_results());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_write_results_overwrites_same_day() {
        let dir = env::temp_dir().join("japow_output_test_overwrite");
        let _ = fs::remove_dir_all(&dir);

        let date = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        let results = sample_results();
        write_results(&dir, &results, date).unwrap();
        write_results(&dir, &results[..1], date).unwrap();

        let parsed: Vec<ValidationResult> = serde_json::from_str(
            &fs::read_to_string(dir.join("validation_20260201.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(parsed.len(), 1);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_append_summary_writes_header_once() {
        let path = env::temp_dir().join("japow_output_test_header.csv");
        let _ = fs::remove_file(&path);

        append_summary(&path, &sample_summary()).unwrap();
        append_summary(&path, &sample_summary()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        // Header line should appear exactly once
        let header_count = content.lines().filter(|l| l.contains("timestamp")).count();
        assert_eq!(header_count, 1);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_append_summary_two_rows() {
        let path = env::temp_dir().join("japow_output_test_rows.csv");
        let _ = fs::remove_file(&path);

        append_summary(&path, &sample_summary()).unwrap();
        append_summary(&path, &sample_summary()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        // 1 header + 2 data rows
        assert_eq!(content.lines().count(), 3);

        fs::remove_file(&path).unwrap();
    }
}
