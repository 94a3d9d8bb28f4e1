//! Run orchestration: per-record verdicts, scoring, and the output-size
//! guardrail.

use std::path::Path;

use chrono::{NaiveDateTime, Utc};
use tracing::debug;

use crate::error::{Result, ValidatorError};
use crate::loader;
use crate::validator::checks::{parse_iso, structural_issues};
use crate::validator::types::{RawResortRecord, SourceType, ValidationResult, ValidationStatus};
use crate::validator::weights::{completeness_weight, recency_weight, reliability_score};

/// Minimum number of results a run must produce. Anything smaller looks like
/// a demo or placeholder dataset and is refused wholesale.
pub const MIN_RESULTS: usize = 5;

/// Loads a data file and runs the full gate over it.
pub fn run_validation(path: &Path, source: SourceType) -> Result<Vec<ValidationResult>> {
    let records = loader::load_records(path)?;
    validate_records(&records, source)
}

/// Validates a batch against the wall clock, captured once for the whole
/// run so every record sees the same "now".
pub fn validate_records(
    records: &[RawResortRecord],
    source: SourceType,
) -> Result<Vec<ValidationResult>> {
    validate_records_at(records, source, Utc::now().naive_utc())
}

/// Validates a batch against an explicit "now".
///
/// Emits exactly one result per record, in input order. Per-field problems
/// only downgrade the affected record; the run as a whole fails with
/// [`ValidatorError::InsufficientResults`] when the batch is smaller than
/// [`MIN_RESULTS`].
pub fn validate_records_at(
    records: &[RawResortRecord],
    source: SourceType,
    now: NaiveDateTime,
) -> Result<Vec<ValidationResult>> {
    let source_weight = source.weight();
    let mut results = Vec::with_capacity(records.len());

    for record in records {
        let issues = structural_issues(record);
        let verified_at = parse_iso(record.last_verified.as_ref());

        let score = reliability_score(
            source_weight,
            recency_weight(verified_at, now),
            completeness_weight(record),
        );

        let status = if issues.is_empty() {
            ValidationStatus::Valid
        } else {
            debug!(resort = %record.display_name(), ?issues, "Structural issues found");
            ValidationStatus::Invalid
        };

        results.push(ValidationResult {
            resort_name: record.display_name(),
            validation_status: status,
            reliability_score: score,
            validator_verified_at: verified_at
                .map(|ts| format!("{}Z", ts.format("%Y-%m-%dT%H:%M:%S%.f"))),
        });
    }

    if results.len() < MIN_RESULTS {
        return Err(ValidatorError::InsufficientResults {
            got: results.len(),
            min: MIN_RESULTS,
        });
    }

    Ok(results)
}
