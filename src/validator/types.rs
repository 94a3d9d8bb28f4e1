//! Record and result types for the validation gate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Sentinel used for the output `resort_name` when the input has none.
pub const UNKNOWN_NAME: &str = "UNKNOWN";

/// Results scoring below this are counted as warnings in the run summary.
pub const WARNING_THRESHOLD: f64 = 0.75;

/// A single resort entry as it appears in the source data.
///
/// The guide data is hand-maintained, so every field is kept as a raw JSON
/// value and typing happens during validation. Absent keys and JSON nulls
/// both deserialize to `None`; unknown keys are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawResortRecord {
    #[serde(default)]
    pub resort_name: Option<Value>,
    #[serde(default)]
    pub region: Option<Value>,
    #[serde(default)]
    pub elevation_m: Option<Value>,
    #[serde(default)]
    pub terrain_mix: Option<Value>,
    #[serde(default)]
    pub avg_snowfall_cm: Option<Value>,
    #[serde(default)]
    pub english_support: Option<Value>,
    #[serde(default)]
    pub last_verified: Option<Value>,
}

impl RawResortRecord {
    /// The required-field set behind the completeness weight, in schema order.
    pub fn required_fields(&self) -> [(&'static str, Option<&Value>); 7] {
        [
            ("resort_name", self.resort_name.as_ref()),
            ("region", self.region.as_ref()),
            ("elevation_m", self.elevation_m.as_ref()),
            ("terrain_mix", self.terrain_mix.as_ref()),
            ("avg_snowfall_cm", self.avg_snowfall_cm.as_ref()),
            ("english_support", self.english_support.as_ref()),
            ("last_verified", self.last_verified.as_ref()),
        ]
    }

    /// Output name for this record: the input value when present (strings
    /// verbatim, anything else in its JSON form), otherwise [`UNKNOWN_NAME`].
    pub fn display_name(&self) -> String {
        match &self.resort_name {
            None => UNKNOWN_NAME.to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }
}

/// Caller-declared classification of where a batch came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Official,
    Community,
}

impl SourceType {
    /// Maps a raw label: exactly "official" is official trust, anything else
    /// is community-grade.
    pub fn from_label(label: &str) -> Self {
        if label == "official" {
            SourceType::Official
        } else {
            SourceType::Community
        }
    }

    /// Fixed trust weight fed into the composite score.
    pub fn weight(self) -> f64 {
        match self {
            SourceType::Official => 1.0,
            SourceType::Community => 0.7,
        }
    }
}

/// Verdict for a single record, independent of its reliability score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    Valid,
    Invalid,
}

/// Scored verdict for a single input record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub resort_name: String,
    pub validation_status: ValidationStatus,
    pub reliability_score: f64,
    pub validator_verified_at: Option<String>,
}

/// Per-run roll-up logged after validation and appended to the summary CSV.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub timestamp: DateTime<Utc>,
    pub source_type: SourceType,
    pub checked: usize,
    pub valid: usize,
    pub warnings: usize,
}

impl RunSummary {
    pub fn from_results(results: &[ValidationResult], source: SourceType) -> Self {
        let valid = results
            .iter()
            .filter(|r| r.validation_status == ValidationStatus::Valid)
            .count();
        let warnings = results
            .iter()
            .filter(|r| r.reliability_score < WARNING_THRESHOLD)
            .count();

        RunSummary {
            timestamp: Utc::now(),
            source_type: source,
            checked: results.len(),
            valid,
            warnings,
        }
    }
}
