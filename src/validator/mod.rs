//! Record validation and reliability scoring.
//!
//! This module checks each resort record for structural problems, blends
//! source trust, recency, and completeness into a reliability score, and
//! refuses to publish suspiciously small result sets.

pub mod checks;
pub mod engine;
pub mod types;
pub mod weights;

pub use engine::{run_validation, validate_records, validate_records_at, MIN_RESULTS};
pub use types::{
    RawResortRecord, RunSummary, SourceType, ValidationResult, ValidationStatus,
    WARNING_THRESHOLD,
};
