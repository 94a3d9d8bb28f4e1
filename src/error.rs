use std::path::PathBuf;

use thiserror::Error;

/// Fatal conditions surfaced by the validation gate.
///
/// Per-field problems are never errors; they become issue tags on the
/// affected record. Only run-level faults land here.
#[derive(Error, Debug)]
pub enum ValidatorError {
    #[error("input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("validator returned too few resorts ({got} < {min}); refusing to publish")]
    InsufficientResults { got: usize, min: usize },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, ValidatorError>;
