//! Input loading for resort data files.
//!
//! Accepts the two shapes the pipeline is fed in practice: a JSON array of
//! record objects, or a CSV file with one record per row. Both land in the
//! same loosely-typed [`RawResortRecord`] so one malformed field never
//! sinks the whole batch.

use std::fs;
use std::io;
use std::path::Path;

use serde_json::{Map, Value};

use crate::error::{Result, ValidatorError};
use crate::validator::RawResortRecord;

/// Reads resort records from `path`, picking the format by file extension.
///
/// Anything that is not `.csv` is treated as JSON.
///
/// # Errors
///
/// Returns [`ValidatorError::InputNotFound`] when the file does not exist,
/// or a parse error when the contents are not valid JSON or CSV.
pub fn load_records(path: &Path) -> Result<Vec<RawResortRecord>> {
    if !path.exists() {
        return Err(ValidatorError::InputNotFound(path.to_path_buf()));
    }

    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

    if is_csv {
        records_from_csv(fs::File::open(path)?)
    } else {
        records_from_json(&fs::read(path)?)
    }
}

/// Parses a JSON array of resort objects.
pub fn records_from_json(bytes: &[u8]) -> Result<Vec<RawResortRecord>> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Parses CSV rows into records, one record per row.
///
/// Cells come through as strings. Empty cells are dropped entirely so they
/// behave exactly like a missing JSON key downstream.
pub fn records_from_csv<R: io::Read>(reader: R) -> Result<Vec<RawResortRecord>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let headers = csv_reader.headers()?.clone();

    let mut records = Vec::new();
    for row in csv_reader.records() {
        let row = row?;
        let mut object = Map::new();
        for (header, cell) in headers.iter().zip(row.iter()) {
            if !cell.is_empty() {
                object.insert(header.to_string(), Value::String(cell.to_string()));
            }
        }
        records.push(serde_json::from_value(Value::Object(object))?);
    }

    Ok(records)
}
