//! CSV ingest.
//!
//! Turns the delimited source file into raw `(timestamp, load)` rows. Timestamps
//! stay strings here; parsing them is the job of `series::normalize`.
//!
//! Design goals:
//! - **Strict schema** for the two required columns (clear errors + exit code 2)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Missing file is its own error** so the dashboard can keep running without data

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use csv::StringRecord;
use tracing::{info, warn};

use crate::domain::{RawRecord, RecordSet, SourceSpec};
use crate::error::{AppError, SourceError};

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: raw rows + row errors.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub rows: Vec<RawRecord>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

/// Read the timestamp and load columns from `spec.path`.
pub fn load_raw_records(spec: &SourceSpec) -> Result<IngestedData, SourceError> {
    let path = spec.path.as_path();
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => SourceError::Missing {
            path: path.to_path_buf(),
        },
        _ => SourceError::Read {
            path: path.to_path_buf(),
            source: csv::Error::from(e),
        },
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|source| SourceError::Read {
            path: path.to_path_buf(),
            source,
        })?
        .clone();
    let header_map = build_header_map(&headers);

    let ts_idx = column_index(&header_map, &spec.timestamp_column, path)?;
    let load_idx = column_index(&header_map, &spec.load_column, path)?;

    let mut rows = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2: records() starts after the header line, and lines are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, ts_idx, load_idx) {
            Ok(row) => rows.push(row),
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    if !row_errors.is_empty() {
        warn!(
            skipped = row_errors.len(),
            first_line = row_errors[0].line,
            "skipped invalid rows"
        );
    }
    info!(path = %path.display(), rows = rows.len(), rows_read, "loaded source file");

    Ok(IngestedData {
        rows,
        row_errors,
        rows_read,
    })
}

/// Read and normalize the source in one step.
///
/// A missing file is not an error at this level: it yields `Ok(None)` plus the
/// message to show, so the dashboard keeps running with an absent record set.
/// Malformed timestamps and unreadable files are hard failures.
pub fn load_record_set(spec: &SourceSpec) -> Result<(Option<RecordSet>, Option<String>), AppError> {
    match load_raw_records(spec) {
        Ok(ingested) => {
            let records = crate::series::normalize(&ingested.rows)?;
            let note = (!ingested.row_errors.is_empty()).then(|| {
                format!(
                    "Skipped {} invalid row(s) (first at line {}).",
                    ingested.row_errors.len(),
                    ingested.row_errors[0].line
                )
            });
            Ok((Some(records), note))
        }
        Err(err @ SourceError::Missing { .. }) => {
            warn!(error = %err, "source file missing");
            Ok((None, Some(err.to_string())))
        }
        Err(err) => Err(err.into()),
    }
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn column_index(header_map: &HashMap<String, usize>, column: &str, path: &Path) -> Result<usize, SourceError> {
    header_map
        .get(&normalize_header_name(column))
        .copied()
        .ok_or_else(|| SourceError::MissingColumn {
            path: path.to_path_buf(),
            column: column.to_string(),
        })
}

fn parse_row(record: &StringRecord, ts_idx: usize, load_idx: usize) -> Result<RawRecord, String> {
    let timestamp = record
        .get(ts_idx)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| "Missing timestamp value.".to_string())?
        .to_string();

    let load = match record.get(load_idx).filter(|s| !s.is_empty()) {
        None => None,
        Some(s) if s.eq_ignore_ascii_case("nan") => None,
        Some(s) => {
            let v = s
                .parse::<f64>()
                .map_err(|_| format!("Invalid load value '{s}'."))?;
            if !v.is_finite() {
                return Err(format!("Non-finite load value '{s}'."));
            }
            Some(v)
        }
    };

    Ok(RawRecord { timestamp, load })
}
