//! Export the current table and energy buckets to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::domain::{AggregationBucket, Granularity, RecordSet, TIMESTAMP_FORMAT};
use crate::error::{AppError, EXIT_INPUT};

#[derive(Serialize)]
struct TableRow {
    datetime: String,
    weekday: String,
    season: &'static str,
    load_mw: Option<f64>,
}

#[derive(Serialize)]
struct BucketRow {
    granularity: &'static str,
    period: String,
    total_mwh: Option<f64>,
    hours: usize,
}

/// Write table rows (timestamp, weekday, season, load) to a CSV file.
pub fn write_table_csv(path: &Path, rows: &RecordSet) -> Result<(), AppError> {
    let mut writer = open_writer(path)?;
    for r in rows {
        writer
            .serialize(TableRow {
                datetime: r.timestamp.format(TIMESTAMP_FORMAT).to_string(),
                weekday: r.weekday().to_string(),
                season: r.season().label(),
                load_mw: r.load,
            })
            .map_err(|e| write_error(path, e))?;
    }
    writer.flush().map_err(|e| write_error(path, e))?;
    info!(path = %path.display(), rows = rows.len(), "exported table");
    Ok(())
}

/// Write aggregated buckets to a CSV file. Periods without data get an empty total.
pub fn write_buckets_csv(path: &Path, buckets: &[AggregationBucket], granularity: Granularity) -> Result<(), AppError> {
    let mut writer = open_writer(path)?;
    for b in buckets {
        writer
            .serialize(BucketRow {
                granularity: granularity.display_name(),
                period: b.period.to_string(),
                total_mwh: b.has_data().then_some(b.total_load),
                hours: b.samples,
            })
            .map_err(|e| write_error(path, e))?;
    }
    writer.flush().map_err(|e| write_error(path, e))?;
    info!(path = %path.display(), buckets = buckets.len(), "exported buckets");
    Ok(())
}

fn open_writer(path: &Path) -> Result<csv::Writer<std::fs::File>, AppError> {
    csv::Writer::from_path(path)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to create export CSV '{}': {e}", path.display())))
}

fn write_error(path: &Path, e: impl std::fmt::Display) -> AppError {
    AppError::new(EXIT_INPUT, format!("Failed to write export CSV '{}': {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Record;
    use chrono::{NaiveDate, NaiveDateTime};

    #[test]
    fn table_export_has_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.csv");
        let rows = RecordSet::new(vec![
            Record::new(
                NaiveDateTime::parse_from_str("2020-07-01 13:00:00", TIMESTAMP_FORMAT).unwrap(),
                Some(41000.5),
            ),
            Record::new(
                NaiveDateTime::parse_from_str("2020-07-01 14:00:00", TIMESTAMP_FORMAT).unwrap(),
                None,
            ),
        ]);
        write_table_csv(&path, &rows).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "datetime,weekday,season,load_mw");
        assert_eq!(lines[1], "2020-07-01 13:00:00,Wed,Eté,41000.5");
        assert_eq!(lines[2], "2020-07-01 14:00:00,Wed,Eté,");
    }

    #[test]
    fn bucket_export() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("buckets.csv");
        let d = NaiveDate::from_ymd_opt(2020, 1, 31).unwrap();
        write_buckets_csv(
            &path,
            &[AggregationBucket { period: d, total_load: 1500.0, samples: 3 }],
            Granularity::Month,
        )
        .unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("granularity,period,total_mwh,hours\n"));
        assert!(text.contains("month,2020-01-31,1500.0,3"));
    }

    #[test]
    fn unwritable_path_is_input_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("t.csv");
        let err = write_table_csv(&path, &RecordSet::empty()).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_INPUT);
    }
}
