//! Timestamp normalization.

use chrono::NaiveDateTime;

use crate::domain::{RawRecord, Record, RecordSet, TIMESTAMP_FORMAT};
use crate::error::ParseError;

/// Parse every raw timestamp with [`TIMESTAMP_FORMAT`].
///
/// Loads are copied unchanged and row order is preserved. The first timestamp
/// that does not match fails the whole call.
pub fn normalize(raw: &[RawRecord]) -> Result<RecordSet, ParseError> {
    raw.iter()
        .enumerate()
        .map(|(row, r)| {
            let timestamp = NaiveDateTime::parse_from_str(r.timestamp.trim(), TIMESTAMP_FORMAT)
                .map_err(|source| ParseError {
                    row,
                    value: r.timestamp.clone(),
                    format: TIMESTAMP_FORMAT,
                    source,
                })?;
            Ok(Record::new(timestamp, r.load))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(RecordSet::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    fn raw(ts: &str, load: Option<f64>) -> RawRecord {
        RawRecord {
            timestamp: ts.to_string(),
            load,
        }
    }

    #[test]
    fn parses_and_copies_loads() {
        let input = vec![
            raw("1998-12-31 01:00:00", Some(29309.0)),
            raw("1998-12-31 02:00:00", None),
        ];
        let set = normalize(&input).unwrap();
        assert_eq!(set.len(), 2);
        let first = set.records()[0];
        assert_eq!(first.date(), NaiveDate::from_ymd_opt(1998, 12, 31).unwrap());
        assert_eq!(first.timestamp.hour(), 1);
        assert_eq!(first.load, Some(29309.0));
        assert_eq!(set.records()[1].load, None);
        // Input is left as it was.
        assert_eq!(input[0].timestamp, "1998-12-31 01:00:00");
    }

    #[test]
    fn keeps_input_order() {
        let input = vec![
            raw("2001-01-02 00:00:00", Some(2.0)),
            raw("2001-01-01 00:00:00", Some(1.0)),
        ];
        let set = normalize(&input).unwrap();
        assert_eq!(set.records()[0].load, Some(2.0));
    }

    #[test]
    fn rejects_other_layouts() {
        let input = vec![
            raw("2001-01-01 00:00:00", Some(1.0)),
            raw("01/02/2001 00:00", Some(2.0)),
        ];
        let err = normalize(&input).unwrap_err();
        assert_eq!(err.row, 1);
        assert_eq!(err.value, "01/02/2001 00:00");
    }

    #[test]
    fn date_without_time_is_an_error() {
        assert!(normalize(&[raw("2001-01-01", Some(1.0))]).is_err());
    }

    #[test]
    fn empty_input_is_empty_set() {
        assert!(normalize(&[]).unwrap().is_empty());
    }
}
