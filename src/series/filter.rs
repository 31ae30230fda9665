//! Date-range and season filters.

use chrono::NaiveDate;

use crate::domain::{Record, RecordSet};

/// Keep records whose calendar date lies in `[start, end]`, sorted by timestamp.
///
/// Time of day is ignored. An inverted interval yields an empty set.
pub fn filter_by_date(records: &RecordSet, start: NaiveDate, end: NaiveDate) -> RecordSet {
    if start > end {
        return RecordSet::empty();
    }
    sorted(
        records
            .iter()
            .filter(|r| (start..=end).contains(&r.date()))
            .copied()
            .collect(),
    )
}

/// Keep records whose season label is one of `selected`, sorted by timestamp.
///
/// Labels are matched exactly against [`crate::domain::Season::label`]; unknown
/// labels never match and an empty selection keeps nothing.
pub fn filter_by_season<S: AsRef<str>>(records: &RecordSet, selected: &[S]) -> RecordSet {
    if selected.is_empty() {
        return RecordSet::empty();
    }
    sorted(
        records
            .iter()
            .filter(|r| {
                let label = r.season().label();
                selected.iter().any(|s| s.as_ref() == label)
            })
            .copied()
            .collect(),
    )
}

fn sorted(mut records: Vec<Record>) -> RecordSet {
    records.sort_by_key(|r| r.timestamp);
    RecordSet::new(records)
}
