//! Summary statistics over a record set.

use crate::domain::RecordSet;

/// Total, mean, peak and trough of the non-missing loads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryStatistics {
    /// Number of non-missing loads.
    pub count: usize,
    pub total: f64,
    pub mean: f64,
    pub max: f64,
    pub min: f64,
}

/// Summarize the loads of `records`.
///
/// Returns `None` when there is no load value at all (empty set, or every load
/// missing). Zero is a legitimate load, so "no data" is never reported as 0.
pub fn summarize(records: &RecordSet) -> Option<SummaryStatistics> {
    let mut count = 0usize;
    let mut total = 0.0;
    let mut max = f64::NEG_INFINITY;
    let mut min = f64::INFINITY;

    for load in records.loads() {
        count += 1;
        total += load;
        max = max.max(load);
        min = min.min(load);
    }

    if count == 0 {
        return None;
    }

    Some(SummaryStatistics {
        count,
        total,
        mean: total / count as f64,
        max,
        min,
    })
}
