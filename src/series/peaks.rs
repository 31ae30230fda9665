//! Threshold (peak) detection.

use tracing::warn;

use crate::domain::RecordSet;

/// Message the presentation layer shows when the threshold cannot select anything.
pub const THRESHOLD_WARNING: &str = "The threshold must be greater than 0.";

/// Select records whose load is at least `threshold`, keeping input order.
///
/// Returns `None` ("no selection") when `threshold` is not strictly positive.
/// That is different from `Some` of an empty set, which means a valid threshold
/// that nothing reaches. Missing loads never match.
pub fn detect_peaks(records: &RecordSet, threshold: f64) -> Option<RecordSet> {
    if threshold.is_nan() || threshold <= 0.0 {
        warn!(threshold, "non-positive peak threshold; no selection");
        return None;
    }
    Some(
        records
            .iter()
            .filter(|r| r.load.is_some_and(|load| load >= threshold))
            .copied()
            .collect(),
    )
}
