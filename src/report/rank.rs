//! Top/bottom selection by load.

use crate::domain::{RankDirection, Record, RecordSet};

/// The `n` records with the largest (`Top`) or smallest (`Bottom`) load.
///
/// Ordering is by load in the requested direction; equal loads keep their
/// original relative order. Records with a missing load are not ranked. When
/// `n` exceeds the number of ranked records, all of them are returned.
pub fn select_ranked(records: &RecordSet, n: usize, direction: RankDirection) -> RecordSet {
    let mut ranked: Vec<(f64, Record)> = records
        .iter()
        .filter_map(|r| r.load.map(|load| (load, *r)))
        .collect();

    // `sort_by` is stable, which gives the tie-break for free.
    match direction {
        RankDirection::Top => ranked.sort_by(|a, b| b.0.total_cmp(&a.0)),
        RankDirection::Bottom => ranked.sort_by(|a, b| a.0.total_cmp(&b.0)),
    }

    ranked.into_iter().take(n).map(|(_, r)| r).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DEFAULT_RANK_SIZE, TIMESTAMP_FORMAT};
    use chrono::{Duration, NaiveDateTime};

    fn hourly(loads: &[Option<f64>]) -> RecordSet {
        let start = NaiveDateTime::parse_from_str("2020-01-01 00:00:00", TIMESTAMP_FORMAT).unwrap();
        loads
            .iter()
            .enumerate()
            .map(|(i, &load)| Record::new(start + Duration::hours(i as i64), load))
            .collect()
    }

    fn loads(set: &RecordSet) -> Vec<f64> {
        set.loads().collect()
    }

    #[test]
    fn top_and_bottom() {
        let set = hourly(&[Some(3.0), Some(9.0), Some(1.0), Some(7.0)]);
        assert_eq!(loads(&select_ranked(&set, 2, RankDirection::Top)), vec![9.0, 7.0]);
        assert_eq!(loads(&select_ranked(&set, 2, RankDirection::Bottom)), vec![1.0, 3.0]);
    }

    #[test]
    fn ties_keep_original_order() {
        let set = hourly(&[Some(5.0), Some(8.0), Some(5.0), Some(8.0)]);
        let top = select_ranked(&set, 4, RankDirection::Top);
        let hours: Vec<_> = top.iter().map(|r| r.timestamp).collect();
        let src = set.records();
        assert_eq!(
            hours,
            vec![src[1].timestamp, src[3].timestamp, src[0].timestamp, src[2].timestamp]
        );
    }

    #[test]
    fn oversized_n_returns_everything_sorted() {
        let set = hourly(&[Some(2.0), None, Some(1.0), Some(3.0)]);
        let bottom = select_ranked(&set, 100, RankDirection::Bottom);
        assert_eq!(loads(&bottom), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn top_and_bottom_do_not_overlap_on_large_sets() {
        let values: Vec<_> = (0..50).map(|i| Some(((i * 17) % 50) as f64)).collect();
        let set = hourly(&values);
        let top = select_ranked(&set, DEFAULT_RANK_SIZE, RankDirection::Top);
        let bottom = select_ranked(&set, DEFAULT_RANK_SIZE, RankDirection::Bottom);
        assert_eq!(top.len(), 10);
        assert!(top.iter().all(|r| !bottom.records().contains(r)));
    }

    #[test]
    fn empty_set() {
        assert!(select_ranked(&RecordSet::empty(), 10, RankDirection::Top).is_empty());
    }
}
