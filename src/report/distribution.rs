//! Load distribution (histogram) for the distribution chart.

use crate::domain::RecordSet;

/// One equal-width histogram bin, `[lower, upper)` (the last bin is closed).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Bin the non-missing loads into `bins` equal-width bins over `[min, max]`.
///
/// Empty when there are no loads or `bins == 0`. When every load is equal a
/// single bin holds them all.
pub fn histogram(records: &RecordSet, bins: usize) -> Vec<HistogramBin> {
    let (min, max) = records
        .loads()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if bins == 0 || !min.is_finite() || !max.is_finite() {
        return Vec::new();
    }

    if max <= min {
        return vec![HistogramBin {
            lower: min,
            upper: max,
            count: records.loads().count(),
        }];
    }

    let width = (max - min) / bins as f64;
    let mut out: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            lower: min + width * i as f64,
            upper: if i + 1 == bins { max } else { min + width * (i + 1) as f64 },
            count: 0,
        })
        .collect();

    for v in records.loads() {
        let idx = (((v - min) / width).floor() as usize).min(bins - 1);
        out[idx].count += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Record, TIMESTAMP_FORMAT};
    use chrono::{Duration, NaiveDateTime};

    fn hourly(loads: &[Option<f64>]) -> RecordSet {
        let start = NaiveDateTime::parse_from_str("2020-01-01 00:00:00", TIMESTAMP_FORMAT).unwrap();
        loads
            .iter()
            .enumerate()
            .map(|(i, &load)| Record::new(start + Duration::hours(i as i64), load))
            .collect()
    }

    #[test]
    fn counts_every_load_once() {
        let set = hourly(&[Some(0.0), Some(1.0), Some(2.5), Some(10.0), None]);
        let h = histogram(&set, 4);
        assert_eq!(h.len(), 4);
        assert_eq!(h.iter().map(|b| b.count).sum::<usize>(), 4);
        assert_eq!(h[0].count, 2);
        assert_eq!(h[1].count, 1);
        // Max lands in the last bin.
        assert_eq!(h[3].count, 1);
        assert_eq!(h[3].upper, 10.0);
    }

    #[test]
    fn constant_loads_share_one_bin() {
        let h = histogram(&hourly(&[Some(7.0), Some(7.0)]), 80);
        assert_eq!(h.len(), 1);
        assert_eq!(h[0].count, 2);
    }

    #[test]
    fn no_loads_no_bins() {
        assert!(histogram(&RecordSet::empty(), 80).is_empty());
        assert!(histogram(&hourly(&[None]), 80).is_empty());
        assert!(histogram(&hourly(&[Some(1.0)]), 0).is_empty());
    }
}
