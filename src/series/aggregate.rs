//! Day/week/month energy rollups.
//!
//! Aggregation is a two-stage reducer: records are first reduced to one bucket
//! per calendar day, then the daily buckets are re-keyed by the requested period
//! and summed again. Every granularity goes through the same daily stage, so the
//! grand total is identical across granularities.

use std::collections::BTreeMap;

use chrono::{Datelike, Days, NaiveDate};

use crate::domain::{AggregationBucket, Granularity, RecordSet};

/// Aggregate records into buckets of the given granularity, in chronological order.
pub fn aggregate(records: &RecordSet, granularity: Granularity) -> Vec<AggregationBucket> {
    rebucket(&daily_totals(records), granularity)
}

/// One bucket per distinct calendar date, summing non-missing loads.
///
/// A date whose loads are all missing still gets a bucket, with `samples == 0`.
/// No gap filling: dates absent from the input are absent from the output.
pub fn daily_totals(records: &RecordSet) -> Vec<AggregationBucket> {
    let mut days: BTreeMap<NaiveDate, BucketSum> = BTreeMap::new();
    for r in records {
        let entry = days.entry(r.date()).or_default();
        if let Some(load) = r.load {
            entry.total += load;
            entry.samples += 1;
        }
    }
    into_buckets(days)
}

/// Re-key daily buckets by `granularity` and sum them.
///
/// `daily` need not be sorted; the output always is.
pub fn rebucket(daily: &[AggregationBucket], granularity: Granularity) -> Vec<AggregationBucket> {
    let mut periods: BTreeMap<NaiveDate, BucketSum> = BTreeMap::new();
    for bucket in daily {
        let entry = periods.entry(period_key(bucket.period, granularity)).or_default();
        entry.total += bucket.total_load;
        entry.samples += bucket.samples;
    }
    into_buckets(periods)
}

/// Bucket key for a calendar date.
pub fn period_key(date: NaiveDate, granularity: Granularity) -> NaiveDate {
    match granularity {
        Granularity::Day => date,
        Granularity::Week => week_ending(date),
        Granularity::Month => month_end(date),
    }
}

/// The Sunday that closes the Monday–Sunday week containing `date`.
fn week_ending(date: NaiveDate) -> NaiveDate {
    let to_sunday = 6 - u64::from(date.weekday().num_days_from_monday());
    date.checked_add_days(Days::new(to_sunday)).unwrap_or(date)
}

fn month_end(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first_of_next| first_of_next.pred_opt())
        .unwrap_or(date)
}

#[derive(Debug, Default)]
struct BucketSum {
    total: f64,
    samples: usize,
}

fn into_buckets(sums: BTreeMap<NaiveDate, BucketSum>) -> Vec<AggregationBucket> {
    sums.into_iter()
        .map(|(period, sum)| AggregationBucket {
            period,
            total_load: sum.total,
            samples: sum.samples,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Record, TIMESTAMP_FORMAT};
    use chrono::{NaiveDateTime, Weekday};

    fn rec(ts: &str, load: Option<f64>) -> Record {
        Record::new(NaiveDateTime::parse_from_str(ts, TIMESTAMP_FORMAT).unwrap(), load)
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn total(buckets: &[AggregationBucket]) -> f64 {
        buckets.iter().map(|b| b.total_load).sum()
    }

    /// Hourly rows over ~10 weeks spanning a month boundary, with a few gaps.
    fn hourly_fixture() -> RecordSet {
        let start = day(2021, 1, 20).and_hms_opt(0, 0, 0).unwrap();
        (0..(24 * 70))
            .filter(|h| h % 37 != 0)
            .map(|h| {
                let ts = start + chrono::Duration::hours(h);
                let load = if h % 53 == 0 { None } else { Some(1000.0 + (h % 24) as f64 * 10.0) };
                Record::new(ts, load)
            })
            .collect()
    }

    #[test]
    fn daily_buckets_sum_per_date() {
        let set = RecordSet::new(vec![
            rec("2020-01-01 00:00:00", Some(100.0)),
            rec("2020-01-01 01:00:00", Some(200.0)),
            rec("2020-06-15 00:00:00", Some(50.0)),
        ]);
        let daily = aggregate(&set, Granularity::Day);
        assert_eq!(daily.len(), 2);
        assert_eq!(daily[0].period, day(2020, 1, 1));
        assert!((daily[0].total_load - 300.0).abs() < 1e-9);
        assert_eq!(daily[1].period, day(2020, 6, 15));
        assert!((daily[1].total_load - 50.0).abs() < 1e-9);
    }

    #[test]
    fn missing_loads_are_excluded_not_zeroed() {
        let set = RecordSet::new(vec![
            rec("2020-01-01 00:00:00", Some(100.0)),
            rec("2020-01-01 01:00:00", None),
            rec("2020-01-02 00:00:00", None),
        ]);
        let daily = daily_totals(&set);
        assert_eq!(daily.len(), 2);
        assert_eq!(daily[0].samples, 1);
        assert!((daily[0].total_load - 100.0).abs() < 1e-9);
        assert!(!daily[1].has_data());
    }

    #[test]
    fn weeks_are_keyed_by_closing_sunday() {
        // 2020-01-01 is a Wednesday; 2020-01-05 the Sunday closing its week.
        let set = RecordSet::new(vec![
            rec("2020-01-01 00:00:00", Some(1.0)),
            rec("2020-01-05 23:00:00", Some(2.0)),
            rec("2020-01-06 00:00:00", Some(4.0)),
        ]);
        let weekly = aggregate(&set, Granularity::Week);
        assert_eq!(weekly.len(), 2);
        assert_eq!(weekly[0].period, day(2020, 1, 5));
        assert_eq!(weekly[0].period.weekday(), Weekday::Sun);
        assert!((weekly[0].total_load - 3.0).abs() < 1e-9);
        assert_eq!(weekly[1].period, day(2020, 1, 12));
    }

    #[test]
    fn months_are_keyed_by_month_end() {
        let set = RecordSet::new(vec![
            rec("2020-02-01 00:00:00", Some(1.0)),
            rec("2020-02-29 12:00:00", Some(2.0)),
            rec("2020-12-31 00:00:00", Some(5.0)),
        ]);
        let monthly = aggregate(&set, Granularity::Month);
        assert_eq!(monthly.len(), 2);
        assert_eq!(monthly[0].period, day(2020, 2, 29));
        assert!((monthly[0].total_load - 3.0).abs() < 1e-9);
        assert_eq!(monthly[1].period, day(2020, 12, 31));
    }

    #[test]
    fn totals_are_preserved_across_granularities() {
        let set = hourly_fixture();
        let grand: f64 = set.loads().sum();
        let day_total = total(&aggregate(&set, Granularity::Day));
        let week_total = total(&aggregate(&set, Granularity::Week));
        let month_total = total(&aggregate(&set, Granularity::Month));
        assert!((day_total - grand).abs() < 1e-6);
        assert!((week_total - day_total).abs() < 1e-6);
        assert!((month_total - day_total).abs() < 1e-6);
    }

    #[test]
    fn periods_strictly_increase() {
        let set = hourly_fixture();
        for g in [Granularity::Day, Granularity::Week, Granularity::Month] {
            let buckets = aggregate(&set, g);
            assert!(buckets.windows(2).all(|w| w[0].period < w[1].period), "{g:?}");
        }
    }

    #[test]
    fn rebucket_accepts_unsorted_days() {
        let daily = vec![
            AggregationBucket { period: day(2020, 1, 7), total_load: 2.0, samples: 1 },
            AggregationBucket { period: day(2020, 1, 1), total_load: 1.0, samples: 1 },
        ];
        let weekly = rebucket(&daily, Granularity::Week);
        assert_eq!(weekly[0].period, day(2020, 1, 5));
        assert_eq!(weekly[1].period, day(2020, 1, 12));
    }

    #[test]
    fn empty_input_gives_no_buckets() {
        assert!(aggregate(&RecordSet::empty(), Granularity::Month).is_empty());
    }
}
