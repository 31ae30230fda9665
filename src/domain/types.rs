//! Shared domain types.
//!
//! Everything here is plain data: records, the record set container, and the
//! small enums that parameterize the dashboard views. No I/O and no filtering
//! logic live in this module.

use std::path::PathBuf;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Weekday};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Timestamp layout of the source file (`YYYY-MM-DD HH:MM:SS`).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Default number of rows for top/bottom rankings.
pub const DEFAULT_RANK_SIZE: usize = 10;

/// Default number of histogram bins for the load distribution.
pub const DEFAULT_HISTOGRAM_BINS: usize = 80;

/// One CSV row before timestamp normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub timestamp: String,
    /// Load in MW; `None` when the cell was empty.
    pub load: Option<f64>,
}

/// One normalized hourly observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Record {
    pub timestamp: NaiveDateTime,
    /// Load in MW. Missing loads are skipped by every statistic.
    pub load: Option<f64>,
}

impl Record {
    pub fn new(timestamp: NaiveDateTime, load: Option<f64>) -> Self {
        Self { timestamp, load }
    }

    /// Calendar date of the observation (time of day dropped).
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    pub fn season(&self) -> Season {
        Season::from_month(self.timestamp.month())
    }

    pub fn weekday(&self) -> Weekday {
        self.timestamp.weekday()
    }
}

/// An ordered sequence of records.
///
/// Sets built from raw input keep file order; sets returned by the filters are
/// sorted ascending by timestamp. The container is never mutated once built:
/// every transformation borrows it and returns a new one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordSet {
    records: Vec<Record>,
}

impl RecordSet {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Non-missing loads, in set order.
    pub fn loads(&self) -> impl Iterator<Item = f64> + '_ {
        self.records.iter().filter_map(|r| r.load)
    }

    /// First and last calendar date present, regardless of ordering.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.records.iter().map(Record::date).min()?;
        let last = self.records.iter().map(Record::date).max()?;
        Some((first, last))
    }

    pub fn is_sorted_by_timestamp(&self) -> bool {
        self.records
            .windows(2)
            .all(|w| w[0].timestamp <= w[1].timestamp)
    }
}

impl FromIterator<Record> for RecordSet {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Meteorological season derived from the month of a timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Autumn,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Winter, Season::Spring, Season::Summer, Season::Autumn];

    /// {12,1,2} winter, {3,4,5} spring, {6,7,8} summer, {9,10,11} autumn.
    pub fn from_month(month: u32) -> Season {
        match month {
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            9..=11 => Season::Autumn,
            _ => Season::Winter,
        }
    }

    /// Canonical selection label, as shown in the season multi-select.
    ///
    /// Selections match these labels exactly (case-sensitive).
    pub fn label(self) -> &'static str {
        match self {
            Season::Winter => "Hiver",
            Season::Spring => "Printemps",
            Season::Summer => "Eté",
            Season::Autumn => "Automne",
        }
    }

    pub fn parse_label(label: &str) -> Option<Season> {
        Season::ALL.into_iter().find(|s| s.label() == label)
    }

    /// Every canonical label, in calendar order.
    pub fn all_labels() -> Vec<String> {
        Season::ALL.iter().map(|s| s.label().to_string()).collect()
    }
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Bucket size for energy rollups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Day,
    Week,
    Month,
}

impl Granularity {
    pub fn display_name(self) -> &'static str {
        match self {
            Granularity::Day => "day",
            Granularity::Week => "week",
            Granularity::Month => "month",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Granularity::Day => Granularity::Week,
            Granularity::Week => Granularity::Month,
            Granularity::Month => Granularity::Day,
        }
    }
}

/// One aggregated period.
///
/// `period` is the bucket key: the day itself for daily buckets, the Sunday that
/// closes the week for weekly buckets, and the last day of the month for monthly
/// buckets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AggregationBucket {
    pub period: NaiveDate,
    /// Summed load (MWh for hourly input).
    pub total_load: f64,
    /// Number of non-missing loads that contributed to `total_load`.
    pub samples: usize,
}

impl AggregationBucket {
    /// True when every record in the period had a missing load.
    pub fn has_data(&self) -> bool {
        self.samples > 0
    }
}

/// Which end of the load ranking to select.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankDirection {
    Top,
    Bottom,
}

/// Row-selection mode for the data table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TableMode {
    All,
    Top,
    Bottom,
}

impl TableMode {
    pub fn display_name(self) -> &'static str {
        match self {
            TableMode::All => "all",
            TableMode::Top => "top",
            TableMode::Bottom => "bottom",
        }
    }

    pub fn next(self) -> Self {
        match self {
            TableMode::All => TableMode::Top,
            TableMode::Top => TableMode::Bottom,
            TableMode::Bottom => TableMode::All,
        }
    }

    pub fn direction(self) -> Option<RankDirection> {
        match self {
            TableMode::All => None,
            TableMode::Top => Some(RankDirection::Top),
            TableMode::Bottom => Some(RankDirection::Bottom),
        }
    }
}

/// Column names of the source file.
#[derive(Debug, Clone)]
pub struct SourceSpec {
    pub path: PathBuf,
    pub timestamp_column: String,
    pub load_column: String,
}

/// The interactive parameters of one dashboard view.
///
/// Derived from CLI flags (plus defaults) and then edited in the TUI.
#[derive(Debug, Clone)]
pub struct ViewParams {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Selected season labels (see [`Season::label`]).
    pub seasons: Vec<String>,
    pub threshold: f64,
    pub show_peaks: bool,
    pub granularity: Granularity,
    pub table_mode: TableMode,
    pub rank_size: usize,
    pub histogram_bins: usize,
}

impl ViewParams {
    /// Parameters covering the whole span with every season selected.
    pub fn for_span(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start,
            end,
            seasons: Season::all_labels(),
            threshold: 0.0,
            show_peaks: false,
            granularity: Granularity::Day,
            table_mode: TableMode::All,
            rank_size: DEFAULT_RANK_SIZE,
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
        }
    }

    pub fn season_selected(&self, season: Season) -> bool {
        self.seasons.iter().any(|s| s == season.label())
    }

    /// Add or remove a season from the selection, keeping calendar order.
    pub fn toggle_season(&mut self, season: Season) {
        let selected = !self.season_selected(season);
        self.seasons = Season::ALL
            .into_iter()
            .filter(|&s| if s == season { selected } else { self.season_selected(s) })
            .map(|s| s.label().to_string())
            .collect();
    }
}
