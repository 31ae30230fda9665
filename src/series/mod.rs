//! The record-set transformations behind every dashboard view.
//!
//! All functions here are pure: they borrow a `RecordSet` and return a new value.

pub mod aggregate;
pub mod filter;
pub mod normalize;
pub mod peaks;

pub use aggregate::{aggregate, daily_totals, rebucket};
pub use filter::{filter_by_date, filter_by_season};
pub use normalize::normalize;
pub use peaks::{detect_peaks, THRESHOLD_WARNING};
