//! Reporting: statistics, rankings, load distribution and formatted terminal output.

pub mod distribution;
pub mod format;
pub mod rank;
pub mod stats;

pub use distribution::{HistogramBin, histogram};
pub use rank::select_ranked;
pub use stats::{SummaryStatistics, summarize};
