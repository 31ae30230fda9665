//! Shared dashboard pipeline used by both the TUI and the text report.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! range filter -> season filter -> { summary, peaks, rollups, ranking, histogram }
//!
//! The front-ends then only render a `DashboardView`.

use tracing::debug;

use crate::domain::{AggregationBucket, RecordSet, ViewParams};
use crate::report::distribution::{HistogramBin, histogram};
use crate::report::rank::select_ranked;
use crate::report::stats::{SummaryStatistics, summarize};
use crate::series::{THRESHOLD_WARNING, aggregate, detect_peaks, filter_by_date, filter_by_season};

/// Everything one dashboard refresh displays.
#[derive(Debug, Clone, Default)]
pub struct DashboardView {
    /// Statistics over the whole source set (`None` = no data).
    pub overall: Option<SummaryStatistics>,
    /// Statistics over the current selection (`None` = no data).
    pub selection_summary: Option<SummaryStatistics>,
    /// Records inside the date range and selected seasons.
    pub selection: RecordSet,
    /// Peak overlay; `None` when hidden or when the threshold selects nothing.
    pub peaks: Option<RecordSet>,
    /// User-facing warning raised while building the view.
    pub warning: Option<String>,
    pub buckets: Vec<AggregationBucket>,
    /// Rows for the data table (all, top-N or bottom-N of the selection).
    pub table: RecordSet,
    pub histogram: Vec<HistogramBin>,
}

/// Run the dashboard pipeline for one set of parameters.
///
/// An absent source (missing input file) produces an empty view rather than an
/// error, so the front-ends can keep running and show their own message.
pub fn build_view(source: Option<&RecordSet>, params: &ViewParams) -> DashboardView {
    let Some(source) = source else {
        debug!("no source records; empty view");
        return DashboardView::default();
    };

    let in_range = filter_by_date(source, params.start, params.end);
    let selection = filter_by_season(&in_range, &params.seasons);
    debug!(
        source = source.len(),
        in_range = in_range.len(),
        selection = selection.len(),
        "filtered records"
    );

    let (peaks, warning) = if params.show_peaks {
        match detect_peaks(&selection, params.threshold) {
            Some(peaks) => (Some(peaks), None),
            None => (None, Some(THRESHOLD_WARNING.to_string())),
        }
    } else {
        (None, None)
    };

    let table = match params.table_mode.direction() {
        Some(direction) => select_ranked(&selection, params.rank_size, direction),
        None => selection.clone(),
    };

    DashboardView {
        overall: summarize(source),
        selection_summary: summarize(&selection),
        buckets: aggregate(&selection, params.granularity),
        histogram: histogram(&selection, params.histogram_bins),
        peaks,
        warning,
        table,
        selection,
    }
}
