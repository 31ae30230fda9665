//! Plain-text rendering of a dashboard view.
//!
//! We keep formatting code in one place so:
//! - the pipeline stays free of presentation concerns
//! - output changes are localized (important for future snapshot tests)

use crate::app::pipeline::DashboardView;
use crate::domain::{AggregationBucket, RecordSet, SourceSpec, ViewParams};
use crate::report::stats::SummaryStatistics;

/// Format the metric tiles, selection parameters and warnings.
pub fn format_summary(view: &DashboardView, params: &ViewParams, source: &SourceSpec) -> String {
    let mut out = String::new();

    out.push_str("=== load-dash - hourly load dashboard ===\n");
    out.push_str(&format!("Source: {}\n", source.path.display()));
    out.push_str(&format!(
        "Selection: {} -> {} | seasons: {} | granularity: {}\n",
        params.start,
        params.end,
        fmt_seasons(&params.seasons),
        params.granularity.display_name(),
    ));

    out.push_str("\nWhole dataset:\n");
    out.push_str(&format_tiles(view.overall.as_ref()));
    out.push_str("\nSelection:\n");
    out.push_str(&format_tiles(view.selection_summary.as_ref()));

    if params.show_peaks {
        match &view.peaks {
            Some(peaks) => out.push_str(&format!(
                "\nPeaks: {} hour(s) at or above {:.0} MW\n",
                peaks.len(),
                params.threshold
            )),
            None => out.push_str("\nPeaks: no selection\n"),
        }
    }
    if let Some(warning) = &view.warning {
        out.push_str(&format!("Warning: {warning}\n"));
    }
    out.push('\n');

    out
}

/// The four metric tiles: total, mean, peak and trough.
pub fn format_tiles(stats: Option<&SummaryStatistics>) -> String {
    let Some(s) = stats else {
        return "  no data\n".to_string();
    };
    format!(
        "  total {:>18} MW | mean {:>10} MW | peak {:>10} MW | trough {:>10} MW | n={}\n",
        fmt_mw(s.total),
        fmt_mw(s.mean),
        fmt_mw(s.max),
        fmt_mw(s.min),
        s.count,
    )
}

/// Format aggregated energy per period.
pub fn format_buckets(buckets: &[AggregationBucket], params: &ViewParams) -> String {
    let mut out = String::new();
    out.push_str(&format!("Energy per {}:\n", params.granularity.display_name()));
    out.push_str(format!("{:<12} {:>18} {:>8}", "period", "total_mwh", "hours").trim_end());
    out.push('\n');
    out.push_str(format!("{:-<12} {:-<18} {:-<8}", "", "", "").trim_end());
    out.push('\n');
    for b in buckets {
        let total = if b.has_data() { fmt_mw(b.total_load) } else { "-".to_string() };
        out.push_str(&format!("{:<12} {:>18} {:>8}\n", b.period, total, b.samples));
    }
    out
}

/// Format the data table rows (timestamp, weekday, season, load).
pub fn format_table(rows: &RecordSet, limit: usize) -> String {
    let mut out = String::new();
    out.push_str(
        format!("{:<19} {:<4} {:<10} {:>10}", "datetime", "day", "season", "load_mw").trim_end(),
    );
    out.push('\n');
    out.push_str(format!("{:-<19} {:-<4} {:-<10} {:-<10}", "", "", "", "").trim_end());
    out.push('\n');

    for r in rows.iter().take(limit) {
        out.push_str(&format!(
            "{:<19} {:<4} {:<10} {:>10}\n",
            r.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            r.weekday().to_string(),
            r.season().label(),
            r.load.map(fmt_mw).unwrap_or_else(|| "-".to_string()),
        ));
    }
    if rows.len() > limit {
        out.push_str(&format!("... {} more row(s)\n", rows.len() - limit));
    }
    out
}

/// Thousands-separated, no decimals: `1234567.8` -> `1,234,568`.
pub fn fmt_mw(v: f64) -> String {
    let rounded = v.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0.0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

fn fmt_seasons(seasons: &[String]) -> String {
    if seasons.is_empty() {
        "(none)".to_string()
    } else {
        seasons.join(", ")
    }
}
