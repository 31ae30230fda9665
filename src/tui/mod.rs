//! Ratatui-based terminal UI.
//!
//! The TUI provides a settings panel for the dashboard parameters (date range,
//! seasons, peak threshold, granularity, table mode) and renders one of four
//! panels: load overview, load distribution, energy per period, and the data
//! table. Every parameter change re-runs the pipeline from the range filter on.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, Timelike};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Clear, List, ListItem, Paragraph, Row, Table},
};
use tracing::{info, warn};

use crate::app::pipeline::{DashboardView, build_view};
use crate::domain::{AggregationBucket, RecordSet, Season, SourceSpec, ViewParams};
use crate::error::{AppError, EXIT_RUNTIME};
use crate::report::format::{fmt_mw, format_tiles};
use crate::report::stats::SummaryStatistics;

mod plotters_chart;

use plotters_chart::LoadPlottersChart;

/// Upper bound on line points handed to Plotters per redraw.
const MAX_LINE_POINTS: usize = 4000;

/// Threshold step for ←/→ (MW).
const THRESHOLD_STEP: f64 = 500.0;

/// Start the TUI.
pub fn run(
    spec: SourceSpec,
    records: Option<RecordSet>,
    params: ViewParams,
    note: Option<String>,
) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(spec, records, params, note);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(EXIT_RUNTIME, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(EXIT_RUNTIME, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// Settings rows, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Start,
    End,
    Season(Season),
    Threshold,
    ShowPeaks,
    Granularity,
    Table,
}

const FIELDS: [Field; 10] = [
    Field::Start,
    Field::End,
    Field::Season(Season::Winter),
    Field::Season(Season::Spring),
    Field::Season(Season::Summer),
    Field::Season(Season::Autumn),
    Field::Threshold,
    Field::ShowPeaks,
    Field::Granularity,
    Field::Table,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Panel {
    Overview,
    Distribution,
    Energy,
    Table,
}

impl Panel {
    fn next(self) -> Self {
        match self {
            Panel::Overview => Panel::Distribution,
            Panel::Distribution => Panel::Energy,
            Panel::Energy => Panel::Table,
            Panel::Table => Panel::Overview,
        }
    }

    fn title(self) -> &'static str {
        match self {
            Panel::Overview => "Load overview",
            Panel::Distribution => "Hourly load distribution (MW)",
            Panel::Energy => "Energy per period",
            Panel::Table => "Data",
        }
    }
}

struct App {
    spec: SourceSpec,
    source: Option<RecordSet>,
    params: ViewParams,
    view: DashboardView,
    selected_field: usize,
    editing: Option<Field>,
    input: String,
    panel: Panel,
    table_offset: usize,
    status: String,
}

impl App {
    fn new(spec: SourceSpec, source: Option<RecordSet>, params: ViewParams, note: Option<String>) -> Self {
        let mut app = Self {
            spec,
            source,
            params,
            view: DashboardView::default(),
            selected_field: 0,
            editing: None,
            input: String::new(),
            panel: Panel::Overview,
            table_offset: 0,
            status: String::new(),
        };
        app.refresh();
        if let Some(note) = note {
            app.status = note;
        }
        app
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(EXIT_RUNTIME, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code)? {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Re-run the pipeline for the current parameters.
    fn refresh(&mut self) {
        self.view = build_view(self.source.as_ref(), &self.params);
        self.table_offset = 0;
        self.status = match (&self.source, &self.view.warning) {
            (None, _) => format!("No data: {} could not be loaded.", self.spec.path.display()),
            (_, Some(warning)) => warning.clone(),
            _ => format!("{} hour(s) selected", self.view.selection.len()),
        };
    }

    fn handle_key(&mut self, code: KeyCode) -> Result<bool, AppError> {
        if self.editing.is_some() {
            self.handle_edit(code);
            return Ok(false);
        }

        match code {
            KeyCode::Char('q') => return Ok(true),
            KeyCode::Up => self.selected_field = self.selected_field.saturating_sub(1),
            KeyCode::Down => {
                if self.selected_field + 1 < FIELDS.len() {
                    self.selected_field += 1;
                }
            }
            KeyCode::Left => self.adjust_field(-1),
            KeyCode::Right => self.adjust_field(1),
            KeyCode::Char('[') => self.adjust_field(-30),
            KeyCode::Char(']') => self.adjust_field(30),
            KeyCode::Enter | KeyCode::Char(' ') => self.activate_field(),
            KeyCode::Tab => self.panel = self.panel.next(),
            KeyCode::PageDown => {
                let max = self.view.table.len().saturating_sub(1);
                self.table_offset = (self.table_offset + 20).min(max);
            }
            KeyCode::PageUp => self.table_offset = self.table_offset.saturating_sub(20),
            KeyCode::Char('r') => self.reload()?,
            KeyCode::Char('e') => self.export(),
            _ => {}
        }

        Ok(false)
    }

    fn handle_edit(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.editing = None;
                self.status = "Edit canceled.".to_string();
            }
            KeyCode::Enter => self.apply_input(),
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(c) => {
                let accepted = match self.editing {
                    Some(Field::Threshold) => c.is_ascii_digit() || c == '.' || c == '-',
                    _ => c.is_ascii_digit() || c == '-',
                };
                if accepted {
                    self.input.push(c);
                }
            }
            _ => {}
        }
    }

    fn current_field(&self) -> Field {
        FIELDS[self.selected_field.min(FIELDS.len() - 1)]
    }

    fn adjust_field(&mut self, delta: i64) {
        match self.current_field() {
            Field::Start => self.params.start = shift_date(self.params.start, delta),
            Field::End => self.params.end = shift_date(self.params.end, delta),
            Field::Season(season) => self.params.toggle_season(season),
            Field::Threshold => {
                self.params.threshold += THRESHOLD_STEP * delta.signum() as f64;
            }
            Field::ShowPeaks => self.params.show_peaks = !self.params.show_peaks,
            Field::Granularity => self.params.granularity = self.params.granularity.next(),
            Field::Table => self.params.table_mode = self.params.table_mode.next(),
        }
        self.refresh();
    }

    fn activate_field(&mut self) {
        let field = self.current_field();
        match field {
            Field::Start | Field::End => {
                self.editing = Some(field);
                self.input.clear();
                self.status = "Editing date (YYYY-MM-DD). Enter to apply, Esc to cancel.".to_string();
            }
            Field::Threshold => {
                self.editing = Some(field);
                self.input.clear();
                self.status = "Editing threshold (MW). Enter to apply, Esc to cancel.".to_string();
            }
            _ => self.adjust_field(1),
        }
    }

    fn apply_input(&mut self) {
        let Some(field) = self.editing.take() else {
            return;
        };
        let text = self.input.trim().to_string();
        match field {
            Field::Start | Field::End => match NaiveDate::parse_from_str(&text, "%Y-%m-%d") {
                Ok(date) => {
                    if field == Field::Start {
                        self.params.start = date;
                    } else {
                        self.params.end = date;
                    }
                    self.refresh();
                }
                Err(e) => self.status = format!("Invalid date '{text}': {e}"),
            },
            Field::Threshold => match text.parse::<f64>() {
                Ok(v) if v.is_finite() => {
                    self.params.threshold = v;
                    self.refresh();
                }
                _ => self.status = format!("Invalid threshold '{text}'."),
            },
            _ => {}
        }
    }

    fn reload(&mut self) -> Result<(), AppError> {
        let (records, note) = crate::io::load_record_set(&self.spec)?;
        self.source = records;
        self.refresh();
        if let Some(note) = note {
            self.status = note;
        } else {
            info!(path = %self.spec.path.display(), "reloaded source");
        }
        Ok(())
    }

    fn export(&mut self) {
        let table_path = PathBuf::from("load-dash-table.csv");
        let buckets_path = PathBuf::from(format!("load-dash-{}.csv", self.params.granularity.display_name()));
        let result = crate::io::export::write_table_csv(&table_path, &self.view.table).and_then(|()| {
            crate::io::export::write_buckets_csv(&buckets_path, &self.view.buckets, self.params.granularity)
        });
        self.status = match result {
            Ok(()) => format!("Exported {} and {}", table_path.display(), buckets_path.display()),
            Err(err) => {
                warn!(error = %err, "export failed");
                format!("Export failed: {err}")
            }
        };
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let lines = vec![
            Line::from(vec![
                Span::styled("load-dash", Style::default().fg(Color::Cyan)),
                Span::raw(format!(" | {}", self.spec.path.display())),
            ]),
            tiles_line("dataset  ", self.view.overall.as_ref()),
            tiles_line("selection", self.view.selection_summary.as_ref()),
        ];
        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(30)])
            .split(area);

        let block = Block::default().title(self.panel.title()).borders(Borders::ALL);
        let inner = block.inner(chunks[0]);
        frame.render_widget(block, chunks[0]);
        frame.render_widget(Clear, inner);

        if self.view.selection.is_empty() {
            let msg = Paragraph::new("No rows match the current selection.").style(Style::default().fg(Color::Yellow));
            frame.render_widget(msg, inner);
        } else {
            match self.panel {
                Panel::Overview => self.draw_overview(frame, inner),
                Panel::Distribution => self.draw_distribution(frame, inner),
                Panel::Energy => self.draw_energy(frame, inner),
                Panel::Table => self.draw_table(frame, inner),
            }
        }

        self.draw_settings(frame, chunks[1]);
    }

    fn draw_overview(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let series = chart_series(&self.view.selection, self.view.peaks.as_ref());
        let widget = LoadPlottersChart {
            line: &series.line,
            peaks: &series.peaks,
            threshold: self.view.peaks.as_ref().map(|_| self.params.threshold),
            x_bounds: series.x_bounds,
            y_bounds: series.y_bounds,
            x_label: "date",
            y_label: "load (MW)",
            fmt_x: fmt_axis_date,
            fmt_y: fmt_axis_mw,
        };
        frame.render_widget(widget, area);
    }

    fn draw_distribution(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let bars: Vec<Bar> = self
            .view
            .histogram
            .iter()
            .map(|b| Bar::default().value(b.count as u64).text_value(String::new()))
            .collect();
        let bar_width = bar_width_for(area.width, bars.len());

        let (lo, hi) = match (self.view.histogram.first(), self.view.histogram.last()) {
            (Some(first), Some(last)) => (first.lower, last.upper),
            _ => (0.0, 0.0),
        };
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(area);

        let chart = BarChart::default()
            .bar_width(bar_width)
            .bar_gap(0)
            .bar_style(Style::default().fg(Color::Cyan))
            .data(BarGroup::default().bars(&bars));
        frame.render_widget(chart, chunks[0]);

        let axis = Paragraph::new(format!(
            "{} MW .. {} MW ({} bins)",
            fmt_mw(lo),
            fmt_mw(hi),
            self.view.histogram.len()
        ))
        .style(Style::default().fg(Color::Gray));
        frame.render_widget(axis, chunks[1]);
    }

    fn draw_energy(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(area);

        let bar_width = 11u16;
        let shown = visible_buckets(&self.view.buckets, chunks[0].width, bar_width + 1);
        let bars: Vec<Bar> = shown
            .iter()
            .map(|b| {
                Bar::default()
                    .value(b.total_load.max(0.0).round() as u64)
                    .text_value(fmt_compact(b.total_load))
                    .label(Line::from(b.period.format("%Y-%m-%d").to_string()))
            })
            .collect();

        let chart = BarChart::default()
            .bar_width(bar_width)
            .bar_gap(1)
            .bar_style(Style::default().fg(Color::Green))
            .value_style(Style::default().fg(Color::Black).bg(Color::Green))
            .data(BarGroup::default().bars(&bars));
        frame.render_widget(chart, chunks[0]);

        let note = Paragraph::new(format!(
            "MWh per {} | showing last {} of {} period(s)",
            self.params.granularity.display_name(),
            shown.len(),
            self.view.buckets.len()
        ))
        .style(Style::default().fg(Color::Gray));
        frame.render_widget(note, chunks[1]);
    }

    fn draw_table(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let visible = area.height.saturating_sub(1) as usize;
        let rows: Vec<Row> = self
            .view
            .table
            .iter()
            .skip(self.table_offset)
            .take(visible)
            .map(|r| {
                Row::new(vec![
                    r.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
                    r.weekday().to_string(),
                    r.season().label().to_string(),
                    r.load.map(fmt_mw).unwrap_or_else(|| "-".to_string()),
                ])
            })
            .collect();

        let widths = [
            Constraint::Length(20),
            Constraint::Length(4),
            Constraint::Length(10),
            Constraint::Length(10),
        ];
        let header = Row::new(vec!["datetime", "day", "season", "load (MW)"])
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
        frame.render_widget(Table::new(rows, widths).header(header), area);
    }

    fn draw_settings(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let items: Vec<ListItem> = FIELDS
            .iter()
            .map(|&field| ListItem::new(self.field_label(field)))
            .collect();

        let list = List::new(items)
            .block(Block::default().title("Settings").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, area, &mut state);

        if self.editing.is_some() {
            let hint = Paragraph::new(format!("> {}", self.input))
                .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
            let rect = Rect {
                x: area.x + 2,
                y: area.y + area.height.saturating_sub(2),
                width: area.width.saturating_sub(4),
                height: 1,
            };
            frame.render_widget(hint, rect);
        }
    }

    fn field_label(&self, field: Field) -> String {
        let check = |on: bool| if on { "[x]" } else { "[ ]" };
        match field {
            Field::Start => format!("Start: {}", self.params.start),
            Field::End => format!("End:   {}", self.params.end),
            Field::Season(season) => format!("{} {}", check(self.params.season_selected(season)), season.label()),
            Field::Threshold => format!("Threshold: {} MW", fmt_mw(self.params.threshold)),
            Field::ShowPeaks => format!("{} Show peaks", check(self.params.show_peaks)),
            Field::Granularity => format!("Period: {}", self.params.granularity.display_name()),
            Field::Table => format!("Table: {}", self.params.table_mode.display_name()),
        }
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  ←/→ adjust  [/] ±30d  Enter edit  Tab panel  PgUp/PgDn rows  e export  r reload  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn tiles_line(label: &str, stats: Option<&SummaryStatistics>) -> Line<'static> {
    let tiles = format_tiles(stats);
    Line::from(Span::styled(
        format!("{label}{}", tiles.trim_end()),
        Style::default().fg(Color::Gray),
    ))
}

fn shift_date(date: NaiveDate, days: i64) -> NaiveDate {
    let step = Days::new(days.unsigned_abs());
    let shifted = if days >= 0 {
        date.checked_add_days(step)
    } else {
        date.checked_sub_days(step)
    };
    shifted.unwrap_or(date)
}

/// Chart data for the overview panel.
#[derive(Debug)]
struct ChartSeries {
    line: Vec<(f64, f64)>,
    peaks: Vec<(f64, f64)>,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
}

/// Build chart series for Plotters.
///
/// Missing loads break nothing: they are simply left out of the line.
fn chart_series(selection: &RecordSet, peaks: Option<&RecordSet>) -> ChartSeries {
    let points: Vec<(f64, f64)> = selection
        .iter()
        .filter_map(|r| r.load.map(|load| (x_coord(r.timestamp), load)))
        .collect();
    let line = decimate(&points, MAX_LINE_POINTS);
    let peaks: Vec<(f64, f64)> = peaks
        .map(|p| {
            p.iter()
                .filter_map(|r| r.load.map(|load| (x_coord(r.timestamp), load)))
                .collect()
        })
        .unwrap_or_default();

    let (mut x_min, mut x_max) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(x, y) in &points {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }

    if !x_min.is_finite() || !x_max.is_finite() || x_max <= x_min {
        let center = if x_min.is_finite() { x_min } else { 0.0 };
        x_min = center - 0.5;
        x_max = center + 0.5;
    }
    if !y_min.is_finite() || !y_max.is_finite() || y_max <= y_min {
        let center = if y_min.is_finite() { y_min } else { 0.0 };
        y_min = center - 1.0;
        y_max = center + 1.0;
    }

    let pad = ((y_max - y_min).abs() * 0.05).max(1e-12);
    ChartSeries {
        line,
        peaks,
        x_bounds: [x_min, x_max],
        y_bounds: [y_min - pad, y_max + pad],
    }
}

/// Fractional days from the common era, so one unit is one day on the x axis.
fn x_coord(ts: NaiveDateTime) -> f64 {
    let day = f64::from(ts.date().num_days_from_ce());
    day + f64::from(ts.num_seconds_from_midnight()) / 86_400.0
}

/// Keep every k-th point so at most `max` remain (first and last always kept).
fn decimate(points: &[(f64, f64)], max: usize) -> Vec<(f64, f64)> {
    if points.len() <= max || max < 2 {
        return points.to_vec();
    }
    let step = points.len().div_ceil(max - 1);
    let mut out: Vec<(f64, f64)> = points.iter().step_by(step).copied().collect();
    if let (Some(&last), Some(&kept)) = (points.last(), out.last()) {
        if last != kept {
            out.push(last);
        }
    }
    out
}

/// The trailing buckets that fit in `width` columns at `slot` columns each.
fn visible_buckets(buckets: &[AggregationBucket], width: u16, slot: u16) -> &[AggregationBucket] {
    let capacity = (width / slot.max(1)) as usize;
    &buckets[buckets.len().saturating_sub(capacity)..]
}

fn bar_width_for(width: u16, bars: usize) -> u16 {
    if bars == 0 {
        return 1;
    }
    (width as usize / bars).clamp(1, 6) as u16
}

fn fmt_axis_date(v: f64) -> String {
    NaiveDate::from_num_days_from_ce_opt(v.floor() as i32)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn fmt_axis_mw(v: f64) -> String {
    format!("{v:.0}")
}

/// Short bar labels: `1234567` -> `1.23M`.
fn fmt_compact(v: f64) -> String {
    let a = v.abs();
    if a >= 1e9 {
        format!("{:.2}G", v / 1e9)
    } else if a >= 1e6 {
        format!("{:.2}M", v / 1e6)
    } else if a >= 1e3 {
        format!("{:.1}k", v / 1e3)
    } else {
        format!("{v:.0}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Record, TIMESTAMP_FORMAT};

    fn app() -> App {
        let records = crate::data::generate_series(&crate::data::SynthConfig {
            start: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            days: 60,
            ..crate::data::SynthConfig::default()
        })
        .unwrap();
        let (first, last) = records.date_span().unwrap();
        let spec = SourceSpec {
            path: PathBuf::from("synthetic.csv"),
            timestamp_column: "Datetime".to_string(),
            load_column: "PJM_Load_MW".to_string(),
        };
        App::new(spec, Some(records), ViewParams::for_span(first, last), None)
    }

    #[test]
    fn season_toggle_reruns_pipeline() {
        let mut app = app();
        let all = app.view.selection.len();
        app.selected_field = 2; // Winter
        app.handle_key(KeyCode::Enter).unwrap();
        assert!(!app.params.season_selected(Season::Winter));
        assert!(app.view.selection.len() < all);
    }

    #[test]
    fn threshold_edit_and_warning() {
        let mut app = app();
        app.selected_field = 7; // Show peaks
        app.handle_key(KeyCode::Char(' ')).unwrap();
        assert!(app.params.show_peaks);
        assert!(app.view.peaks.is_none());
        assert_eq!(app.status, crate::series::THRESHOLD_WARNING);

        app.selected_field = 6; // Threshold
        app.handle_key(KeyCode::Enter).unwrap();
        for c in "30000".chars() {
            app.handle_key(KeyCode::Char(c)).unwrap();
        }
        app.handle_key(KeyCode::Enter).unwrap();
        assert_eq!(app.params.threshold, 30000.0);
        let peaks = app.view.peaks.as_ref().unwrap();
        assert!(peaks.loads().all(|v| v >= 30000.0));
    }

    #[test]
    fn bad_date_input_keeps_params() {
        let mut app = app();
        let before = app.params.start;
        app.handle_key(KeyCode::Enter).unwrap();
        for c in "2020-13".chars() {
            app.handle_key(KeyCode::Char(c)).unwrap();
        }
        app.handle_key(KeyCode::Enter).unwrap();
        assert_eq!(app.params.start, before);
        assert!(app.status.starts_with("Invalid date"));
    }

    #[test]
    fn inverted_range_is_empty_not_error() {
        let mut app = app();
        app.selected_field = 1; // End
        app.handle_key(KeyCode::Char('[')).unwrap();
        app.handle_key(KeyCode::Char('[')).unwrap();
        app.handle_key(KeyCode::Char('[')).unwrap();
        assert!(app.params.end < app.params.start);
        assert!(app.view.selection.is_empty());
        assert!(app.view.selection_summary.is_none());
    }

    #[test]
    fn absent_source_renders_empty_view() {
        let d = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let spec = SourceSpec {
            path: PathBuf::from("missing.csv"),
            timestamp_column: "Datetime".to_string(),
            load_column: "PJM_Load_MW".to_string(),
        };
        let app = App::new(spec, None, ViewParams::for_span(d, d), Some("Source file not found".to_string()));
        assert!(app.view.selection.is_empty());
        assert_eq!(app.status, "Source file not found");
    }

    #[test]
    fn decimate_bounds_point_count() {
        let points: Vec<(f64, f64)> = (0..10_001).map(|i| (i as f64, 1.0)).collect();
        let out = decimate(&points, 100);
        assert!(out.len() <= 101);
        assert_eq!(out.first(), points.first());
        assert_eq!(out.last(), points.last());
        assert_eq!(decimate(&points[..10], 100).len(), 10);
    }

    #[test]
    fn chart_series_single_point_has_valid_bounds() {
        let ts = NaiveDateTime::parse_from_str("2020-01-01 12:00:00", TIMESTAMP_FORMAT).unwrap();
        let set = RecordSet::new(vec![Record::new(ts, Some(100.0))]);
        let s = chart_series(&set, None);
        assert!(s.x_bounds[1] > s.x_bounds[0]);
        assert!(s.y_bounds[1] > s.y_bounds[0]);
        assert_eq!(fmt_axis_date(x_coord(ts)), "2020-01-01");
    }

    #[test]
    fn visible_buckets_keeps_latest() {
        let d = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let buckets: Vec<_> = (0..10)
            .map(|i| AggregationBucket {
                period: shift_date(d, i),
                total_load: 1.0,
                samples: 1,
            })
            .collect();
        let shown = visible_buckets(&buckets, 36, 12);
        assert_eq!(shown.len(), 3);
        assert_eq!(shown[2].period, buckets[9].period);
    }

    #[test]
    fn compact_labels() {
        assert_eq!(fmt_compact(950.0), "950");
        assert_eq!(fmt_compact(12_300.0), "12.3k");
        assert_eq!(fmt_compact(1_234_567.0), "1.23M");
    }
}
