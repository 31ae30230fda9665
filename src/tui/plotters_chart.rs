//! Hourly load chart drawn with Plotters into the ratatui buffer.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// Render-only description of the overview chart; series are prepared by the caller.
pub struct LoadPlottersChart<'a> {
    pub line: &'a [(f64, f64)],
    /// Hours at or above `threshold`.
    pub peaks: &'a [(f64, f64)],
    /// Peak threshold guide (MW), drawn when peaks are shown.
    pub threshold: Option<f64>,
    /// Days from the common era, fractional.
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    pub x_label: &'a str,
    pub y_label: &'a str,
    pub fmt_x: fn(f64) -> String,
    pub fmt_y: fn(f64) -> String,
}

impl Widget for LoadPlottersChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 24 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Enlarge the terminal to see the load chart.",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let [x_lo, x_hi] = self.x_bounds;
        let [y_lo, y_hi] = self.y_bounds;
        let finite = [x_lo, x_hi, y_lo, y_hi].iter().all(|v| v.is_finite());
        if !finite || x_hi <= x_lo || y_hi <= y_lo {
            return;
        }

        let LoadPlottersChart {
            line,
            peaks,
            threshold,
            x_label,
            y_label,
            fmt_x,
            fmt_y,
            ..
        } = self;

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .set_label_area_size(LabelAreaPosition::Left, 9)
                .set_label_area_size(LabelAreaPosition::Bottom, 2)
                .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)?;

            chart
                .configure_mesh()
                .disable_mesh()
                .x_desc(x_label)
                .y_desc(y_label)
                .x_labels(5)
                .y_labels(6)
                .x_label_formatter(&|v| fmt_x(*v))
                .y_label_formatter(&|v| fmt_y(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .draw()?;

            chart.draw_series(LineSeries::new(line.iter().copied(), &CYAN))?;

            if let Some(level) = threshold.filter(|t| *t > y_lo && *t < y_hi) {
                chart.draw_series(LineSeries::new([(x_lo, level), (x_hi, level)], &YELLOW))?;
            }

            // Circle markers are too coarse at terminal resolution.
            chart.draw_series(peaks.iter().map(|&(x, y)| Pixel::new((x, y), RED)))?;

            Ok(())
        });

        widget.render(area, buf);
    }
}
