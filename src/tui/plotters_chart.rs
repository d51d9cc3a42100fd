//! Plotters-powered line chart widget for Ratatui.
//!
//! Why Plotters instead of Ratatui's built-in `Chart` widget?
//! - nicer axis + mesh rendering
//! - less manual work for ticks/labels
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::plot::ascii::{finite_range, pad_range};

/// A lightweight, render-only chart description.
///
/// All series and bounds are computed outside the render call.
pub struct LinePlottersChart<'a> {
    /// Line series, drawn in x order.
    pub line: &'a [(f64, f64)],
    /// Optional emphasised point (e.g. the current-season prediction).
    pub highlight: Option<(f64, f64)>,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    pub x_label: &'a str,
    pub y_label: &'a str,
    /// Formatting of tick labels.
    pub fmt_x: &'a dyn Fn(f64) -> String,
    pub fmt_y: fn(f64) -> String,
    pub color: RGBColor,
}

impl<'a> Widget for LinePlottersChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a chart.
        // In that case, we render a small hint rather than panicking.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let [x0, x1] = self.x_bounds;
        let [y0, y1] = self.y_bounds;
        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            // Mesh lines are disabled; in a terminal they drown out the series.
            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc(self.x_label)
                .y_desc(self.y_label)
                .x_labels(5)
                .y_labels(5)
                .x_label_formatter(&|v| (self.fmt_x)(*v))
                .y_label_formatter(&|v| (self.fmt_y)(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            chart.draw_series(LineSeries::new(self.line.iter().copied(), &self.color))?;
            chart.draw_series(self.line.iter().map(|&(x, y)| Pixel::new((x, y), WHITE)))?;

            // `Circle` markers are mis-scaled by the ratatui backend, so the
            // highlight is a coloured pixel.
            if let Some((x, y)) = self.highlight {
                let accent = RGBColor(255, 215, 0);
                chart.draw_series(std::iter::once(Pixel::new((x, y), accent)))?;
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}

/// Chart bounds for `points`: x spans the data, y is padded by 5%.
///
/// Uses the same range rules as the ASCII plots.
pub fn chart_bounds(points: &[(f64, f64)]) -> ([f64; 2], [f64; 2]) {
    let (x_min, x_max) = finite_range(points.iter().map(|p| p.0));
    let (y_min, y_max) = finite_range(points.iter().map(|p| p.1));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);
    ([x_min, x_max], [y_min, y_max])
}
