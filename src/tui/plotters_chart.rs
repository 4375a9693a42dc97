//! Plotters-powered metrics chart widget for Ratatui.
//!
//! The widget draws any [`ChartData`]: line series as connected curves, scatter
//! series as dots, and marker series (the EER) as red dots drawn last.
//!
//! Output goes into the Ratatui buffer through `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::plot::series::{ChartData, SeriesKind};

/// High-contrast series colors, assigned in series order.
pub const PALETTE: [(u8, u8, u8); 6] = [
    (0, 255, 255), // cyan
    (255, 255, 0), // yellow
    (0, 255, 0),   // green
    (255, 0, 255), // magenta
    (100, 149, 237),
    (255, 255, 255),
];

/// Color used for marker series.
pub const MARKER_COLOR: (u8, u8, u8) = (255, 0, 0);

/// RGB color of series `i`.
pub fn series_rgb(i: usize, kind: SeriesKind) -> (u8, u8, u8) {
    match kind {
        SeriesKind::Marker => MARKER_COLOR,
        SeriesKind::Line | SeriesKind::Scatter => PALETTE[i % PALETTE.len()],
    }
}

/// Same color as a Ratatui style color, for legends next to the chart.
pub fn series_color(i: usize, kind: SeriesKind) -> Color {
    let (r, g, b) = series_rgb(i, kind);
    Color::Rgb(r, g, b)
}

/// Render-only chart; bounds are resolved before drawing.
pub struct MetricsChart<'a> {
    pub chart: &'a ChartData,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    /// Formatting of tick labels.
    pub fmt_x: fn(f64) -> String,
    pub fmt_y: fn(f64) -> String,
}

impl<'a> MetricsChart<'a> {
    pub fn new(chart: &'a ChartData) -> Self {
        let ((x0, x1), (y0, y1)) = chart.bounds();
        Self {
            chart,
            x_bounds: [x0, x1],
            y_bounds: [y0, y1],
            fmt_x: fmt_tick,
            fmt_y: fmt_tick,
        }
    }
}

pub fn fmt_tick(v: f64) -> String {
    format!("{v:.2}")
}

impl<'a> Widget for MetricsChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Plotters may fail to lay out a chart in a tiny area.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let x0 = self.x_bounds[0];
        let x1 = self.x_bounds[1];
        let y0 = self.y_bounds[0];
        let y1 = self.y_bounds[1];

        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let chart_data = self.chart;
        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            // Mesh lines are too noisy at terminal resolution.
            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc(chart_data.x_label.as_str())
                .y_desc(chart_data.y_label.as_str())
                .x_labels(5)
                .y_labels(5)
                .x_label_formatter(&|v| (self.fmt_x)(*v))
                .y_label_formatter(&|v| (self.fmt_y)(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            for (i, series) in chart_data.series.iter().enumerate() {
                let (r, g, b) = series_rgb(i, series.kind);
                let color = RGBColor(r, g, b);
                let points = series
                    .points
                    .iter()
                    .copied()
                    .filter(|(x, y)| x.is_finite() && y.is_finite());
                match series.kind {
                    SeriesKind::Line => {
                        chart.draw_series(LineSeries::new(points, &color))?;
                    }
                    SeriesKind::Scatter => {
                        chart.draw_series(points.map(|p| Pixel::new(p, color)))?;
                    }
                    // Drawn in the second pass so it stays on top.
                    SeriesKind::Marker => {}
                }
            }

            // `Circle` radii are mapped wrongly by the backend; a red `Pixel`
            // gives a clean dot that overrides the curves underneath.
            for (i, series) in chart_data.series.iter().enumerate() {
                if series.kind != SeriesKind::Marker {
                    continue;
                }
                let (r, g, b) = series_rgb(i, series.kind);
                let color = RGBColor(r, g, b);
                chart.draw_series(
                    series
                        .points
                        .iter()
                        .copied()
                        .filter(|(x, y)| x.is_finite() && y.is_finite())
                        .map(|p| Pixel::new(p, color)),
                )?;
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markers_are_red_and_palette_cycles() {
        assert_eq!(series_rgb(0, SeriesKind::Marker), MARKER_COLOR);
        assert_eq!(series_rgb(0, SeriesKind::Line), series_rgb(PALETTE.len(), SeriesKind::Scatter));
        assert_eq!(series_color(1, SeriesKind::Line), Color::Rgb(255, 255, 0));
    }
}
