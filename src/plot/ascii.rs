//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements, assigned per series in order:
//! - lines: `-`, `=`, `~`, `:`, `.`
//! - sample markers: `o`, `x`, `+`, `#`, `@`, `%`, `&`, `$`
//! - highlighted points (EER): `*`

use crate::plot::series::{ChartData, SeriesKind};

const LINE_GLYPHS: [char; 5] = ['-', '=', '~', ':', '.'];
const MARKER_GLYPHS: [char; 8] = ['o', 'x', '+', '#', '@', '%', '&', '$'];
const HIGHLIGHT_GLYPH: char = '*';

fn line_glyph(i: usize) -> char {
    LINE_GLYPHS[i % LINE_GLYPHS.len()]
}

fn marker_glyph(i: usize, kind: SeriesKind) -> char {
    match kind {
        SeriesKind::Marker => HIGHLIGHT_GLYPH,
        SeriesKind::Line | SeriesKind::Scatter => MARKER_GLYPHS[i % MARKER_GLYPHS.len()],
    }
}

/// Render one chart into a `width` x `height` character grid with a header
/// line and a legend line.
pub fn render_ascii_plot(chart: &ChartData, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let ((x_min, x_max), (y_min, y_max)) = chart.bounds();

    let mut grid = vec![vec![' '; width]; height];

    // Draw lines first (so markers can overlay).
    for (i, series) in chart.series.iter().enumerate() {
        if series.kind == SeriesKind::Line {
            draw_curve(&mut grid, &series.points, (x_min, x_max), (y_min, y_max), line_glyph(i));
        }
    }
    for (i, series) in chart.series.iter().enumerate() {
        let ch = marker_glyph(i, series.kind);
        for &(x, y) in &series.points {
            if !(x.is_finite() && y.is_finite()) {
                continue;
            }
            let col = map_x(x, x_min, x_max, width);
            let row = map_y(y, y_min, y_max, height);
            grid[row][col] = ch;
        }
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: {} | {}=[{x_min:.3}, {x_max:.3}] | {}=[{y_min:.3}, {y_max:.3}]\n",
        chart.title, chart.x_label, chart.y_label
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    let legend: Vec<String> = chart
        .series
        .iter()
        .enumerate()
        .map(|(i, s)| match s.kind {
            SeriesKind::Line => format!("{}{} {}", marker_glyph(i, s.kind), line_glyph(i), s.label),
            SeriesKind::Scatter | SeriesKind::Marker => format!("{} {}", marker_glyph(i, s.kind), s.label),
        })
        .collect();
    out.push_str(&format!("Legend: {}\n", legend.join(", ")));

    out
}

/// Render several charts one after another, separated by a blank line.
pub fn render_ascii_plots(charts: &[ChartData], width: usize, height: usize) -> String {
    charts
        .iter()
        .map(|c| render_ascii_plot(c, width, height))
        .collect::<Vec<_>>()
        .join("\n")
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_curve(grid: &mut [Vec<char>], curve: &[(f64, f64)], x_range: (f64, f64), y_range: (f64, f64), ch: char) {
    if curve.len() < 2 {
        return;
    }
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(x, y) in curve {
        if !(x.is_finite() && y.is_finite()) {
            prev = None;
            continue;
        }
        let col = map_x(x, x_range.0, x_range.1, width);
        let row = map_y(y, y_range.0, y_range.1, height);
        if let Some((c0, r0)) = prev {
            draw_line(grid, c0, r0, col, row, ch);
        } else if grid[row][col] == ' ' {
            grid[row][col] = ch;
        }
        prev = Some((col, row));
    }
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
