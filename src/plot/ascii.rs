//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual checks in a terminal or a CI log
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - sample points: `o`
//! - connecting line: `-`
//! - current-season prediction: `*`

use crate::estimator::{SensitivityCurve, YieldSeries};

/// Render the yield trend; the last point (the prediction) is drawn as `*`.
pub fn render_series_plot(series: &YieldSeries, width: usize, height: usize) -> String {
    let points = series.xy();
    let first = series.points().first().map(|p| p.label.as_str()).unwrap_or("-");
    let last = series.current().map(|p| p.label.as_str()).unwrap_or("-");
    render_plot(&points, true, width, height, |y_min, y_max| {
        format!("Plot: seasons=[{first}, {last}] | yield=[{y_min:.2}, {y_max:.2}] q/acre\n")
    })
}

/// Render the sensitivity curve.
pub fn render_curve_plot(curve: &SensitivityCurve, width: usize, height: usize) -> String {
    let points = curve.xy();
    let (x_min, x_max) = x_range(&points);
    render_plot(&points, false, width, height, |y_min, y_max| {
        format!(
            "Plot: improvement=[{x_min:.1}, {x_max:.1}]% | yield=[{y_min:.2}, {y_max:.2}] q/acre\n"
        )
    })
}

fn render_plot(
    points: &[(f64, f64)],
    mark_last: bool,
    width: usize,
    height: usize,
    header: impl Fn(f64, f64) -> String,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let (x_min, x_max) = x_range(points);
    let (y_min, y_max) = y_range(points);
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Draw the line first (so points can overlay).
    draw_curve(&mut grid, points, x_min, x_max, y_min, y_max);

    let last = points.len().saturating_sub(1);
    for (i, &(x, y)) in points.iter().enumerate() {
        let col = map_x(x, x_min, x_max, width);
        let row = map_y(y, y_min, y_max, height);
        grid[row][col] = if mark_last && i == last { '*' } else { 'o' };
    }

    let mut out = header(y_min, y_max);
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    out
}

/// Range of finite values; degenerate ranges are widened by one unit each side.
pub(crate) fn finite_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values.filter(|v| v.is_finite()) {
        min = min.min(v);
        max = max.max(v);
    }
    if !(min.is_finite() && max.is_finite()) {
        return (0.0, 1.0);
    }
    if max <= min {
        return (min - 1.0, max + 1.0);
    }
    (min, max)
}

fn x_range(points: &[(f64, f64)]) -> (f64, f64) {
    finite_range(points.iter().map(|p| p.0))
}

fn y_range(points: &[(f64, f64)]) -> (f64, f64) {
    finite_range(points.iter().map(|p| p.1))
}

/// Widen `[min, max]` by `frac` of its span on both sides.
pub(crate) fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
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

fn draw_curve(grid: &mut [Vec<char>], points: &[(f64, f64)], x_min: f64, x_max: f64, y_min: f64, y_max: f64) {
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(x, y) in points {
        let col = map_x(x, x_min, x_max, width);
        let row = map_y(y, y_min, y_max, height);
        if let Some((c0, r0)) = prev {
            draw_line(grid, c0, r0, col, row, '-');
        } else {
            grid[row][col] = '-';
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
