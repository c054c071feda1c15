//! ASCII/Unicode plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Each series is drawn as a connected line with its own glyph. Where series
//! overlap, the first one listed is the one left visible.

use crate::app::pipeline::AnalysisRun;

/// One line series in a plot.
#[derive(Debug, Clone)]
pub struct PlotSeries {
    pub label: String,
    pub glyph: char,
    pub points: Vec<(f64, f64)>,
}

/// Render the two analysis charts: curve vs fit, and fitted first derivative.
///
/// Values are shown in percent (×100), as are the progress fractions.
pub fn render_analysis_plots(run: &AnalysisRun, width: usize, height: usize) -> String {
    let pct = |ys: &[f64]| -> Vec<(f64, f64)> {
        run.curve
            .fraction
            .iter()
            .zip(ys)
            .map(|(&x, &y)| (x * 100.0, y * 100.0))
            .collect()
    };

    let curve = [
        PlotSeries {
            label: "test_sum_diff".to_string(),
            glyph: 'o',
            points: pct(&run.curve.diff),
        },
        PlotSeries {
            label: "fitted".to_string(),
            glyph: '-',
            points: pct(&run.fit.fitted),
        },
    ];
    let slope = [PlotSeries {
        label: "fitted_grad1".to_string(),
        glyph: '*',
        points: pct(&run.fit.grad1),
    }];

    let mut out = render_plot(&curve, width, height);
    out.push('\n');
    out.push_str(&render_plot(&slope, width, height));
    out
}

/// Render series on a shared fixed-size grid.
pub fn render_plot(series: &[PlotSeries], width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let (x_min, x_max) = range(series.iter().flat_map(|s| s.points.iter().map(|p| p.0))).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = range(series.iter().flat_map(|s| s.points.iter().map(|p| p.1))).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Draw the last series first so the first one (usually observed data)
    // wins on overlap.
    for s in series.iter().rev() {
        draw_series(&mut grid, s, x_min, x_max, y_min, y_max);
    }

    let legend: Vec<String> = series.iter().map(|s| format!("{} {}", s.glyph, s.label)).collect();

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: x=[{x_min:.3}, {x_max:.3}] | y=[{y_min:.3}, {y_max:.3}] | {}\n",
        legend.join(", ")
    ));

    for row in grid {
        out.push_str(row.into_iter().collect::<String>().trim_end());
        out.push('\n');
    }

    out
}

fn range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values.filter(|v| v.is_finite()) {
        min = min.min(v);
        max = max.max(v);
    }
    if min.is_finite() && max.is_finite() && max > min {
        Some((min, max))
    } else if min.is_finite() {
        Some((min - 0.5, max + 0.5))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
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

fn draw_series(grid: &mut [Vec<char>], series: &PlotSeries, x_min: f64, x_max: f64, y_min: f64, y_max: f64) {
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(x, y) in series.points.iter().filter(|p| p.0.is_finite() && p.1.is_finite()) {
        let gx = map_x(x, x_min, x_max, width);
        let gy = map_y(y, y_min, y_max, height);
        match prev {
            Some((x0, y0)) => draw_line(grid, x0, y0, gx, gy, series.glyph),
            None => grid[gy][gx] = series.glyph,
        }
        prev = Some((gx, gy));
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
        if y0 >= 0 && (y0 as usize) < grid.len() && x0 >= 0 && (x0 as usize) < grid[0].len() {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plot_golden_snapshot_small() {
        let series = [
            PlotSeries {
                label: "obs".to_string(),
                glyph: 'o',
                points: vec![(0.0, 0.0), (9.0, 10.0)],
            },
            PlotSeries {
                label: "flat".to_string(),
                glyph: '-',
                points: vec![(0.0, 0.0), (9.0, 0.0)],
            },
        ];

        let txt = render_plot(&series, 10, 5);
        let expected = concat!(
            "Plot: x=[0.000, 9.000] | y=[-0.500, 10.500] | o obs, - flat\n",
            "        oo\n",
            "      oo\n",
            "    oo\n",
            "  oo\n",
            "oo--------\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn empty_series_renders_blank_grid() {
        let txt = render_plot(&[], 10, 5);
        assert_eq!(txt.lines().count(), 6);
    }
}
