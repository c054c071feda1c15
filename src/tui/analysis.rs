//! Transient chart view of a finished analysis run.

use std::time::Duration;

use crossterm::event::{self, Event};
use ratatui::{
    Terminal,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::plotters_chart::{ChartLine, LinePlottersChart, PALETTE, chart_bounds};
use super::{fmt_axis, fmt_axis_fine, is_close_key, open_terminal};
use crate::app::pipeline::AnalysisRun;
use crate::error::AppError;
use crate::report::format_crossing;

/// Chart data in percent units (progress % on x, value × 100 on y).
struct AnalysisSeries {
    diff: Vec<(f64, f64)>,
    fitted: Vec<(f64, f64)>,
    grad1: Vec<(f64, f64)>,
}

impl AnalysisSeries {
    fn from_run(run: &AnalysisRun) -> Self {
        let pct = |ys: &[f64]| -> Vec<(f64, f64)> {
            run.curve
                .fraction
                .iter()
                .zip(ys)
                .map(|(&x, &y)| (x * 100.0, y * 100.0))
                .collect()
        };
        Self {
            diff: pct(&run.curve.diff),
            fitted: pct(&run.fit.fitted),
            grad1: pct(&run.fit.grad1),
        }
    }
}

/// Show the analysis charts until a close key is pressed.
pub fn show_analysis(run: &AnalysisRun) -> Result<(), AppError> {
    let (_guard, mut terminal) = open_terminal()?;
    let series = AnalysisSeries::from_run(run);

    let mut needs_redraw = true;
    loop {
        if needs_redraw {
            draw(&mut terminal, run, &series)?;
            needs_redraw = false;
        }

        if !event::poll(Duration::from_millis(100)).map_err(|e| AppError::new(4, format!("Event poll error: {e}")))? {
            continue;
        }

        match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
            Event::Key(key) if is_close_key(&key) => break,
            Event::Resize(_, _) => needs_redraw = true,
            _ => {}
        }
    }
    Ok(())
}

fn draw<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    run: &AnalysisRun,
    series: &AnalysisSeries,
) -> Result<(), AppError> {
    terminal
        .draw(|frame| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(5),
                    Constraint::Percentage(55),
                    Constraint::Min(0),
                ])
                .split(frame.area());

            draw_header(frame, chunks[0], run);

            let curve_lines = [
                ChartLine {
                    points: &series.diff,
                    color: PALETTE[0],
                },
                ChartLine {
                    points: &series.fitted,
                    color: PALETTE[1],
                },
            ];
            draw_chart(frame, chunks[1], "test_sum_diff (white) vs fitted (cyan)", &curve_lines);

            let slope_lines = [ChartLine {
                points: &series.grad1,
                color: PALETTE[2],
            }];
            draw_chart(frame, chunks[2], "fitted_grad1", &slope_lines);
        })
        .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
    Ok(())
}

fn draw_header(frame: &mut ratatui::Frame<'_>, area: Rect, run: &AnalysisRun) {
    let max = &run.extrema.max_slope;
    let inflections: Vec<String> = run.extrema.grad2_roots.iter().map(format_crossing).collect();

    let lines = vec![
        Line::from(vec![
            Span::styled("scurve", Style::default().fg(Color::Cyan)),
            Span::raw(format!(
                " | rows={} | baseline={:.6} | degree={} | fit {:.3}s",
                run.curve.rows,
                run.curve.baseline,
                run.fit.degree,
                run.fit.elapsed.as_secs_f64()
            )),
        ]),
        Line::from(Span::styled(
            format!("max slope at {} = {} ({:.3}%)", run.axis_column, max.axis_value, max.fraction * 100.0),
            Style::default().fg(Color::Gray),
        )),
        Line::from(Span::styled(
            format!("inflections: {}   (q to close)", inflections.join(", ")),
            Style::default().fg(Color::Gray),
        )),
    ];

    let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(p, area);
}

fn draw_chart(frame: &mut ratatui::Frame<'_>, area: Rect, title: &str, lines: &[ChartLine<'_>]) {
    let block = Block::default().title(title.to_string()).borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(Clear, inner);

    let Some((x_bounds, y_bounds)) = chart_bounds(lines.iter().map(|l| l.points)) else {
        let msg = Paragraph::new("No data.").style(Style::default().fg(Color::Yellow));
        frame.render_widget(msg, inner);
        return;
    };

    let widget = LinePlottersChart {
        lines,
        x_bounds,
        y_bounds,
        x_label: "progress (%)",
        y_label: "x100",
        fmt_x: fmt_axis,
        fmt_y: fmt_axis_fine,
    };
    frame.render_widget(widget, inner);
}
