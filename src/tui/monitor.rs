//! Live monitor view: a two-column grid of rolling-mean charts.

use std::io;
use std::time::{Duration, Instant};

use chrono::Local;
use crossterm::event::{self, Event};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::plotters_chart::{ChartLine, LinePlottersChart, PALETTE, chart_bounds};
use super::{TerminalGuard, fmt_axis, fmt_axis_fine, is_close_key, open_terminal};
use crate::domain::MonitorConfig;
use crate::error::AppError;
use crate::monitor::{MonitorFrontend, Panel, StopFlag, grid_shape, run_monitor};

/// Open the terminal and run the monitor loop until `q`/`Esc`/`Ctrl-C`.
pub fn run_monitor_tui(config: &MonitorConfig) -> Result<usize, AppError> {
    let (guard, terminal) = open_terminal()?;
    let mut frontend = MonitorTui {
        _guard: guard,
        terminal,
        panels: Vec::new(),
        source: config.csv_path.display().to_string(),
        last_refresh: String::new(),
    };
    run_monitor(config, &mut frontend)
}

struct MonitorTui {
    _guard: TerminalGuard,
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    panels: Vec<Panel>,
    source: String,
    last_refresh: String,
}

impl MonitorFrontend for MonitorTui {
    fn render(&mut self, panels: &[Panel]) -> Result<(), AppError> {
        self.panels = panels.to_vec();
        self.last_refresh = Local::now().format("%H:%M:%S").to_string();
        self.draw()
    }

    fn pause(&mut self, timeout: Duration, stop: &mut StopFlag) -> Result<(), AppError> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Ok(());
            }

            let ready = event::poll(remaining.min(Duration::from_millis(250)))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))?;
            if !ready {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) if is_close_key(&key) => {
                    stop.on_close();
                    return Ok(());
                }
                Event::Resize(_, _) => self.draw()?,
                _ => {}
            }
        }
    }
}

impl MonitorTui {
    fn draw(&mut self) -> Result<(), AppError> {
        let panels = &self.panels;
        let footer = format!(
            "{} | last refresh {} | q to close",
            self.source, self.last_refresh
        );

        self.terminal
            .draw(|frame| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(0), Constraint::Length(1)])
                    .split(frame.area());

                draw_grid(frame, chunks[0], panels);
                frame.render_widget(
                    Paragraph::new(footer.as_str()).style(Style::default().fg(Color::Gray)),
                    chunks[1],
                );
            })
            .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
        Ok(())
    }
}

fn draw_grid(frame: &mut ratatui::Frame<'_>, area: Rect, panels: &[Panel]) {
    if panels.is_empty() {
        frame.render_widget(
            Paragraph::new("No columns to plot.").style(Style::default().fg(Color::Yellow)),
            area,
        );
        return;
    }

    let (rows, cols) = grid_shape(panels.len());
    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Ratio(1, rows as u32); rows])
        .split(area);

    for (r, row_area) in row_areas.iter().enumerate() {
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, cols as u32); cols])
            .split(*row_area);

        for (c, cell) in cells.iter().enumerate() {
            // Unused trailing cells stay blank.
            if let Some(panel) = panels.get(r * cols + c) {
                draw_panel(frame, *cell, panel, (r * cols + c) % PALETTE.len());
            }
        }
    }
}

fn draw_panel(frame: &mut ratatui::Frame<'_>, area: Rect, panel: &Panel, color: usize) {
    let block = Block::default().title(panel.title.clone()).borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(Clear, inner);

    let Some((x_bounds, y_bounds)) = chart_bounds([panel.points.as_slice()]) else {
        frame.render_widget(
            Paragraph::new("No numeric data.").style(Style::default().fg(Color::Yellow)),
            inner,
        );
        return;
    };

    let lines = [ChartLine {
        points: &panel.points,
        color: PALETTE[color],
    }];
    let widget = LinePlottersChart {
        lines: &lines,
        x_bounds,
        y_bounds,
        x_label: "row",
        y_label: "",
        fmt_x: fmt_axis,
        fmt_y: fmt_axis_fine,
    };
    frame.render_widget(widget, inner);
}
