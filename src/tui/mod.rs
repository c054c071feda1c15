//! Ratatui-based terminal UI.
//!
//! Two views share the terminal setup here:
//! - `analysis`: a transient chart of a finished analysis run (`q` closes)
//! - `monitor`: the live rolling-mean chart grid

use std::io;

use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::error::AppError;

pub mod analysis;
pub mod monitor;
mod plotters_chart;

pub use analysis::show_analysis;
pub use monitor::run_monitor_tui;

type CrosstermTerminal = Terminal<CrosstermBackend<io::Stdout>>;

fn open_terminal() -> Result<(TerminalGuard, CrosstermTerminal), AppError> {
    let guard = TerminalGuard::new()?;
    let backend = CrosstermBackend::new(io::stdout());
    let terminal =
        Terminal::new(backend).map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;
    Ok((guard, terminal))
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
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

/// Keys that close a view: `q`, `Esc`, `Ctrl-C`.
fn is_close_key(key: &KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

fn fmt_axis(v: f64) -> String {
    format!("{v:.1}")
}

fn fmt_axis_fine(v: f64) -> String {
    format!("{v:.3}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_keys() {
        let q = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        let c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE);
        assert!(is_close_key(&q));
        assert!(is_close_key(&ctrl_c));
        assert!(!is_close_key(&c));
    }
}
