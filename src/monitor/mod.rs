//! Live column monitor.
//!
//! Each refresh re-reads the whole CSV, keeps the optional tail window, and
//! turns every non-index column into a rolling-mean series. Rendering and
//! event handling live behind `MonitorFrontend` so the loop itself is plain
//! data flow:
//!
//! ```text
//! loop {
//!     if stop requested -> break
//!     read CSV -> panels -> render
//!     pause(refresh_every)   // close events set the stop flag here
//! }
//! ```

use std::time::Duration;

use tracing::debug;

use crate::data::SampleTable;
use crate::domain::MonitorConfig;
use crate::error::{AppError, CurveError};
use crate::io::load_table;
use crate::math::{effective_window, rolling_mean};

/// Charts per grid row.
pub const GRID_COLUMNS: usize = 2;

/// One chart: a column title and its (row index, value) points.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub title: String,
    pub points: Vec<(f64, f64)>,
}

/// Set by the frontend when the display is closed; read at the top of each
/// loop iteration.
#[derive(Debug, Default)]
pub struct StopFlag {
    stopped: bool,
}

impl StopFlag {
    /// Close-event callback.
    pub fn on_close(&mut self) {
        self.stopped = true;
    }

    pub fn is_set(&self) -> bool {
        self.stopped
    }
}

/// Display side of the monitor.
pub trait MonitorFrontend {
    /// Draw a fresh set of panels.
    fn render(&mut self, panels: &[Panel]) -> Result<(), AppError>;

    /// Block for up to `timeout`, handling UI events; a close event must call
    /// `stop.on_close()`.
    fn pause(&mut self, timeout: Duration, stop: &mut StopFlag) -> Result<(), AppError>;
}

/// Run the refresh loop until the frontend reports a close event.
///
/// Returns the number of completed refreshes.
pub fn run_monitor<F: MonitorFrontend>(config: &MonitorConfig, frontend: &mut F) -> Result<usize, AppError> {
    let mut stop = StopFlag::default();
    let mut refreshes = 0usize;

    loop {
        if stop.is_set() {
            break;
        }

        let table = load_table(&config.csv_path)?;
        let panels = prepare_panels(&table, config.rows, config.smooth)?;
        debug!(rows = table.len(), panels = panels.len(), "monitor refresh");

        frontend.render(&panels)?;
        refreshes += 1;

        frontend.pause(config.refresh_every, &mut stop)?;
    }

    Ok(refreshes)
}

/// Build one panel per non-index column.
///
/// X values are row positions in the full file, so a tail window keeps its
/// original positions. Non-numeric cells and the rolling-window warm-up are
/// left out of the points.
pub fn prepare_panels(table: &SampleTable, rows: Option<usize>, smooth: usize) -> Result<Vec<Panel>, CurveError> {
    let columns = table.headers().len();
    if columns < 2 {
        return Err(CurveError::TooFewColumns(columns));
    }

    let (view, offset) = match rows {
        Some(n) if n > 0 => (table.tail(n), table.len().saturating_sub(n)),
        _ => (table.clone(), 0),
    };

    let window = effective_window(smooth, view.len());
    let panels = view
        .headers()
        .iter()
        .enumerate()
        .skip(1)
        .map(|(idx, title)| {
            let values = view.numeric_column_lossy(idx);
            let values = if window > 1 { rolling_mean(&values, window) } else { values };
            let points = values
                .into_iter()
                .enumerate()
                .filter(|(_, v)| v.is_finite())
                .map(|(i, v)| ((offset + i) as f64, v))
                .collect();
            Panel {
                title: title.clone(),
                points,
            }
        })
        .collect();

    Ok(panels)
}

/// `(rows, cols)` of the chart grid for `plots` charts.
pub fn grid_shape(plots: usize) -> (usize, usize) {
    (plots.div_ceil(GRID_COLUMNS), GRID_COLUMNS)
}
