//! Shared analysis pipeline used by both the text and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! load -> filter -> sort -> build curve -> fit -> extrema
//!
//! The front-ends can then focus on presentation (printing vs widgets).

use tracing::info;

use crate::data::SampleTable;
use crate::domain::{AnalysisConfig, CurveSeries, Extrema, FitResult};
use crate::error::CurveError;
use crate::fit::{analyze_extrema, build_curve, fit_curve};
use crate::io::load_table;
use crate::models::ModelChain;

/// All computed outputs of a single `scurve analyze` run.
#[derive(Debug, Clone)]
pub struct AnalysisRun {
    /// Table after filtering and sorting (row order of every series below).
    pub table: SampleTable,
    /// Name of the axis column and its value per row.
    pub axis_column: String,
    pub axis_values: Vec<String>,
    pub chain: ModelChain,
    pub curve: CurveSeries,
    pub fit: FitResult,
    pub extrema: Extrema,
}

/// Load the CSV named by the config and run the analysis.
pub fn run_analysis(config: &AnalysisConfig) -> Result<AnalysisRun, CurveError> {
    let table = load_table(&config.csv_path)?;
    info!(rows = table.len(), path = %config.csv_path.display(), "loaded CSV");
    analyze_table(table, config)
}

/// Run the analysis on an already loaded table.
pub fn analyze_table(table: SampleTable, config: &AnalysisConfig) -> Result<AnalysisRun, CurveError> {
    // 1) Optional row filters.
    let table = if config.filters.is_empty() {
        table
    } else {
        let filtered = table.filtered(&config.filters)?;
        info!(kept = filtered.len(), of = table.len(), "applied row filters");
        filtered
    };

    // 2) Sort; row order is fixed from here on.
    let table = match &config.sort_by {
        Some(column) => table.sorted_by(column)?,
        None => table,
    };

    // 3) Cumulative curve (validates the metric column first).
    let curve = build_curve(&table, &config.metric, config.baseline, config.accumulation)?;

    let axis_column = config.axis_column().to_string();
    let axis_values = table.text_column(&axis_column)?;

    // 4) Fit the objective and evaluate its derivative chain.
    let chain = ModelChain::with_degree(config.degree);
    let initial_guess = chain.objective.sample_input(config.seed_value);
    let fit = fit_curve(&chain, &curve, &initial_guess, config.patience)?;

    // 5) Extrema and zero crossings.
    let extrema = analyze_extrema(&curve, &fit, &axis_values)?;

    Ok(AnalysisRun {
        table,
        axis_column,
        axis_values,
        chain,
        curve,
        fit,
        extrema,
    })
}
