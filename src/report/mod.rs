//! Reporting utilities: run summaries and formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the math/fitting code stays clean and testable
//! - output changes are localized

use serde::Serialize;

use crate::app::pipeline::AnalysisRun;
use crate::domain::{Accumulation, Degree, MaxSlope, RootCrossing};

pub mod format;

pub use format::*;

/// Machine-readable view of a run (the `--json` output).
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisSummary {
    pub rows: usize,
    pub metric: String,
    pub axis: String,
    pub baseline: f64,
    pub accumulation: Accumulation,
    pub degree: Degree,
    pub params: Vec<f64>,
    pub rss: f64,
    pub fit_seconds: f64,
    pub max_slope: MaxSlope,
    pub grad1_roots: Vec<RootCrossing>,
    pub grad2_roots: Vec<RootCrossing>,
}

impl AnalysisSummary {
    pub fn from_run(run: &AnalysisRun, metric: &str) -> Self {
        Self {
            rows: run.curve.rows,
            metric: metric.to_string(),
            axis: run.axis_column.clone(),
            baseline: run.curve.baseline,
            accumulation: run.curve.accumulation,
            degree: run.fit.degree,
            params: run.fit.params.clone(),
            rss: run.fit.rss,
            fit_seconds: run.fit.elapsed.as_secs_f64(),
            max_slope: run.extrema.max_slope.clone(),
            grad1_roots: run.extrema.grad1_roots.clone(),
            grad2_roots: run.extrema.grad2_roots.clone(),
        }
    }
}
