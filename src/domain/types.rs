//! Shared domain types.
//!
//! These types are intentionally kept lightweight so they can be:
//!
//! - passed between pipeline stages without mutation
//! - rendered by the text, ASCII and TUI front-ends
//! - serialized for the `--json` summary

use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Default metric / axis column.
pub const DEFAULT_METRIC: &str = "test_score";

/// Degree of the objective polynomial.
///
/// The number of free coefficients of every model in a chain is
/// `degree + 1`; carrying it explicitly keeps coefficient vectors checkable
/// at each boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Degree(pub usize);

impl Degree {
    /// Number of free coefficients a model of this degree takes.
    pub fn coefficient_count(self) -> usize {
        self.0 + 1
    }
}

impl std::fmt::Display for Degree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How the cumulative observed / baseline columns are accumulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Accumulation {
    /// Running mean: `sum(v[..=i]) / (i + 1)`.
    #[default]
    RunningMean,
    /// Running sum scaled by the row count: `sum(v[..=i]) / N`.
    ///
    /// With the baseline at the metric mean this traces a cumulative-deviation
    /// curve that returns to zero at the last row.
    ScaledSum,
}

/// A `column=value` row filter (case-insensitive match on the trimmed cell).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowFilter {
    pub column: String,
    pub value: String,
}

/// A full `analyze` run's configuration as understood by the pipeline.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub csv_path: PathBuf,
    /// Column used to sort rows; `None` keeps file order.
    pub sort_by: Option<String>,
    pub metric: String,
    /// Fixed baseline; `None` means the metric mean.
    pub baseline: Option<f64>,
    pub degree: Degree,
    pub accumulation: Accumulation,
    pub filters: Vec<RowFilter>,
    /// Value every initial coefficient starts from.
    pub seed_value: f64,
    /// Solver patience (evaluation budget multiplier).
    pub patience: usize,
}

impl AnalysisConfig {
    /// Column whose values label report positions.
    ///
    /// This is the sort column when sorting was requested, else the default
    /// metric name.
    pub fn axis_column(&self) -> &str {
        self.sort_by.as_deref().unwrap_or(DEFAULT_METRIC)
    }
}

/// Configuration for the live monitor.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub csv_path: PathBuf,
    /// Keep only the last `rows` rows.
    pub rows: Option<usize>,
    /// Rolling-average window.
    pub smooth: usize,
    pub refresh_every: Duration,
}

/// Configuration for synthetic trial generation.
#[derive(Debug, Clone)]
pub struct SampleConfig {
    pub output: PathBuf,
    pub trials: usize,
    pub mean: f64,
    pub std_dev: f64,
    /// Total change of the score mean from the first to the last trial.
    pub drift: f64,
    pub seed: u64,
}

/// Cumulative statistics derived from the (sorted) sample table.
///
/// All series are indexed by row: entry `i` describes rows `0..=i`.
#[derive(Debug, Clone, Serialize)]
pub struct CurveSeries {
    /// `(i + 1) / N`.
    pub fraction: Vec<f64>,
    pub observed: Vec<f64>,
    pub expected: Vec<f64>,
    /// `observed - expected`.
    pub diff: Vec<f64>,
    pub rows: usize,
    pub baseline: f64,
    pub accumulation: Accumulation,
}

/// Output of the curve fit.
#[derive(Debug, Clone, Serialize)]
pub struct FitResult {
    pub degree: Degree,
    pub params: Vec<f64>,
    pub fitted: Vec<f64>,
    pub grad1: Vec<f64>,
    pub grad2: Vec<f64>,
    /// Residual sum of squares against the fitted series.
    pub rss: f64,
    pub evaluations: usize,
    #[serde(serialize_with = "serialize_secs")]
    pub elapsed: Duration,
}

fn serialize_secs<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64())
}

/// Row where the fitted first derivative peaks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaxSlope {
    pub index: usize,
    pub fraction: f64,
    pub axis_value: String,
    pub slope: f64,
}

/// A sign change between row `index` and row `index + 1`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RootCrossing {
    pub index: usize,
    pub fraction: f64,
    pub axis_value: String,
    /// First-derivative value at the crossing (second-derivative roots only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slope: Option<f64>,
}

/// Extrema of a fitted curve.
#[derive(Debug, Clone, Serialize)]
pub struct Extrema {
    pub max_slope: MaxSlope,
    pub grad1_roots: Vec<RootCrossing>,
    pub grad2_roots: Vec<RootCrossing>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_defaults_to_metric_name() {
        let mut config = AnalysisConfig {
            csv_path: PathBuf::from("runs.csv"),
            sort_by: None,
            metric: "elo".to_string(),
            baseline: None,
            degree: Degree(8),
            accumulation: Accumulation::RunningMean,
            filters: Vec::new(),
            seed_value: 0.1,
            patience: 100,
        };
        assert_eq!(config.axis_column(), DEFAULT_METRIC);

        config.sort_by = Some("nodes".to_string());
        assert_eq!(config.axis_column(), "nodes");
    }

    #[test]
    fn degree_counts_coefficients() {
        assert_eq!(Degree(0).coefficient_count(), 1);
        assert_eq!(Degree(8).coefficient_count(), 9);
    }
}
