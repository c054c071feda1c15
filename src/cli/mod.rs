//! Command-line parsing for the score-curve tools.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! analysis code: handlers in `app` turn these structs into domain configs.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::{Accumulation, DEFAULT_METRIC};
use crate::fit::DEFAULT_PATIENCE;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "scurve", version, about = "Cumulative score-curve analysis and live CSV monitoring")]
pub struct Cli {
    /// Enable debug logging on stderr (`RUST_LOG` takes precedence).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit a polynomial to the cumulative score deviation and report its
    /// steepest point and derivative roots.
    Analyze(AnalyzeArgs),
    /// Plot rolling means of every column of a CSV, re-reading it periodically.
    Monitor(MonitorArgs),
    /// Write a synthetic per-trial score CSV.
    Sample(SampleArgs),
}

/// Options for `scurve analyze`.
#[derive(Debug, Parser, Clone)]
pub struct AnalyzeArgs {
    /// Input CSV (header row required).
    pub filename: PathBuf,

    /// Sort rows by this column before building the curve.
    #[arg(long)]
    pub sort_by: Option<String>,

    /// Column holding the observed metric.
    #[arg(long, default_value = DEFAULT_METRIC)]
    pub metric: String,

    /// Fixed baseline instead of the metric mean.
    #[arg(long = "avg", allow_negative_numbers = true)]
    pub avg: Option<f64>,

    /// Degree of the fitted polynomial.
    #[arg(long, default_value_t = 8)]
    pub degree: usize,

    /// Keep only rows where `column` equals `value` (case-insensitive).
    /// Repeatable; all filters must match.
    #[arg(long = "filter", value_name = "COLUMN=VALUE")]
    pub filters: Vec<String>,

    /// How observed and baseline values are accumulated.
    #[arg(long = "accumulate", value_enum, default_value_t = Accumulation::RunningMean)]
    pub accumulation: Accumulation,

    /// Starting value of every coefficient.
    #[arg(long, default_value_t = 0.1, allow_negative_numbers = true)]
    pub seed_value: f64,

    /// Solver patience (evaluation budget multiplier).
    #[arg(long, default_value_t = DEFAULT_PATIENCE)]
    pub patience: usize,

    /// Disable the terminal plots.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Show the charts in an interactive terminal view (`q` closes).
    #[arg(long, conflicts_with = "json")]
    pub tui: bool,

    /// Print the summary as JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

/// Options for `scurve monitor`.
#[derive(Debug, Parser, Clone)]
pub struct MonitorArgs {
    /// CSV to watch; the first column is the index and is not plotted.
    pub filename: PathBuf,

    /// Only plot the last N rows.
    #[arg(long)]
    pub rows: Option<usize>,

    /// Rolling-average window (capped at half the plotted rows).
    #[arg(long, default_value_t = 10)]
    pub smooth: usize,

    /// Seconds between re-reads of the file.
    #[arg(long, default_value_t = 20.0)]
    pub refresh_every: f64,
}

/// Options for `scurve sample`.
#[derive(Debug, Parser, Clone)]
pub struct SampleArgs {
    /// Output CSV path.
    pub output: PathBuf,

    /// Number of trials (rows).
    #[arg(short = 'n', long, default_value_t = 1000)]
    pub trials: usize,

    /// Score mean at the first trial.
    #[arg(long, default_value_t = 0.5, allow_negative_numbers = true)]
    pub mean: f64,

    /// Per-trial score noise.
    #[arg(long, default_value_t = 0.1)]
    pub std_dev: f64,

    /// Change of the score mean across the run.
    #[arg(long, default_value_t = 0.05, allow_negative_numbers = true)]
    pub drift: f64,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}
