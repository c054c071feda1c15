//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and sets up logging
//! - resolves flags into domain configs
//! - runs the analysis / monitor / sample commands
//! - prints reports and plots

use std::time::Duration;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{AnalyzeArgs, Command, MonitorArgs, SampleArgs};
use crate::domain::{AnalysisConfig, Degree, MonitorConfig, RowFilter, SampleConfig};
use crate::error::AppError;
use crate::report::AnalysisSummary;

pub mod pipeline;

/// Entry point for the `scurve` binary.
pub fn run() -> Result<(), AppError> {
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);
    init_logging(cli.verbose);

    match cli.command {
        Command::Analyze(args) => handle_analyze(args),
        Command::Monitor(args) => handle_monitor(args),
        Command::Sample(args) => handle_sample(args),
    }
}

/// Rewrite argv so a bare CSV path means `analyze`.
///
/// Rules:
/// - `scurve runs.csv ...`          -> `scurve analyze runs.csv ...`
/// - `scurve`, flags, subcommands   -> unchanged
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1) else {
        return argv;
    };

    let is_subcommand = matches!(arg1.as_str(), "analyze" | "monitor" | "sample" | "help");
    if is_subcommand || arg1.starts_with('-') {
        return argv;
    }

    argv.insert(1, "analyze".to_string());
    argv
}

/// Logs go to stderr so stdout stays the report. `RUST_LOG` wins over `-v`.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn handle_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let config = analysis_config_from_args(&args)?;
    let run = pipeline::run_analysis(&config)?;
    let summary = AnalysisSummary::from_run(&run, &config.metric);

    if args.json {
        let json = serde_json::to_string_pretty(&summary)
            .map_err(|e| AppError::new(4, format!("Failed to serialize summary: {e}")))?;
        println!("{json}");
        return Ok(());
    }

    println!(
        "{}",
        crate::report::format_run_summary(&summary, config.baseline.is_some())
    );

    if args.tui {
        return crate::tui::show_analysis(&run);
    }

    if !args.no_plot {
        println!(
            "{}",
            crate::plot::render_analysis_plots(&run, args.width, args.height)
        );
    }

    Ok(())
}

fn handle_monitor(args: MonitorArgs) -> Result<(), AppError> {
    let config = monitor_config_from_args(&args)?;
    let refreshes = crate::tui::run_monitor_tui(&config)?;
    info!(refreshes, "monitor closed");
    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let config = sample_config_from_args(&args);
    let rows = crate::data::write_trials_csv(&config)?;
    println!("Wrote {rows} trials to {}", config.output.display());
    Ok(())
}

pub fn analysis_config_from_args(args: &AnalyzeArgs) -> Result<AnalysisConfig, AppError> {
    if let Some(avg) = args.avg.filter(|v| !v.is_finite()) {
        return Err(AppError::new(2, format!("--avg must be finite, got {avg}")));
    }
    if !args.seed_value.is_finite() {
        return Err(AppError::new(2, "--seed-value must be finite."));
    }
    if args.patience == 0 {
        return Err(AppError::new(2, "--patience must be > 0."));
    }

    let filters = args
        .filters
        .iter()
        .map(|spec| RowFilter::parse(spec))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(AnalysisConfig {
        csv_path: args.filename.clone(),
        sort_by: args.sort_by.clone(),
        metric: args.metric.clone(),
        baseline: args.avg,
        degree: Degree(args.degree),
        accumulation: args.accumulation,
        filters,
        seed_value: args.seed_value,
        patience: args.patience,
    })
}

pub fn monitor_config_from_args(args: &MonitorArgs) -> Result<MonitorConfig, AppError> {
    let refresh_every = Duration::try_from_secs_f64(args.refresh_every)
        .ok()
        .filter(|d| !d.is_zero())
        .ok_or_else(|| {
            AppError::new(
                2,
                format!("--refresh-every must be a positive number of seconds, got {}", args.refresh_every),
            )
        })?;

    Ok(MonitorConfig {
        csv_path: args.filename.clone(),
        rows: args.rows,
        smooth: args.smooth,
        refresh_every,
    })
}

pub fn sample_config_from_args(args: &SampleArgs) -> SampleConfig {
    SampleConfig {
        output: args.output.clone(),
        trials: args.trials,
        mean: args.mean,
        std_dev: args.std_dev,
        drift: args.drift,
        seed: args.seed,
    }
}
