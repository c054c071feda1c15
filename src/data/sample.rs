//! Synthetic per-trial score generation.
//!
//! Produces a table shaped like a self-play / simulation results log:
//! a `trial` counter, a `test_score` per trial, and a `changed` flag.
//! Scores are `Normal(mean + drift * progress, std_dev)` so a non-zero drift
//! gives a curve with a visible trend for the analysis to find.

use std::fs::File;

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::data::SampleTable;
use crate::domain::SampleConfig;
use crate::error::AppError;

/// Generate a synthetic table in memory.
pub fn generate_trials(config: &SampleConfig) -> Result<SampleTable, AppError> {
    if config.trials == 0 {
        return Err(AppError::new(2, "Trial count must be > 0."));
    }
    if !(config.mean.is_finite() && config.drift.is_finite()) {
        return Err(AppError::new(2, "Mean and drift must be finite."));
    }
    if !(config.std_dev.is_finite() && config.std_dev >= 0.0) {
        return Err(AppError::new(2, "Standard deviation must be finite and >= 0."));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let noise = Normal::new(0.0, config.std_dev)
        .map_err(|e| AppError::new(2, format!("Noise distribution error: {e}")))?;

    let headers = vec!["trial".to_string(), "test_score".to_string(), "changed".to_string()];
    let mut rows = Vec::with_capacity(config.trials);
    let mut prev = f64::NAN;

    for i in 0..config.trials {
        let progress = (i + 1) as f64 / config.trials as f64;
        let score = config.mean + config.drift * progress + noise.sample(&mut rng);
        let changed = (score - prev).abs() > config.std_dev;
        prev = score;
        rows.push(vec![(i + 1).to_string(), format!("{score:.6}"), changed.to_string()]);
    }

    Ok(SampleTable::new(headers, rows))
}

/// Generate trials and write them as CSV to `config.output`.
pub fn write_trials_csv(config: &SampleConfig) -> Result<usize, AppError> {
    let table = generate_trials(config)?;

    let file = File::create(&config.output).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to create sample CSV '{}': {e}", config.output.display()),
        )
    })?;
    let mut writer = csv::Writer::from_writer(file);

    writer
        .write_record(table.headers())
        .map_err(|e| AppError::new(2, format!("Failed to write sample CSV header: {e}")))?;
    for row in table.rows() {
        writer
            .write_record(&row.cells)
            .map_err(|e| AppError::new(2, format!("Failed to write sample CSV row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush sample CSV: {e}")))?;

    Ok(table.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn config(trials: usize, seed: u64) -> SampleConfig {
        SampleConfig {
            output: PathBuf::from("unused.csv"),
            trials,
            mean: 0.5,
            std_dev: 0.1,
            drift: 0.2,
            seed,
        }
    }

    #[test]
    fn same_seed_same_table() {
        let a = generate_trials(&config(50, 7)).unwrap();
        let b = generate_trials(&config(50, 7)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 50);
    }

    #[test]
    fn scores_center_on_mean_plus_half_drift() {
        let table = generate_trials(&config(4000, 1)).unwrap();
        let scores = table.numeric_column("test_score").unwrap();
        let mean = scores.iter().sum::<f64>() / scores.len() as f64;
        assert!((mean - 0.6).abs() < 0.01, "mean={mean}");
    }

    #[test]
    fn zero_trials_rejected() {
        assert!(generate_trials(&config(0, 1)).is_err());
    }
}
