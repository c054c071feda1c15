//! Cumulative-deviation curve construction.
//!
//! Given a (sorted) sample table and a metric column, builds the series the
//! fitter works on:
//!
//! - `fraction[i] = (i + 1) / N` (progress through the trials)
//! - cumulative observed metric
//! - cumulative baseline (the baseline is a single scalar for the whole table)
//! - their difference
//!
//! Row order is taken as given; sorting happens before this stage.

use tracing::debug;

use crate::data::SampleTable;
use crate::domain::{Accumulation, CurveSeries};
use crate::error::CurveError;

/// Build the curve series for `metric`.
///
/// `baseline = None` resolves to the mean of the metric over all rows.
pub fn build_curve(
    table: &SampleTable,
    metric: &str,
    baseline: Option<f64>,
    accumulation: Accumulation,
) -> Result<CurveSeries, CurveError> {
    let values = table.numeric_column(metric)?;
    if values.is_empty() {
        return Err(CurveError::EmptyTable);
    }

    let n = values.len();
    let baseline = baseline.unwrap_or_else(|| values.iter().sum::<f64>() / n as f64);

    let fraction: Vec<f64> = (1..=n).map(|k| k as f64 / n as f64).collect();
    let observed = accumulate(&values, accumulation);
    let expected = accumulate(&vec![baseline; n], accumulation);
    let diff = observed
        .iter()
        .zip(&expected)
        .map(|(o, e)| o - e)
        .collect();

    debug!(rows = n, baseline, ?accumulation, "built cumulative curve");

    Ok(CurveSeries {
        fraction,
        observed,
        expected,
        diff,
        rows: n,
        baseline,
        accumulation,
    })
}

fn accumulate(values: &[f64], mode: Accumulation) -> Vec<f64> {
    let n = values.len() as f64;
    let mut sum = 0.0;
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            sum += v;
            match mode {
                Accumulation::RunningMean => sum / (i + 1) as f64,
                Accumulation::ScaledSum => sum / n,
            }
        })
        .collect()
}
