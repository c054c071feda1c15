//! Nonlinear least-squares fit of the objective polynomial.
//!
//! Given:
//! - the progress fractions `x_i`
//! - the cumulative differences `y_i`
//! - a model chain (objective + two coefficient-chain derivatives)
//! - an initial guess
//!
//! we run Levenberg–Marquardt on `sum (objective(x_i, p) - y_i)^2` and then
//! evaluate all three models with the fitted `p` over the progress axis.

use std::time::Instant;

use levenberg_marquardt::{LeastSquaresProblem, LevenbergMarquardt};
use nalgebra::{DMatrix, DVector, Dyn, storage::Owned};
use tracing::{debug, info};

use crate::domain::{CurveSeries, FitResult};
use crate::error::CurveError;
use crate::models::{ModelChain, PolynomialModel};

/// Default solver patience (evaluation budget is `patience * (params + 1)`).
pub const DEFAULT_PATIENCE: usize = 100;

/// Fit `chain.objective` to `curve.diff` over `curve.fraction`.
pub fn fit_curve(
    chain: &ModelChain,
    curve: &CurveSeries,
    initial_guess: &[f64],
    patience: usize,
) -> Result<FitResult, CurveError> {
    let arity = chain.objective.arity();
    if initial_guess.len() != arity {
        return Err(CurveError::ShapeMismatch {
            expected: arity,
            actual: initial_guess.len(),
        });
    }
    if curve.fraction.is_empty() {
        return Err(CurveError::EmptyTable);
    }
    if curve.fraction.len() < arity {
        return Err(CurveError::FitConvergence {
            degree: chain.degree.0,
            initial_guess: initial_guess.to_vec(),
            reason: format!("need at least {arity} rows, got {}", curve.fraction.len()),
        });
    }

    let started = Instant::now();
    let problem = CurveProblem::new(&chain.objective, &curve.fraction, &curve.diff, initial_guess);
    let (problem, report) = LevenbergMarquardt::new()
        .with_patience(patience.max(1))
        .minimize(problem);
    let elapsed = started.elapsed();

    debug!(
        termination = ?report.termination,
        evaluations = report.number_of_evaluations,
        objective = report.objective_function,
        "solver finished"
    );

    let params: Vec<f64> = problem.params.iter().copied().collect();
    if !report.termination.was_successful() || params.iter().any(|p| !p.is_finite()) {
        return Err(CurveError::FitConvergence {
            degree: chain.degree.0,
            initial_guess: initial_guess.to_vec(),
            reason: format!("{:?}", report.termination),
        });
    }

    let fitted = chain.objective.eval_series(&curve.fraction, &params)?;
    let grad1 = chain.grad1.eval_series(&curve.fraction, &params)?;
    let grad2 = chain.grad2.eval_series(&curve.fraction, &params)?;

    let rss = fitted
        .iter()
        .zip(&curve.diff)
        .map(|(f, y)| (f - y) * (f - y))
        .sum::<f64>();

    info!(
        degree = chain.degree.0,
        rss,
        evaluations = report.number_of_evaluations,
        elapsed_ms = elapsed.as_secs_f64() * 1000.0,
        "curve fit converged"
    );

    Ok(FitResult {
        degree: chain.degree,
        params,
        fitted,
        grad1,
        grad2,
        rss,
        evaluations: report.number_of_evaluations,
        elapsed,
    })
}

/// Levenberg–Marquardt problem wrapper for the weighted polynomial.
struct CurveProblem<'a> {
    model: &'a PolynomialModel,
    xs: &'a [f64],
    ys: &'a [f64],
    params: DVector<f64>,
}

impl<'a> CurveProblem<'a> {
    fn new(model: &'a PolynomialModel, xs: &'a [f64], ys: &'a [f64], initial_guess: &[f64]) -> Self {
        Self {
            model,
            xs,
            ys,
            params: DVector::from_column_slice(initial_guess),
        }
    }
}

impl<'a> LeastSquaresProblem<f64, Dyn, Dyn> for CurveProblem<'a> {
    type ResidualStorage = Owned<f64, Dyn>;
    type JacobianStorage = Owned<f64, Dyn, Dyn>;
    type ParameterStorage = Owned<f64, Dyn>;

    fn set_params(&mut self, x: &nalgebra::Vector<f64, Dyn, Self::ParameterStorage>) {
        self.params.copy_from(x);
    }

    fn params(&self) -> nalgebra::Vector<f64, Dyn, Self::ParameterStorage> {
        self.params.clone_owned()
    }

    fn residuals(&self) -> Option<nalgebra::Vector<f64, Dyn, Self::ResidualStorage>> {
        let coefs = self.params.as_slice();
        let mut residuals = DVector::zeros(self.xs.len());
        for (row, (&x, &y)) in self.xs.iter().zip(self.ys).enumerate() {
            residuals[row] = self.model.eval(x, coefs).ok()? - y;
        }
        Some(residuals)
    }

    fn jacobian(&self) -> Option<nalgebra::Matrix<f64, Dyn, Dyn, Self::JacobianStorage>> {
        let rows = self.xs.len();
        let cols = self.params.len();
        let mut jacobian = DMatrix::zeros(rows, cols);
        let mut partials = vec![0.0; cols];
        for (row, &x) in self.xs.iter().enumerate() {
            self.model.coefficient_jacobian(x, &mut partials);
            for (col, &d) in partials.iter().enumerate() {
                jacobian[(row, col)] = d;
            }
        }
        Some(jacobian)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Accumulation, Degree};

    fn curve_from(xs: Vec<f64>, ys: Vec<f64>) -> CurveSeries {
        let rows = xs.len();
        CurveSeries {
            fraction: xs,
            observed: ys.clone(),
            expected: vec![0.0; rows],
            diff: ys,
            rows,
            baseline: 0.0,
            accumulation: Accumulation::RunningMean,
        }
    }

    #[test]
    fn recovers_exact_cubic() {
        let truth = [2.0, -3.0, 0.5, 0.25];
        let chain = ModelChain::with_degree(Degree(3));
        let xs: Vec<f64> = (1..=50).map(|i| i as f64 / 50.0).collect();
        let ys = chain.objective.eval_series(&xs, &truth).unwrap();

        let guess = chain.objective.sample_input(0.1);
        let fit = fit_curve(&chain, &curve_from(xs.clone(), ys), &guess, DEFAULT_PATIENCE).unwrap();

        for (got, want) in fit.params.iter().zip(truth) {
            assert!((got - want).abs() < 1e-6, "got {got} want {want}");
        }
        assert!(fit.rss < 1e-12);

        // Derivative series use the fitted coefficients: 6x^2 - 6x + 0.5 at x = 1.
        let last = fit.grad1.len() - 1;
        assert!((fit.grad1[last] - 0.5).abs() < 1e-6);
        // 12x - 6 at x = 1.
        assert!((fit.grad2[last] - 6.0).abs() < 1e-6);
        assert_eq!(fit.fitted.len(), xs.len());
    }

    #[test]
    fn rejects_wrong_initial_guess_length() {
        let chain = ModelChain::with_degree(Degree(2));
        let curve = curve_from(vec![0.5, 1.0], vec![0.0, 1.0]);
        let err = fit_curve(&chain, &curve, &[0.1, 0.1], DEFAULT_PATIENCE).unwrap_err();
        assert!(matches!(err, CurveError::ShapeMismatch { expected: 3, actual: 2 }));
    }

    #[test]
    fn higher_degree_does_not_fit_worse() {
        let xs: Vec<f64> = (1..=200).map(|i| i as f64 / 200.0).collect();
        let ys: Vec<f64> = xs.iter().map(|x| (6.0 * x).sin() * 0.1).collect();
        let curve = curve_from(xs, ys);

        let low = ModelChain::with_degree(Degree(1));
        let high = ModelChain::with_degree(Degree(5));
        let fit_low = fit_curve(&low, &curve, &low.objective.sample_input(0.1), DEFAULT_PATIENCE).unwrap();
        let fit_high = fit_curve(&high, &curve, &high.objective.sample_input(0.1), DEFAULT_PATIENCE).unwrap();
        assert!(fit_high.rss < fit_low.rss, "{} vs {}", fit_high.rss, fit_low.rss);
    }
}
