//! Weighted polynomial model.
//!
//! A `PolynomialModel` does not store fitted coefficients. It stores a fixed
//! weight per coefficient and evaluates
//!
//! ```text
//! out = 0
//! for (c_i, w_i) in zip(coefs, weights):
//!     out = out * x + c_i * w_i
//! ```
//!
//! so the objective (all weights `1`) is an ordinary Horner evaluation with the
//! highest power first. Derivative models are built with the coefficient-chain
//! rule `new_w[i] = w[i] * (d - i)` (last weight dropped) and are evaluated
//! against the *same* parameter vector as the objective; they consume its
//! leading coefficients.

use crate::domain::Degree;
use crate::error::CurveError;

/// Initial-guess value used when the caller does not pick one.
pub const DEFAULT_SEED_VALUE: f64 = 1.0;

#[derive(Debug, Clone, PartialEq)]
pub struct PolynomialModel {
    weights: Vec<f64>,
    /// Number of coefficients `eval` accepts (the objective's coefficient count).
    arity: usize,
}

impl PolynomialModel {
    /// Model of the given degree with every weight set to `1`.
    pub fn with_degree(degree: Degree) -> Self {
        Self::from_weights(vec![1.0; degree.coefficient_count()])
    }

    /// Model taking exactly `weights.len()` coefficients.
    pub fn from_weights(weights: Vec<f64>) -> Self {
        let arity = weights.len();
        Self { weights, arity }
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Polynomial degree (weight count minus one), `None` for the empty model
    /// obtained by differentiating a constant.
    pub fn num_variables(&self) -> Option<usize> {
        self.weights.len().checked_sub(1)
    }

    /// Evaluate at `x` with the given free coefficients.
    pub fn eval(&self, x: f64, coefs: &[f64]) -> Result<f64, CurveError> {
        self.check_shape(coefs)?;
        Ok(self.fold(x, coefs))
    }

    /// Elementwise evaluation over `xs`.
    pub fn eval_series(&self, xs: &[f64], coefs: &[f64]) -> Result<Vec<f64>, CurveError> {
        self.check_shape(coefs)?;
        Ok(xs.iter().map(|&x| self.fold(x, coefs)).collect())
    }

    /// Initial guess: `arity` copies of `value`.
    pub fn sample_input(&self, value: f64) -> Vec<f64> {
        vec![value; self.arity]
    }

    /// Coefficient-chain "derivative": one degree lower, same arity.
    ///
    /// The gradient of a degree-0 model is the empty model, whose `eval`
    /// always returns `0.0`; the gradient of the empty model is empty again.
    pub fn gradient(&self) -> Self {
        let Some(degree) = self.num_variables() else {
            return self.clone();
        };
        let weights = self.weights[..degree]
            .iter()
            .enumerate()
            .map(|(i, &w)| w * (degree - i) as f64)
            .collect();
        Self {
            weights,
            arity: self.arity,
        }
    }

    /// Partial derivatives of `eval(x, coefs)` with respect to each coefficient.
    ///
    /// `eval` is linear in the coefficients, so this does not depend on them:
    /// `d/dc_i = w_i * x^(k-1-i)` for the `k` weighted positions, `0` beyond.
    ///
    /// # Panics
    /// Panics if `out` is shorter than `self.arity()`.
    pub fn coefficient_jacobian(&self, x: f64, out: &mut [f64]) {
        let k = self.weights.len();
        out[k..self.arity].fill(0.0);
        let mut power = 1.0;
        for i in (0..k).rev() {
            out[i] = self.weights[i] * power;
            power *= x;
        }
    }

    fn fold(&self, x: f64, coefs: &[f64]) -> f64 {
        self.weights
            .iter()
            .zip(coefs)
            .fold(0.0, |out, (&w, &c)| out * x + c * w)
    }

    fn check_shape(&self, coefs: &[f64]) -> Result<(), CurveError> {
        if coefs.len() != self.arity {
            return Err(CurveError::ShapeMismatch {
                expected: self.arity,
                actual: coefs.len(),
            });
        }
        Ok(())
    }
}

/// An objective together with its first and second coefficient-chain
/// derivatives.
#[derive(Debug, Clone)]
pub struct ModelChain {
    pub degree: Degree,
    pub objective: PolynomialModel,
    pub grad1: PolynomialModel,
    pub grad2: PolynomialModel,
}

impl ModelChain {
    pub fn with_degree(degree: Degree) -> Self {
        let objective = PolynomialModel::with_degree(degree);
        let grad1 = objective.gradient();
        let grad2 = grad1.gradient();
        Self {
            degree,
            objective,
            grad1,
            grad2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gradient_drops_one_weight_per_step() {
        for d in 0..10 {
            let mut model = PolynomialModel::with_degree(Degree(d));
            assert_eq!(model.gradient().weights().len(), d);
            for _ in 0..d {
                model = model.gradient();
            }
            assert_eq!(model.weights().len(), 1, "degree {d}");
            assert_eq!(model.num_variables(), Some(0));

            // One more step reaches the empty model.
            model = model.gradient();
            assert!(model.weights().is_empty(), "degree {d}");
            assert_eq!(model.num_variables(), None);
        }
    }

    #[test]
    fn gradient_applies_coefficient_chain() {
        let model = PolynomialModel::with_degree(Degree(3));
        let g1 = model.gradient();
        assert_eq!(g1.weights(), &[3.0, 2.0, 1.0]);
        let g2 = g1.gradient();
        assert_eq!(g2.weights(), &[6.0, 2.0]);
        assert_eq!(g2.arity(), 4);

        let custom = PolynomialModel::from_weights(vec![2.0, 5.0, 7.0]);
        assert_eq!(custom.gradient().weights(), &[4.0, 5.0]);
    }

    #[test]
    fn eval_at_zero_returns_last_term() {
        let model = PolynomialModel::from_weights(vec![1.5, -2.0, 3.0, 0.5]);
        let coefs = [4.0, 9.0, -1.0, 6.0];
        assert_eq!(model.eval(0.0, &coefs).unwrap(), 6.0 * 0.5);
    }

    #[test]
    fn objective_is_horner_highest_power_first() {
        let model = PolynomialModel::with_degree(Degree(2));
        // 3x^2 - 2x + 5 at x = 2
        let y = model.eval(2.0, &[3.0, -2.0, 5.0]).unwrap();
        assert!((y - 13.0).abs() < 1e-12);

        // First chain model: 6x - 2 using the leading coefficients.
        let g1 = model.gradient();
        let dy = g1.eval(2.0, &[3.0, -2.0, 5.0]).unwrap();
        assert!((dy - 10.0).abs() < 1e-12);
    }

    #[test]
    fn eval_series_is_elementwise() {
        let model = PolynomialModel::with_degree(Degree(1));
        let ys = model.eval_series(&[0.0, 0.5, 1.0], &[2.0, 1.0]).unwrap();
        assert_eq!(ys, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn eval_rejects_mismatched_coefficients() {
        let model = PolynomialModel::with_degree(Degree(2));
        let err = model.eval(1.0, &[1.0, 2.0]).unwrap_err();
        assert!(matches!(
            err,
            CurveError::ShapeMismatch {
                expected: 3,
                actual: 2
            }
        ));
        assert!(model.gradient().eval_series(&[1.0], &[1.0; 4]).is_err());
    }

    #[test]
    fn empty_model_evaluates_to_zero() {
        let constant = PolynomialModel::with_degree(Degree(0));
        let empty = constant.gradient();
        assert_eq!(empty.eval(3.0, &[42.0]).unwrap(), 0.0);
        assert_eq!(empty.gradient(), empty);
    }

    #[test]
    fn sample_input_matches_arity() {
        let chain = ModelChain::with_degree(Degree(4));
        assert_eq!(chain.objective.sample_input(0.1), vec![0.1; 5]);
        assert_eq!(chain.grad2.sample_input(DEFAULT_SEED_VALUE), vec![1.0; 5]);
    }

    #[test]
    fn jacobian_matches_finite_difference() {
        let chain = ModelChain::with_degree(Degree(3));
        let coefs = [0.3, -1.2, 0.7, 2.0];
        let x = 0.6;
        for model in [&chain.objective, &chain.grad1, &chain.grad2] {
            let mut jac = [f64::NAN; 4];
            model.coefficient_jacobian(x, &mut jac);
            for i in 0..4 {
                let mut bumped = coefs;
                bumped[i] += 1e-6;
                let fd = (model.eval(x, &bumped).unwrap() - model.eval(x, &coefs).unwrap()) / 1e-6;
                assert!((fd - jac[i]).abs() < 1e-6, "i={i} fd={fd} jac={}", jac[i]);
            }
        }
    }
}
