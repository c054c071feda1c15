//! Extrema and zero-crossing detection on fitted series.
//!
//! Sign convention for `find_roots`: exact zeros (and non-finite values) take
//! the sign of the nearest preceding non-zero entry, and leading zeros take the
//! first non-zero sign. A series passing through an exact zero therefore
//! crosses once, and `[-1, 0, 1]` reports index 1 (the zero itself).

use crate::domain::{CurveSeries, Extrema, FitResult, MaxSlope, RootCrossing};
use crate::error::CurveError;

/// Index of the largest finite value; the first occurrence wins ties.
pub fn argmax(series: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in series.iter().enumerate() {
        if !v.is_finite() {
            continue;
        }
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

/// Steepest-improvement point of the fitted first derivative.
pub fn max_slope(grad1: &[f64], fraction: &[f64], axis: &[String]) -> Result<MaxSlope, CurveError> {
    let index = argmax(grad1).ok_or(CurveError::EmptySeries("fitted_grad1"))?;
    Ok(MaxSlope {
        index,
        fraction: fraction[index],
        axis_value: axis[index].clone(),
        slope: grad1[index],
    })
}

/// Row indices `i` where the sign of `series[i]` differs from `series[i + 1]`.
pub fn find_roots(series: &[f64]) -> Vec<usize> {
    let signs = carried_signs(series);
    signs
        .windows(2)
        .enumerate()
        .filter(|(_, w)| w[0] != w[1])
        .map(|(i, _)| i)
        .collect()
}

/// Roots of the fitted first derivative (local extrema of the curve).
pub fn first_derivative_roots(fit: &FitResult, fraction: &[f64], axis: &[String]) -> Vec<RootCrossing> {
    find_roots(&fit.grad1)
        .into_iter()
        .map(|index| RootCrossing {
            index,
            fraction: fraction[index],
            axis_value: axis[index].clone(),
            slope: None,
        })
        .collect()
}

/// Roots of the fitted second derivative (inflection points), with the slope
/// at each.
pub fn second_derivative_roots(fit: &FitResult, fraction: &[f64], axis: &[String]) -> Vec<RootCrossing> {
    find_roots(&fit.grad2)
        .into_iter()
        .map(|index| RootCrossing {
            index,
            fraction: fraction[index],
            axis_value: axis[index].clone(),
            slope: Some(fit.grad1[index]),
        })
        .collect()
}

/// Run the full extrema analysis for a fit.
pub fn analyze_extrema(curve: &CurveSeries, fit: &FitResult, axis: &[String]) -> Result<Extrema, CurveError> {
    if axis.len() != curve.rows {
        return Err(CurveError::ShapeMismatch {
            expected: curve.rows,
            actual: axis.len(),
        });
    }
    Ok(Extrema {
        max_slope: max_slope(&fit.grad1, &curve.fraction, axis)?,
        grad1_roots: first_derivative_roots(fit, &curve.fraction, axis),
        grad2_roots: second_derivative_roots(fit, &curve.fraction, axis),
    })
}

fn carried_signs(series: &[f64]) -> Vec<i8> {
    let raw: Vec<i8> = series.iter().map(|&v| sign(v)).collect();
    let Some(first) = raw.iter().copied().find(|&s| s != 0) else {
        return vec![0; raw.len()];
    };

    let mut last = first;
    raw.into_iter()
        .map(|s| {
            if s != 0 {
                last = s;
            }
            last
        })
        .collect()
}

fn sign(v: f64) -> i8 {
    if v > 0.0 {
        1
    } else if v < 0.0 {
        -1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Degree;
    use std::time::Duration;

    #[test]
    fn roots_at_sign_changes() {
        assert_eq!(find_roots(&[-1.0, -1.0, 1.0, 1.0, -1.0]), vec![1, 3]);
    }

    #[test]
    fn exact_zero_counts_once() {
        assert_eq!(find_roots(&[-1.0, 0.0, 1.0]), vec![1]);
        assert_eq!(find_roots(&[-1.0, 0.0, 0.0, 2.0]), vec![2]);
        // Touching zero without changing sign is not a crossing.
        assert!(find_roots(&[1.0, 0.0, 1.0]).is_empty());
        assert!(find_roots(&[0.0, 0.0, 3.0]).is_empty());
        assert!(find_roots(&[0.0, 0.0]).is_empty());
        assert!(find_roots(&[]).is_empty());
    }

    #[test]
    fn max_slope_picks_peak() {
        let axis: Vec<String> = ["a", "b", "c", "d"].iter().map(|s| s.to_string()).collect();
        let fraction = [0.25, 0.5, 0.75, 1.0];
        let m = max_slope(&[0.1, 0.5, 0.9, 0.3], &fraction, &axis).unwrap();
        assert_eq!(m.index, 2);
        assert_eq!(m.axis_value, "c");
        assert_eq!(m.fraction, 0.75);
    }

    #[test]
    fn argmax_first_occurrence_and_skips_nan() {
        assert_eq!(argmax(&[1.0, 3.0, 3.0]), Some(1));
        assert_eq!(argmax(&[f64::NAN, 2.0, 1.0]), Some(1));
        assert_eq!(argmax(&[f64::NAN]), None);
        assert!(max_slope(&[], &[], &[]).is_err());
    }

    #[test]
    fn second_derivative_roots_carry_slope() {
        let fit = FitResult {
            degree: Degree(3),
            params: vec![0.0; 4],
            fitted: vec![0.0; 4],
            grad1: vec![0.2, 0.4, 0.3, 0.1],
            grad2: vec![1.0, 0.5, -0.5, -1.0],
            rss: 0.0,
            evaluations: 0,
            elapsed: Duration::ZERO,
        };
        let axis: Vec<String> = (10..14).map(|v| v.to_string()).collect();
        let fraction = [0.25, 0.5, 0.75, 1.0];

        let roots = second_derivative_roots(&fit, &fraction, &axis);
        assert_eq!(
            roots,
            vec![RootCrossing {
                index: 1,
                fraction: 0.5,
                axis_value: "11".to_string(),
                slope: Some(0.4),
            }]
        );
        assert!(first_derivative_roots(&fit, &fraction, &axis).is_empty());
    }
}
