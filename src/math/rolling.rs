//! Rolling-window statistics.
//!
//! Semantics follow the usual dataframe convention: the first `window - 1`
//! outputs are undefined (`NaN`), and a window containing a `NaN` yields `NaN`.

/// Rolling mean over a trailing window of `window` values.
///
/// `window <= 1` returns the input unchanged.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    if window <= 1 {
        return values.to_vec();
    }

    let mut out = Vec::with_capacity(values.len());
    let mut sum = 0.0;
    let mut nan_count = 0usize;

    for (i, &v) in values.iter().enumerate() {
        if v.is_nan() {
            nan_count += 1;
        } else {
            sum += v;
        }

        if i >= window {
            let old = values[i - window];
            if old.is_nan() {
                nan_count -= 1;
            } else {
                sum -= old;
            }
        }

        if i + 1 < window || nan_count > 0 {
            out.push(f64::NAN);
        } else {
            out.push(sum / window as f64);
        }
    }

    out
}

/// Effective smoothing window for `rows` values: never more than half of them.
pub fn effective_window(smooth: usize, rows: usize) -> usize {
    smooth.min(rows / 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rolling_mean_basic() {
        let out = rolling_mean(&[1.0, 2.0, 3.0, 4.0, 5.0], 3);
        assert!(out[0].is_nan() && out[1].is_nan());
        assert_eq!(&out[2..], &[2.0, 3.0, 4.0]);
    }

    #[test]
    fn nan_poisons_its_windows() {
        let out = rolling_mean(&[1.0, f64::NAN, 3.0, 5.0, 7.0], 2);
        assert!(out[1].is_nan() && out[2].is_nan());
        assert_eq!(out[3], 4.0);
        assert_eq!(out[4], 6.0);
    }

    #[test]
    fn small_window_is_identity() {
        assert_eq!(rolling_mean(&[1.0, 2.0], 1), vec![1.0, 2.0]);
        assert_eq!(rolling_mean(&[1.0, 2.0], 0), vec![1.0, 2.0]);
    }

    #[test]
    fn window_capped_at_half_the_rows() {
        assert_eq!(effective_window(10, 100), 10);
        assert_eq!(effective_window(10, 7), 3);
        assert_eq!(effective_window(10, 1), 0);
    }
}
