//! Small descriptive statistics over `f64` slices.
//!
//! Every function returns `None` for an empty input rather than `NaN`, so
//! callers decide what "no data" means for them.

/// Arithmetic mean.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Statistical median; the mean of the two middle values for even lengths.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Largest value.
pub fn max(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}

/// Trailing rolling mean with a fixed window.
///
/// Output has one entry per input value. Entry `i` is the mean of
/// `values[i + 1 - window ..= i]`, or `None` while fewer than `window` values
/// have been seen. A zero window yields all `None`.
pub fn trailing_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }
    (0..values.len())
        .map(|i| {
            if i + 1 < window {
                None
            } else {
                mean(&values[i + 1 - window..=i])
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn mean_and_median_of_empty_are_none() {
        assert_eq!(mean(&[]), None);
        assert_eq!(median(&[]), None);
        assert_eq!(max(&[]), None);
    }

    #[test]
    fn mean_basic() {
        assert_abs_diff_eq!(mean(&[1.0, 2.0, 3.0, 4.0]).unwrap(), 2.5, epsilon = 1e-12);
    }

    #[test]
    fn median_odd_and_even() {
        assert_eq!(median(&[9.0, 1.0, 5.0]), Some(5.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
    }

    #[test]
    fn max_picks_largest() {
        assert_eq!(max(&[2.0, 40.0, 20.0]), Some(40.0));
    }

    #[test]
    fn trailing_mean_is_not_centered() {
        let out = trailing_mean(&[1.0, 2.0, 3.0, 4.0, 5.0], 3);
        assert_eq!(out[0], None);
        assert_eq!(out[1], None);
        assert_abs_diff_eq!(out[2].unwrap(), 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(out[3].unwrap(), 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(out[4].unwrap(), 4.0, epsilon = 1e-12);
    }

    #[test]
    fn trailing_mean_window_longer_than_series() {
        let out = trailing_mean(&[1.0, 2.0], 7);
        assert_eq!(out, vec![None, None]);
    }

    #[test]
    fn trailing_mean_window_of_one_is_identity() {
        let out = trailing_mean(&[3.0, 8.0], 1);
        assert_eq!(out, vec![Some(3.0), Some(8.0)]);
    }

    #[test]
    fn trailing_mean_zero_window() {
        assert_eq!(trailing_mean(&[1.0], 0), vec![None]);
    }
}
