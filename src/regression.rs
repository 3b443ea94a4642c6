//! Regression analysis.
//!
//! Simple ordinary least squares on two paired sequences.
//!
//! # Examples
//!
//! ```
//! use trial_stats::regression::ols_regression;
//!
//! let x = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let y = [2.1, 3.9, 6.1, 7.9, 10.1];
//! let fit = ols_regression(&x, &y).unwrap();
//! assert!((fit.slope - 2.0).abs() < 0.1);
//! assert!((fit.intercept - 0.1).abs() < 0.2);
//! assert!(fit.r > 0.99);
//! ```

use crate::correlation::paired_moments;
use crate::error::Result;

/// Result of a simple linear regression: y = intercept + slope · x.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OlsResult {
    /// Slope coefficient (β₁).
    pub slope: f64,
    /// Intercept (β₀).
    pub intercept: f64,
    /// Pearson correlation of the same inputs.
    pub r: f64,
    /// Coefficient of determination (r²).
    pub r_squared: f64,
    /// Number of pairs.
    pub n: usize,
}

impl OlsResult {
    /// Fitted value at `x`.
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// Computes simple linear regression (OLS closed-form).
///
/// # Algorithm
///
/// β₁ = Sxy / Sxx
/// β₀ = ȳ − β₁·x̄
///
/// `r` comes from the same centered moments as
/// [`pearson_correlation`](crate::correlation::pearson_correlation), so the
/// two always agree for identical input.
///
/// # Errors
///
/// [`StatsError::InvalidRegressionInput`](crate::StatsError::InvalidRegressionInput)
/// on length mismatch, n < 2, or zero variance in either sequence.
///
/// # References
///
/// Draper & Smith (1998). "Applied Regression Analysis", 3rd edition.
///
/// # Examples
///
/// ```
/// use trial_stats::regression::ols_regression;
///
/// let x = [1.0, 2.0, 3.0, 4.0, 5.0];
/// let y = [3.0, 5.0, 7.0, 9.0, 11.0];
/// let fit = ols_regression(&x, &y).unwrap();
/// assert!((fit.slope - 2.0).abs() < 1e-12);
/// assert!((fit.intercept - 1.0).abs() < 1e-12);
/// assert!((fit.predict(6.0) - 13.0).abs() < 1e-12);
/// ```
pub fn ols_regression(x: &[f64], y: &[f64]) -> Result<OlsResult> {
    let m = paired_moments(x, y)?;

    let slope = m.sxy / m.sxx;
    let intercept = m.mean_y - slope * m.mean_x;
    let r = m.r();

    Ok(OlsResult {
        slope,
        intercept,
        r,
        r_squared: r * r,
        n: m.n,
    })
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::correlation::pearson_correlation;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn ols_r_equals_pearson(
            data in proptest::collection::vec(-1e3_f64..1e3, 2..=30)
                .prop_flat_map(|x| {
                    let n = x.len();
                    (Just(x), proptest::collection::vec(-1e3_f64..1e3, n..=n))
                })
        ) {
            let (x, y) = data;
            if let Ok(fit) = ols_regression(&x, &y) {
                let r = pearson_correlation(&x, &y).expect("same preconditions");
                prop_assert!((fit.r - r).abs() < 1e-12, "r = {} vs {}", fit.r, r);
            }
        }

        #[test]
        fn ols_residuals_sum_to_zero(
            data in proptest::collection::vec(-1e3_f64..1e3, 3..=30)
                .prop_flat_map(|x| {
                    let n = x.len();
                    (Just(x), proptest::collection::vec(-1e3_f64..1e3, n..=n))
                })
        ) {
            let (x, y) = data;
            if let Ok(fit) = ols_regression(&x, &y) {
                let sum: f64 = x.iter().zip(y.iter()).map(|(&xi, &yi)| yi - fit.predict(xi)).sum();
                let scale: f64 = y.iter().map(|v| v.abs()).sum::<f64>().max(1.0);
                prop_assert!((sum / scale).abs() < 1e-6, "residual sum = {}", sum);
            }
        }
    }
}
