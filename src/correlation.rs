//! Correlation analysis.
//!
//! Pearson product-moment correlation for paired samples, its t-test
//! against ρ = 0, and Fisher z-transformation confidence intervals.
//!
//! # Examples
//!
//! ```
//! use trial_stats::correlation::pearson_correlation;
//!
//! let x = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let y = [2.0, 4.0, 5.0, 4.0, 5.0];
//! let r = pearson_correlation(&x, &y).unwrap();
//! assert!(r > 0.7);
//! ```

use u_numflow::special;
use u_numflow::stats;

use crate::error::{check_alpha, Result, StatsError};

/// Result of testing H₀: ρ = 0.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CorrelationTest {
    /// Correlation coefficient in [-1, 1].
    pub r: f64,
    /// Two-tailed p-value.
    pub p_value: f64,
    /// Number of pairs.
    pub n: usize,
}

/// Confidence interval for a correlation coefficient.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CorrelationCI {
    /// Lower bound.
    pub lower: f64,
    /// Upper bound.
    pub upper: f64,
    /// Significance level (interval covers 1 − alpha).
    pub alpha: f64,
}

// ---------------------------------------------------------------------------
// Shared centered moments
// ---------------------------------------------------------------------------

/// Centered sums of squares and cross-products for two paired sequences.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PairedMoments {
    pub n: usize,
    pub mean_x: f64,
    pub mean_y: f64,
    pub sxx: f64,
    pub syy: f64,
    pub sxy: f64,
}

impl PairedMoments {
    /// Pearson r from the moments, clamped into [-1, 1].
    pub fn r(&self) -> f64 {
        (self.sxy / (self.sxx.sqrt() * self.syy.sqrt())).clamp(-1.0, 1.0)
    }
}

fn is_constant(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}

/// Validates a pair of sequences and computes their centered moments.
///
/// Requires equal lengths, n ≥ 2, finite values, and non-zero variance in
/// both sequences.
pub(crate) fn paired_moments(x: &[f64], y: &[f64]) -> Result<PairedMoments> {
    let n = x.len();
    if n != y.len() {
        return Err(StatsError::InvalidRegressionInput(format!(
            "length mismatch: x has {n} values, y has {}",
            y.len()
        )));
    }
    if n < 2 {
        return Err(StatsError::InvalidRegressionInput(format!(
            "need at least 2 pairs, got {n}"
        )));
    }
    for (name, values) in [("x", x), ("y", y)] {
        if let Some(index) = values.iter().position(|v| !v.is_finite()) {
            return Err(StatsError::InvalidRegressionInput(format!(
                "{name}[{index}] is not finite"
            )));
        }
    }

    let mean_x = stats::mean(x).ok_or(StatsError::InsufficientData { needed: 2, got: n })?;
    let mean_y = stats::mean(y).ok_or(StatsError::InsufficientData { needed: 2, got: n })?;

    let mut sxx = 0.0;
    let mut syy = 0.0;
    let mut sxy = 0.0;
    for (&xi, &yi) in x.iter().zip(y.iter()) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }

    // Centering on a rounded mean leaves a tiny residual for constant input.
    if sxx < 1e-300 || is_constant(x) {
        tracing::debug!(n, "rejecting paired input: x has zero variance");
        return Err(StatsError::InvalidRegressionInput(
            "x has zero variance".into(),
        ));
    }
    if syy < 1e-300 || is_constant(y) {
        tracing::debug!(n, "rejecting paired input: y has zero variance");
        return Err(StatsError::InvalidRegressionInput(
            "y has zero variance".into(),
        ));
    }

    Ok(PairedMoments {
        n,
        mean_x,
        mean_y,
        sxx,
        syy,
        sxy,
    })
}

// ---------------------------------------------------------------------------
// Pearson
// ---------------------------------------------------------------------------

/// Computes the Pearson product-moment correlation coefficient.
///
/// # Algorithm
///
/// r = Sxy / √(Sxx · Syy), with centered sums of squares and cross-products.
///
/// # Errors
///
/// [`StatsError::InvalidRegressionInput`] if the lengths differ, n < 2, or
/// either sequence has zero variance.
///
/// # References
///
/// Pearson (1895). "Note on regression and inheritance in the case of
/// two parents". Proceedings of the Royal Society of London, 58, 240–242.
///
/// # Examples
///
/// ```
/// use trial_stats::correlation::pearson_correlation;
///
/// let x = [1.0, 2.0, 3.0, 4.0, 5.0];
/// let y = [10.0, 8.0, 6.0, 4.0, 2.0];
/// let r = pearson_correlation(&x, &y).unwrap();
/// assert!((r + 1.0).abs() < 1e-12);
/// ```
pub fn pearson_correlation(x: &[f64], y: &[f64]) -> Result<f64> {
    Ok(paired_moments(x, y)?.r())
}

/// Pearson correlation with a two-tailed p-value for H₀: ρ = 0.
///
/// # Algorithm
///
/// t = r·√(n−2) / √(1−r²), df = n − 2, p from the Student-t CDF.
///
/// # Errors
///
/// As [`pearson_correlation`], and additionally
/// [`StatsError::InvalidRegressionInput`] when n < 3 (no residual degrees
/// of freedom).
pub fn pearson_test(x: &[f64], y: &[f64]) -> Result<CorrelationTest> {
    let moments = paired_moments(x, y)?;
    let n = moments.n;
    if n < 3 {
        return Err(StatsError::InvalidRegressionInput(format!(
            "significance test needs at least 3 pairs, got {n}"
        )));
    }
    let r = moments.r();
    Ok(CorrelationTest {
        r,
        p_value: correlation_p_value(r, n),
        n,
    })
}

fn correlation_p_value(r: f64, n: usize) -> f64 {
    let df = (n - 2) as f64;
    let denom = 1.0 - r * r;
    if denom < 1e-300 {
        return 0.0; // perfect correlation
    }
    let t = r * df.sqrt() / denom.sqrt();
    (2.0 * (1.0 - special::t_distribution_cdf(t.abs(), df))).clamp(0.0, 1.0)
}

// ---------------------------------------------------------------------------
// Fisher z interval
// ---------------------------------------------------------------------------

/// Confidence interval for a correlation coefficient via Fisher's
/// z-transformation.
///
/// z = atanh(r), SE = 1/√(n−3), bounds = tanh(z ± z₁₋α/₂ · SE).
///
/// # Errors
///
/// [`StatsError::InsufficientData`] if n < 4,
/// [`StatsError::InvalidRegressionInput`] if r is not in (-1, 1),
/// [`StatsError::InvalidAlpha`] if alpha is not in (0, 1).
///
/// # Examples
///
/// ```
/// use trial_stats::correlation::correlation_ci;
///
/// let ci = correlation_ci(0.8, 30, 0.05).unwrap();
/// assert!(ci.lower > 0.0 && ci.lower < 0.8);
/// assert!(ci.upper > 0.8 && ci.upper < 1.0);
/// ```
pub fn correlation_ci(r: f64, n: usize, alpha: f64) -> Result<CorrelationCI> {
    if n < 4 {
        return Err(StatsError::InsufficientData { needed: 4, got: n });
    }
    if !r.is_finite() || r <= -1.0 || r >= 1.0 {
        return Err(StatsError::InvalidRegressionInput(format!(
            "correlation {r} outside the open interval (-1, 1)"
        )));
    }
    check_alpha(alpha)?;

    let z = r.atanh();
    let se = 1.0 / (n as f64 - 3.0).sqrt();
    let z_crit = special::inverse_normal_cdf(1.0 - alpha / 2.0);

    Ok(CorrelationCI {
        lower: (z - z_crit * se).tanh(),
        upper: (z + z_crit * se).tanh(),
        alpha,
    })
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn pearson_symmetric_and_bounded(
            data in proptest::collection::vec(-1e3_f64..1e3, 2..=40)
                .prop_flat_map(|x| {
                    let n = x.len();
                    (Just(x), proptest::collection::vec(-1e3_f64..1e3, n..=n))
                })
        ) {
            let (x, y) = data;
            if let Ok(rxy) = pearson_correlation(&x, &y) {
                let ryx = pearson_correlation(&y, &x).expect("symmetric input valid");
                prop_assert_eq!(rxy, ryx);
                prop_assert!((-1.0..=1.0).contains(&rxy), "r = {}", rxy);
            }
        }

        #[test]
        fn pearson_test_p_bounded(
            data in proptest::collection::vec(-1e3_f64..1e3, 3..=30)
                .prop_flat_map(|x| {
                    let n = x.len();
                    (Just(x), proptest::collection::vec(-1e3_f64..1e3, n..=n))
                })
        ) {
            let (x, y) = data;
            if let Ok(t) = pearson_test(&x, &y) {
                prop_assert!(t.p_value >= 0.0 && t.p_value <= 1.0, "p = {}", t.p_value);
            }
        }
    }
}
