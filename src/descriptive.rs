//! Descriptive statistics.
//!
//! Per-condition summaries: mean, median, sample standard deviation,
//! standard error, and the five-number summary.
//!
//! # Quantile rule
//!
//! All quantiles in this crate (quartiles here, percentiles of bootstrap
//! distributions in [`crate::confidence`]) use Hyndman & Fan type 7 linear
//! interpolation on the sorted sample:
//!
//! h = (n − 1)·p, q = x₍⌊h⌋₎ + (h − ⌊h⌋)·(x₍⌊h⌋+1₎ − x₍⌊h⌋₎)
//!
//! This is the default of R, NumPy, and Excel's `PERCENTILE.INC`. At
//! p = 0.5 it coincides with the median (mean of the two middle values for
//! even n).
//!
//! # Examples
//!
//! ```
//! use trial_stats::descriptive::compute_descriptive_stats;
//!
//! let s = compute_descriptive_stats(&[10.0, 12.0, 14.0]).unwrap();
//! assert_eq!(s.n, 3);
//! assert!((s.mean - 12.0).abs() < 1e-12);
//! assert!((s.sample_std_dev - 2.0).abs() < 1e-12);
//! ```

use u_numflow::stats;

use crate::error::{Result, StatsError};

/// Summary of a single sample.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DescriptiveStats {
    /// Number of observations.
    pub n: usize,
    /// Arithmetic mean.
    pub mean: f64,
    /// Median (type 7 quantile at p = 0.5).
    pub median: f64,
    /// Sample standard deviation, n − 1 denominator.
    pub sample_std_dev: f64,
    /// Standard error of the mean: s / √n.
    pub standard_error: f64,
}

/// Five-number summary, non-decreasing from `min` to `max`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FiveNumberSummary {
    /// Smallest observation.
    pub min: f64,
    /// First quartile.
    pub q1: f64,
    /// Median.
    pub median: f64,
    /// Third quartile.
    pub q3: f64,
    /// Largest observation.
    pub max: f64,
}

impl FiveNumberSummary {
    /// Interquartile range q3 − q1.
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }
}

// ---------------------------------------------------------------------------
// Input validation
// ---------------------------------------------------------------------------

/// Checks that `values` holds at least `needed` observations, all finite.
pub(crate) fn validate_sample(values: &[f64], needed: usize) -> Result<()> {
    if values.len() < needed {
        return Err(StatsError::InsufficientData {
            needed,
            got: values.len(),
        });
    }
    if let Some(index) = values.iter().position(|v| !v.is_finite()) {
        return Err(StatsError::NonFiniteValue { index });
    }
    Ok(())
}

/// Sorted copy of a sample. The input must already be validated as finite.
pub(crate) fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    sorted
}

/// Type 7 quantile of an already sorted, non-empty slice.
pub(crate) fn quantile_sorted(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    debug_assert!(n > 0);
    if n == 1 {
        return sorted[0];
    }
    let h = (n - 1) as f64 * p.clamp(0.0, 1.0);
    let lo = h.floor() as usize;
    if lo + 1 >= n {
        return sorted[n - 1];
    }
    let frac = h - lo as f64;
    // Weighted form avoids overflow in sorted[lo + 1] - sorted[lo] near f64::MAX.
    // Clamp keeps rounding from stepping past the bracketing order statistics.
    (sorted[lo] * (1.0 - frac) + sorted[lo + 1] * frac).clamp(sorted[lo], sorted[lo + 1])
}

// ---------------------------------------------------------------------------
// Individual statistics
// ---------------------------------------------------------------------------

/// Arithmetic mean (compensated summation).
///
/// # Errors
///
/// [`StatsError::InsufficientData`] for an empty sample,
/// [`StatsError::NonFiniteValue`] for NaN or infinite elements.
pub fn mean(values: &[f64]) -> Result<f64> {
    validate_sample(values, 1)?;
    stats::mean(values).ok_or(StatsError::InsufficientData {
        needed: 1,
        got: values.len(),
    })
}

/// Median: middle value of the sorted sample, or the mean of the two middle
/// values when n is even.
///
/// ```
/// use trial_stats::descriptive::median;
///
/// assert_eq!(median(&[3.0, 1.0, 2.0]).unwrap(), 2.0);
/// assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]).unwrap(), 2.5);
/// ```
pub fn median(values: &[f64]) -> Result<f64> {
    validate_sample(values, 1)?;
    Ok(quantile_sorted(&sorted_copy(values), 0.5))
}

/// Unbiased sample variance (n − 1 denominator).
pub(crate) fn sample_variance(values: &[f64]) -> Result<f64> {
    validate_sample(values, 2)?;
    stats::variance(values).ok_or(StatsError::InsufficientData {
        needed: 2,
        got: values.len(),
    })
}

/// Sample standard deviation with the n − 1 denominator.
///
/// # Errors
///
/// [`StatsError::InsufficientData`] when n < 2: a single observation has no
/// sample variance, and no `0.0` is fabricated in its place.
pub fn sample_std_dev(values: &[f64]) -> Result<f64> {
    Ok(sample_variance(values)?.sqrt())
}

/// Standard error of the mean, s / √n. Requires n ≥ 2.
pub fn standard_error(values: &[f64]) -> Result<f64> {
    let sd = sample_std_dev(values)?;
    Ok(sd / (values.len() as f64).sqrt())
}

/// Quantile at probability `p` ∈ [0, 1] using the type 7 rule.
///
/// # Errors
///
/// [`StatsError::InsufficientData`] for an empty sample,
/// [`StatsError::InvalidProbability`] if `p` is outside [0, 1].
///
/// ```
/// use trial_stats::descriptive::quantile;
///
/// let data = [1.0, 2.0, 3.0, 4.0];
/// assert!((quantile(&data, 0.25).unwrap() - 1.75).abs() < 1e-12);
/// ```
pub fn quantile(values: &[f64], p: f64) -> Result<f64> {
    validate_sample(values, 1)?;
    if !(0.0..=1.0).contains(&p) {
        return Err(StatsError::InvalidProbability(p));
    }
    Ok(quantile_sorted(&sorted_copy(values), p))
}

// ---------------------------------------------------------------------------
// Summaries
// ---------------------------------------------------------------------------

/// Computes n, mean, median, sample standard deviation, and standard error.
///
/// # Errors
///
/// [`StatsError::InsufficientData`] when n < 2, since the standard deviation
/// and standard error are part of the record. Use [`mean`] and [`median`]
/// directly for single-observation samples.
pub fn compute_descriptive_stats(values: &[f64]) -> Result<DescriptiveStats> {
    validate_sample(values, 2)?;

    let n = values.len();
    let mean = mean(values)?;
    let median = quantile_sorted(&sorted_copy(values), 0.5);
    let sample_std_dev = sample_std_dev(values)?;
    let standard_error = sample_std_dev / (n as f64).sqrt();

    Ok(DescriptiveStats {
        n,
        mean,
        median,
        sample_std_dev,
        standard_error,
    })
}

/// Computes min, q1, median, q3, max with the type 7 quantile rule.
///
/// Defined for n ≥ 1. With fewer than four observations the quartiles
/// interpolate between neighbouring order statistics; with one observation
/// all five values coincide.
///
/// ```
/// use trial_stats::descriptive::compute_five_number_summary;
///
/// let s = compute_five_number_summary(&[7.0, 1.0, 3.0, 5.0, 9.0]).unwrap();
/// assert_eq!((s.min, s.q1, s.median, s.q3, s.max), (1.0, 3.0, 5.0, 7.0, 9.0));
/// ```
pub fn compute_five_number_summary(values: &[f64]) -> Result<FiveNumberSummary> {
    validate_sample(values, 1)?;

    let sorted = sorted_copy(values);
    Ok(FiveNumberSummary {
        min: sorted[0],
        q1: quantile_sorted(&sorted, 0.25),
        median: quantile_sorted(&sorted, 0.5),
        q3: quantile_sorted(&sorted, 0.75),
        max: sorted[sorted.len() - 1],
    })
}
