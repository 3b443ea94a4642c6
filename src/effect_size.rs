//! Standardized mean-difference effect sizes.
//!
//! Cohen's d with the pooled standard deviation, and Hedges' g with the
//! small-sample bias correction.
//!
//! # Examples
//!
//! ```
//! use trial_stats::effect_size::{effect_size_two_sample, EffectInterpretation};
//!
//! let a = [5.0, 6.0, 7.0, 6.0, 5.5];
//! let b = [3.0, 4.0, 5.0, 4.0, 3.5];
//! let es = effect_size_two_sample(&a, &b).unwrap();
//! assert!(es.cohens_d > 2.0);
//! assert!(es.hedges_g < es.cohens_d);
//! assert_eq!(es.interpretation(), EffectInterpretation::Large);
//! ```

use std::fmt;

use crate::descriptive::{mean, sample_variance, validate_sample};
use crate::error::{Result, StatsError};

/// Effect sizes for the difference `mean(a) − mean(b)`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectSizeResult {
    /// Cohen's d = (x̄ₐ − x̄_b) / s_pooled.
    pub cohens_d: f64,
    /// Hedges' g = d · J(nₐ + n_b − 2).
    pub hedges_g: f64,
    /// Pooled standard deviation.
    pub pooled_sd: f64,
}

impl EffectSizeResult {
    /// Magnitude label for Cohen's d.
    pub fn interpretation(&self) -> EffectInterpretation {
        EffectInterpretation::from_d(self.cohens_d)
    }
}

/// Magnitude of a standardized effect, using Cohen's conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EffectInterpretation {
    /// |d| < 0.2
    Negligible,
    /// 0.2 ≤ |d| < 0.5
    Small,
    /// 0.5 ≤ |d| < 0.8
    Medium,
    /// |d| ≥ 0.8
    Large,
}

impl EffectInterpretation {
    /// Classifies an effect size by its absolute value.
    pub fn from_d(d: f64) -> Self {
        let abs_d = d.abs();
        if abs_d < 0.2 {
            EffectInterpretation::Negligible
        } else if abs_d < 0.5 {
            EffectInterpretation::Small
        } else if abs_d < 0.8 {
            EffectInterpretation::Medium
        } else {
            EffectInterpretation::Large
        }
    }
}

impl fmt::Display for EffectInterpretation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EffectInterpretation::Negligible => write!(f, "negligible"),
            EffectInterpretation::Small => write!(f, "small"),
            EffectInterpretation::Medium => write!(f, "medium"),
            EffectInterpretation::Large => write!(f, "large"),
        }
    }
}

/// Hedges' small-sample correction factor J(df) = 1 − 3 / (4·df − 1).
///
/// ```
/// use trial_stats::effect_size::hedges_correction;
///
/// assert!((hedges_correction(8.0) - (1.0 - 3.0 / 31.0)).abs() < 1e-15);
/// ```
pub fn hedges_correction(df: f64) -> f64 {
    1.0 - 3.0 / (4.0 * df - 1.0)
}

/// Computes Cohen's d and Hedges' g for two independent samples.
///
/// # Algorithm
///
/// s²_pooled = ((nₐ−1)s²ₐ + (n_b−1)s²_b) / (nₐ + n_b − 2)
/// d = (x̄ₐ − x̄_b) / s_pooled
/// g = d · (1 − 3 / (4(nₐ + n_b − 2) − 1))
///
/// Swapping the arguments negates both d and g.
///
/// # Errors
///
/// [`StatsError::InsufficientData`] if either sample has fewer than 2
/// observations, [`StatsError::DegenerateVariance`] if the pooled variance
/// is zero.
///
/// # References
///
/// - Cohen (1988). "Statistical Power Analysis for the Behavioral Sciences",
///   2nd edition.
/// - Hedges (1981). "Distribution theory for Glass's estimator of effect
///   size and related estimators". Journal of Educational Statistics, 6(2),
///   107–128.
pub fn effect_size_two_sample(a: &[f64], b: &[f64]) -> Result<EffectSizeResult> {
    validate_sample(a, 2)?;
    validate_sample(b, 2)?;

    let na = a.len() as f64;
    let nb = b.len() as f64;
    let var_a = sample_variance(a)?;
    let var_b = sample_variance(b)?;

    let df = na + nb - 2.0;
    let pooled_var = ((na - 1.0) * var_a + (nb - 1.0) * var_b) / df;
    if pooled_var < 1e-300 {
        tracing::debug!(n_a = a.len(), n_b = b.len(), "pooled variance is zero");
        return Err(StatsError::DegenerateVariance(
            "pooled variance of both samples is zero",
        ));
    }
    let pooled_sd = pooled_var.sqrt();

    let cohens_d = (mean(a)? - mean(b)?) / pooled_sd;
    let hedges_g = cohens_d * hedges_correction(df);

    Ok(EffectSizeResult {
        cohens_d,
        hedges_g,
        pooled_sd,
    })
}
