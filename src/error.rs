//! Error types.
//!
//! Every precondition violation in this crate surfaces as a [`StatsError`].
//! Nothing falls back to `NaN` or `0.0`: callers rendering a report are
//! expected to catch the error for the affected comparison and mark it as
//! "not computed".

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, StatsError>;

/// Errors raised by the statistics engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    /// A statistic needs at least `needed` observations but got `got`.
    #[error("insufficient data: need at least {needed} observations, got {got}")]
    InsufficientData {
        /// Minimum number of observations.
        needed: usize,
        /// Observations supplied.
        got: usize,
    },

    /// A computation would divide by a zero (or numerically zero) variance.
    #[error("degenerate variance: {0}")]
    DegenerateVariance(&'static str),

    /// Proportion inputs are out of domain.
    #[error("invalid proportion input: {0}")]
    InvalidProportion(String),

    /// Paired sequences have mismatched lengths, too few points, or zero variance.
    #[error("invalid regression input: {0}")]
    InvalidRegressionInput(String),

    /// Contingency table is malformed or has degenerate marginals.
    #[error("invalid contingency table: {0}")]
    InvalidContingencyTable(String),

    /// A sample element is NaN or infinite.
    #[error("non-finite value at index {index}")]
    NonFiniteValue {
        /// Position of the first offending element.
        index: usize,
    },

    /// Significance level outside the open interval (0, 1).
    #[error("invalid alpha: {0} (must be between 0 and 1, exclusive)")]
    InvalidAlpha(f64),

    /// Quantile probability outside the closed interval [0, 1].
    #[error("invalid probability: {0} (must be between 0 and 1, inclusive)")]
    InvalidProbability(f64),

    /// Bootstrap requested with zero resampling iterations.
    #[error("bootstrap iterations must be at least 1")]
    InvalidIterations,
}

impl StatsError {
    /// Stable snake_case name of the error kind, suitable for report output.
    ///
    /// ```
    /// use trial_stats::StatsError;
    ///
    /// let e = StatsError::InsufficientData { needed: 2, got: 1 };
    /// assert_eq!(e.kind(), "insufficient_data");
    /// ```
    pub fn kind(&self) -> &'static str {
        match self {
            StatsError::InsufficientData { .. } => "insufficient_data",
            StatsError::DegenerateVariance(_) => "degenerate_variance",
            StatsError::InvalidProportion(_) => "invalid_proportion",
            StatsError::InvalidRegressionInput(_) => "invalid_regression_input",
            StatsError::InvalidContingencyTable(_) => "invalid_contingency_table",
            StatsError::NonFiniteValue { .. } => "non_finite_value",
            StatsError::InvalidAlpha(_) => "invalid_alpha",
            StatsError::InvalidProbability(_) => "invalid_probability",
            StatsError::InvalidIterations => "invalid_iterations",
        }
    }
}

/// Rejects alpha values outside (0, 1).
pub(crate) fn check_alpha(alpha: f64) -> Result<()> {
    if alpha.is_finite() && alpha > 0.0 && alpha < 1.0 {
        Ok(())
    } else {
        Err(StatsError::InvalidAlpha(alpha))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let e = StatsError::InsufficientData { needed: 2, got: 1 };
        assert_eq!(
            e.to_string(),
            "insufficient data: need at least 2 observations, got 1"
        );
        let e = StatsError::NonFiniteValue { index: 3 };
        assert_eq!(e.to_string(), "non-finite value at index 3");
    }

    #[test]
    fn kinds_are_distinct() {
        let errors = [
            StatsError::InsufficientData { needed: 1, got: 0 },
            StatsError::DegenerateVariance("x"),
            StatsError::InvalidProportion("x".into()),
            StatsError::InvalidRegressionInput("x".into()),
            StatsError::InvalidContingencyTable("x".into()),
            StatsError::NonFiniteValue { index: 0 },
            StatsError::InvalidAlpha(2.0),
            StatsError::InvalidProbability(2.0),
            StatsError::InvalidIterations,
        ];
        let mut kinds: Vec<&str> = errors.iter().map(|e| e.kind()).collect();
        kinds.sort_unstable();
        kinds.dedup();
        assert_eq!(kinds.len(), errors.len());
    }

    #[test]
    fn alpha_bounds() {
        assert!(check_alpha(0.05).is_ok());
        assert!(check_alpha(0.5).is_ok());
        assert_eq!(check_alpha(0.0), Err(StatsError::InvalidAlpha(0.0)));
        assert_eq!(check_alpha(1.0), Err(StatsError::InvalidAlpha(1.0)));
        assert!(check_alpha(f64::NAN).is_err());
        assert!(check_alpha(-0.1).is_err());
    }
}
