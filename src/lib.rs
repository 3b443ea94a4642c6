//! # trial-stats
//!
//! Statistical analysis engine for experiment reports: per-condition
//! summaries, between-condition hypothesis tests, effect sizes, and
//! reproducible confidence intervals.
//!
//! The crate operates on plain `f64` samples (and integer counts for
//! proportion and contingency-table tests). It knows nothing about where
//! the numbers came from or how the results are rendered; every operation
//! is a pure function that returns a typed result record or a
//! [`StatsError`].
//!
//! ## Modules
//!
//! - [`descriptive`] — Mean, median, sample SD, standard error, five-number summary
//! - [`correlation`] — Pearson correlation, significance test, Fisher z interval
//! - [`regression`] — Simple OLS (slope, intercept, r)
//! - [`effect_size`] — Cohen's d and Hedges' g
//! - [`testing`] — Welch t-test, chi-squared independence, two-proportion z-test, p-value adjustment
//! - [`confidence`] — Wilson score interval, percentile bootstrap
//! - [`random`] — Seedable random source for resampling
//! - [`error`] — Error types
//!
//! ## Design Philosophy
//!
//! - **Explicit failure**: degenerate input is an error, never `NaN` or `0`
//! - **Reproducibility**: resampling is seeded and bit-identical per seed
//! - **One convention**: a single quantile rule (Hyndman-Fan type 7) everywhere
//! - **Exact distributions**: p-values from the Student-t, χ², and normal CDFs
//!
//! ## Example
//!
//! ```
//! use trial_stats::{compute_descriptive_stats, welch_t_test_two_sided, effect_size_two_sample};
//!
//! let control = [10.0, 12.0, 14.0, 11.0, 13.0];
//! let treated = [15.0, 17.0, 16.0, 18.0, 14.0];
//!
//! let summary = compute_descriptive_stats(&control).unwrap();
//! assert_eq!(summary.n, 5);
//!
//! let t = welch_t_test_two_sided(&treated, &control).unwrap();
//! assert!(t.p_two_sided < 0.01);
//!
//! let es = effect_size_two_sample(&treated, &control).unwrap();
//! assert!(es.cohens_d > 0.8);
//! ```

pub mod confidence;
pub mod correlation;
pub mod descriptive;
pub mod effect_size;
pub mod error;
pub mod random;
pub mod regression;
pub mod testing;

pub use confidence::{
    bootstrap_mean_ci, bootstrap_mean_difference_ci, bootstrap_mean_difference_ci_with,
    proportion_ci, BootstrapCIResult, BootstrapConfig, BootstrapMethod, BootstrapSamples,
    ProportionCIResult, ProportionCiMethod,
};
pub use correlation::{correlation_ci, pearson_correlation, pearson_test};
pub use descriptive::{
    compute_descriptive_stats, compute_five_number_summary, DescriptiveStats, FiveNumberSummary,
};
pub use effect_size::{effect_size_two_sample, EffectInterpretation, EffectSizeResult};
pub use error::{Result, StatsError};
pub use random::RandomSource;
pub use regression::{ols_regression, OlsResult};
pub use testing::{
    chi_square_test, proportion_z_test, welch_t_test_two_sided, ChiSquareTestResult,
    ProportionZTestResult, WelchTTestResult,
};

/// Default significance level (95% intervals).
pub const DEFAULT_ALPHA: f64 = 0.05;

/// Default number of bootstrap resampling iterations.
pub const DEFAULT_BOOTSTRAP_ITERATIONS: usize = 10_000;

/// Seed used when a [`BootstrapConfig`] is built with `Default`.
pub const DEFAULT_BOOTSTRAP_SEED: u64 = 42;
