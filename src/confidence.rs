//! Confidence intervals.
//!
//! Wilson score intervals for a binomial proportion and percentile-bootstrap
//! intervals for means and mean differences.
//!
//! Bootstrap resampling is driven by an explicit [`RandomSource`], so two
//! calls with the same samples, iteration count, and seed return
//! bit-identical bounds.
//!
//! # Examples
//!
//! ```
//! use trial_stats::confidence::{bootstrap_mean_difference_ci, BootstrapConfig, BootstrapSamples};
//!
//! let samples = BootstrapSamples {
//!     high: &[12.0, 14.0, 13.5, 15.0, 14.2],
//!     low: &[10.0, 9.5, 11.0, 10.4, 9.8],
//! };
//! let config = BootstrapConfig::default().with_seed(42).with_iterations(2_000);
//! let ci = bootstrap_mean_difference_ci(&samples, &config).unwrap();
//! assert!(ci.lower > 0.0);
//! assert!(ci.lower <= ci.estimate && ci.estimate <= ci.upper);
//! ```

use u_numflow::special;

use crate::descriptive::{mean, quantile_sorted, validate_sample};
use crate::error::{check_alpha, Result, StatsError};
use crate::random::RandomSource;
use crate::{DEFAULT_ALPHA, DEFAULT_BOOTSTRAP_ITERATIONS, DEFAULT_BOOTSTRAP_SEED};

/// Construction used for a proportion interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ProportionCiMethod {
    /// Wilson score interval.
    Wilson,
}

/// Construction used for a bootstrap interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BootstrapMethod {
    /// Percentiles of the resampled statistic.
    Percentile,
}

/// Confidence interval for a binomial proportion.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProportionCIResult {
    /// Lower bound, in [0, 1].
    pub lower: f64,
    /// Upper bound, in [0, 1].
    pub upper: f64,
    /// Observed proportion successes / n.
    pub estimate: f64,
    /// Significance level (interval covers 1 − alpha).
    pub alpha: f64,
    /// Interval construction.
    pub method: ProportionCiMethod,
}

/// Percentile-bootstrap confidence interval.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BootstrapCIResult {
    /// alpha/2 percentile of the bootstrap distribution.
    pub lower: f64,
    /// 1 − alpha/2 percentile of the bootstrap distribution.
    pub upper: f64,
    /// Statistic on the original samples.
    pub estimate: f64,
    /// Significance level.
    pub alpha: f64,
    /// Interval construction.
    pub method: BootstrapMethod,
    /// Number of resampling iterations.
    pub iterations: usize,
    /// Seed of the random source at the start of the run.
    pub seed: u64,
}

/// Bootstrap configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BootstrapConfig {
    /// Number of resampling iterations (default: 10,000).
    pub iterations: usize,
    /// Significance level (default: 0.05 for a 95% interval).
    pub alpha: f64,
    /// Seed for the random source (default: [`DEFAULT_BOOTSTRAP_SEED`]).
    pub seed: u64,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_BOOTSTRAP_ITERATIONS,
            alpha: DEFAULT_ALPHA,
            seed: DEFAULT_BOOTSTRAP_SEED,
        }
    }
}

impl BootstrapConfig {
    /// Sets the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the number of iterations.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Sets the significance level.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(StatsError::InvalidIterations);
        }
        check_alpha(self.alpha)
    }
}

/// Two independent samples whose mean difference `high − low` is bootstrapped.
#[derive(Debug, Clone, Copy)]
pub struct BootstrapSamples<'a> {
    /// Sample whose mean is the minuend.
    pub high: &'a [f64],
    /// Sample whose mean is the subtrahend.
    pub low: &'a [f64],
}

// ---------------------------------------------------------------------------
// Wilson score interval
// ---------------------------------------------------------------------------

/// Wilson score interval for a binomial proportion.
///
/// # Algorithm
///
/// With p̂ = s/n and z = Φ⁻¹(1 − α/2):
///
/// center = (p̂ + z²/2n) / (1 + z²/n)
/// half = z·√(p̂(1−p̂)/n + z²/4n²) / (1 + z²/n)
///
/// Unlike the normal-approximation interval it does not collapse to a point
/// at p̂ = 0 or p̂ = 1. Bounds are exactly 0 when s = 0 and exactly 1 when
/// s = n.
///
/// # Errors
///
/// [`StatsError::InvalidProportion`] if n = 0 or successes > n,
/// [`StatsError::InvalidAlpha`] if alpha is not in (0, 1).
///
/// # References
///
/// Wilson (1927). "Probable inference, the law of succession, and
/// statistical inference". JASA, 22(158), 209–212.
///
/// # Examples
///
/// ```
/// use trial_stats::confidence::proportion_ci;
///
/// let ci = proportion_ci(15, 30, 0.05).unwrap();
/// assert!(ci.lower > 0.3 && ci.upper < 0.7);
///
/// let zero = proportion_ci(0, 20, 0.05).unwrap();
/// assert_eq!(zero.lower, 0.0);
/// assert!(zero.upper > 0.0);
/// ```
pub fn proportion_ci(successes: u64, n: u64, alpha: f64) -> Result<ProportionCIResult> {
    if n == 0 {
        return Err(StatsError::InvalidProportion(
            "number of trials must be positive".into(),
        ));
    }
    if successes > n {
        return Err(StatsError::InvalidProportion(format!(
            "successes ({successes}) exceed trials ({n})"
        )));
    }
    check_alpha(alpha)?;

    let nf = n as f64;
    let p_hat = successes as f64 / nf;
    let z = special::inverse_normal_cdf(1.0 - alpha / 2.0);
    let z2 = z * z;

    let denom = 1.0 + z2 / nf;
    let center = (p_hat + z2 / (2.0 * nf)) / denom;
    let half = z * (p_hat * (1.0 - p_hat) / nf + z2 / (4.0 * nf * nf)).sqrt() / denom;

    let lower = if successes == 0 {
        0.0
    } else {
        (center - half).clamp(0.0, p_hat)
    };
    let upper = if successes == n {
        1.0
    } else {
        (center + half).clamp(p_hat, 1.0)
    };

    Ok(ProportionCIResult {
        lower,
        upper,
        estimate: p_hat,
        alpha,
        method: ProportionCiMethod::Wilson,
    })
}

// ---------------------------------------------------------------------------
// Percentile bootstrap
// ---------------------------------------------------------------------------

/// Percentile-bootstrap interval for `mean(high) − mean(low)`.
///
/// Builds a fresh [`RandomSource`] from `config.seed`, so the result depends
/// only on the inputs and the configuration.
///
/// # Algorithm
///
/// For each of `iterations` rounds, resample `high` and `low` independently
/// with replacement at their original sizes and record the difference of
/// resampled means. Sort the differences; the bounds are the alpha/2 and
/// 1 − alpha/2 type 7 quantiles of that distribution.
///
/// # Errors
///
/// [`StatsError::InsufficientData`] if either sample is empty,
/// [`StatsError::NonFiniteValue`] for NaN or infinite elements,
/// [`StatsError::InvalidIterations`] / [`StatsError::InvalidAlpha`] for a bad
/// configuration.
///
/// # References
///
/// Efron & Tibshirani (1993). "An Introduction to the Bootstrap", ch. 13.
pub fn bootstrap_mean_difference_ci(
    samples: &BootstrapSamples<'_>,
    config: &BootstrapConfig,
) -> Result<BootstrapCIResult> {
    let mut rng = RandomSource::from_seed(config.seed);
    bootstrap_mean_difference_ci_with(samples, config, &mut rng)
}

/// Same as [`bootstrap_mean_difference_ci`], drawing from a caller-owned
/// random source instead of `config.seed`.
///
/// The reported `seed` is the seed `rng` was created from. The source is
/// advanced, so a second call continues the stream rather than repeating it.
pub fn bootstrap_mean_difference_ci_with(
    samples: &BootstrapSamples<'_>,
    config: &BootstrapConfig,
    rng: &mut RandomSource,
) -> Result<BootstrapCIResult> {
    validate_sample(samples.high, 1)?;
    validate_sample(samples.low, 1)?;
    config.validate()?;

    let estimate = mean(samples.high)? - mean(samples.low)?;

    tracing::debug!(
        n_high = samples.high.len(),
        n_low = samples.low.len(),
        iterations = config.iterations,
        seed = rng.seed(),
        "bootstrapping mean difference"
    );

    let mut diffs: Vec<f64> = (0..config.iterations)
        .map(|_| rng.resample_mean(samples.high) - rng.resample_mean(samples.low))
        .collect();

    let result = percentile_interval(&mut diffs, estimate, config, rng.seed());
    tracing::debug!(lower = result.lower, upper = result.upper, "bootstrap interval");
    Ok(result)
}

/// Percentile-bootstrap interval for the mean of a single sample.
///
/// ```
/// use trial_stats::confidence::{bootstrap_mean_ci, BootstrapConfig};
///
/// let data = [4.1, 5.3, 4.8, 5.0, 4.6, 5.2];
/// let ci = bootstrap_mean_ci(&data, &BootstrapConfig::default().with_iterations(1_000)).unwrap();
/// assert!(ci.lower >= 4.1 && ci.upper <= 5.3);
/// ```
pub fn bootstrap_mean_ci(sample: &[f64], config: &BootstrapConfig) -> Result<BootstrapCIResult> {
    validate_sample(sample, 1)?;
    config.validate()?;

    let estimate = mean(sample)?;
    let mut rng = RandomSource::from_seed(config.seed);

    tracing::debug!(
        n = sample.len(),
        iterations = config.iterations,
        seed = config.seed,
        "bootstrapping mean"
    );

    let mut means: Vec<f64> = (0..config.iterations)
        .map(|_| rng.resample_mean(sample))
        .collect();

    Ok(percentile_interval(&mut means, estimate, config, config.seed))
}

/// Sorts the bootstrap distribution and reads off the alpha/2 and
/// 1 − alpha/2 quantiles.
fn percentile_interval(
    distribution: &mut [f64],
    estimate: f64,
    config: &BootstrapConfig,
    seed: u64,
) -> BootstrapCIResult {
    distribution.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let half_alpha = config.alpha / 2.0;
    BootstrapCIResult {
        lower: quantile_sorted(distribution, half_alpha),
        upper: quantile_sorted(distribution, 1.0 - half_alpha),
        estimate,
        alpha: config.alpha,
        method: BootstrapMethod::Percentile,
        iterations: config.iterations,
        seed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    // -----------------------------------------------------------------------
    // Wilson
    // -----------------------------------------------------------------------

    #[test]
    fn wilson_half_proportion() {
        let ci = proportion_ci(15, 30, 0.05).expect("should compute");
        assert_abs_diff_eq!((ci.lower + ci.upper) / 2.0, 0.5, epsilon = 1e-12);
        assert!(ci.lower > 0.3, "lower = {}", ci.lower);
        assert!(ci.upper < 0.7, "upper = {}", ci.upper);
        assert_eq!(ci.method, ProportionCiMethod::Wilson);
        assert_eq!(ci.alpha, 0.05);
    }

    #[test]
    fn wilson_reference_values() {
        // R: binom::binom.wilson(15, 30) -> 0.3315, 0.6685
        let ci = proportion_ci(15, 30, 0.05).expect("should compute");
        assert_abs_diff_eq!(ci.lower, 0.3315, epsilon = 1e-3);
        assert_abs_diff_eq!(ci.upper, 0.6685, epsilon = 1e-3);
    }

    #[test]
    fn wilson_extremes_do_not_collapse() {
        let zero = proportion_ci(0, 10, 0.05).expect("should compute");
        assert_eq!(zero.lower, 0.0);
        assert!(zero.upper > 0.2, "upper = {}", zero.upper);

        let all = proportion_ci(10, 10, 0.05).expect("should compute");
        assert_eq!(all.upper, 1.0);
        assert!(all.lower < 0.8, "lower = {}", all.lower);
    }

    #[test]
    fn wilson_narrower_at_higher_alpha() {
        let wide = proportion_ci(30, 100, 0.01).expect("wide");
        let narrow = proportion_ci(30, 100, 0.10).expect("narrow");
        assert!(narrow.upper - narrow.lower < wide.upper - wide.lower);
    }

    #[test]
    fn wilson_edge_cases() {
        assert!(matches!(
            proportion_ci(0, 0, 0.05),
            Err(StatsError::InvalidProportion(_))
        ));
        assert!(matches!(
            proportion_ci(5, 4, 0.05),
            Err(StatsError::InvalidProportion(_))
        ));
        assert_eq!(proportion_ci(1, 4, 1.0), Err(StatsError::InvalidAlpha(1.0)));
    }

    // -----------------------------------------------------------------------
    // Bootstrap
    // -----------------------------------------------------------------------

    const HIGH: [f64; 8] = [12.1, 13.4, 11.8, 14.2, 12.9, 13.7, 12.5, 13.1];
    const LOW: [f64; 7] = [10.2, 9.8, 11.1, 10.5, 9.9, 10.8, 10.4];

    fn samples() -> BootstrapSamples<'static> {
        BootstrapSamples {
            high: &HIGH,
            low: &LOW,
        }
    }

    #[test]
    fn bootstrap_reproducible() {
        let config = BootstrapConfig::default().with_seed(1234).with_iterations(2_000);
        let first = bootstrap_mean_difference_ci(&samples(), &config).expect("first");
        let second = bootstrap_mean_difference_ci(&samples(), &config).expect("second");
        assert_eq!(first.lower.to_bits(), second.lower.to_bits());
        assert_eq!(first.upper.to_bits(), second.upper.to_bits());
        assert_eq!(first, second);
    }

    #[test]
    fn bootstrap_seed_changes_bounds() {
        let a = bootstrap_mean_difference_ci(
            &samples(),
            &BootstrapConfig::default().with_seed(1).with_iterations(500),
        )
        .expect("a");
        let b = bootstrap_mean_difference_ci(
            &samples(),
            &BootstrapConfig::default().with_seed(2).with_iterations(500),
        )
        .expect("b");
        assert!(a.lower != b.lower || a.upper != b.upper);
    }

    #[test]
    fn bootstrap_interval_brackets_estimate() {
        let config = BootstrapConfig::default().with_seed(7);
        let ci = bootstrap_mean_difference_ci(&samples(), &config).expect("should compute");
        assert!(ci.lower <= ci.upper);
        assert!(ci.lower < ci.estimate && ci.estimate < ci.upper);
        assert!(ci.lower > 0.0, "clear separation, lower = {}", ci.lower);
        assert_eq!(ci.iterations, DEFAULT_BOOTSTRAP_ITERATIONS);
        assert_eq!(ci.seed, 7);
        assert_eq!(ci.method, BootstrapMethod::Percentile);
        assert_eq!(ci.alpha, DEFAULT_ALPHA);
    }

    #[test]
    fn bootstrap_default_config_is_deterministic() {
        let a = bootstrap_mean_difference_ci(&samples(), &BootstrapConfig::default()).expect("a");
        let b = bootstrap_mean_difference_ci(&samples(), &BootstrapConfig::default()).expect("b");
        assert_eq!(a, b);
        assert_eq!(a.seed, DEFAULT_BOOTSTRAP_SEED);
    }

    #[test]
    fn bootstrap_constant_samples_collapse() {
        let s = BootstrapSamples {
            high: &[5.0, 5.0, 5.0],
            low: &[2.0, 2.0],
        };
        let ci = bootstrap_mean_difference_ci(&s, &BootstrapConfig::default().with_iterations(100))
            .expect("should compute");
        assert_eq!(ci.lower, 3.0);
        assert_eq!(ci.upper, 3.0);
    }

    #[test]
    fn bootstrap_single_observations_allowed() {
        let s = BootstrapSamples {
            high: &[4.0],
            low: &[1.0],
        };
        let ci = bootstrap_mean_difference_ci(&s, &BootstrapConfig::default().with_iterations(10))
            .expect("should compute");
        assert_eq!((ci.lower, ci.upper), (3.0, 3.0));
    }

    #[test]
    fn bootstrap_with_shared_source_advances() {
        let config = BootstrapConfig::default().with_iterations(300);
        let mut rng = RandomSource::from_seed(99);
        let first = bootstrap_mean_difference_ci_with(&samples(), &config, &mut rng).expect("first");
        let second = bootstrap_mean_difference_ci_with(&samples(), &config, &mut rng).expect("second");
        assert_eq!(first.seed, 99);
        assert_eq!(second.seed, 99);
        assert!(first.lower != second.lower || first.upper != second.upper);

        // A fresh source with the same seed replays the first run.
        let replay = bootstrap_mean_difference_ci_with(
            &samples(),
            &config,
            &mut RandomSource::from_seed(99),
        )
        .expect("replay");
        assert_eq!(first, replay);
    }

    #[test]
    fn bootstrap_edge_cases() {
        let config = BootstrapConfig::default().with_iterations(10);
        let empty = BootstrapSamples {
            high: &[],
            low: &[1.0],
        };
        assert_eq!(
            bootstrap_mean_difference_ci(&empty, &config),
            Err(StatsError::InsufficientData { needed: 1, got: 0 })
        );
        assert_eq!(
            bootstrap_mean_difference_ci(&samples(), &config.with_iterations(0)),
            Err(StatsError::InvalidIterations)
        );
        assert_eq!(
            bootstrap_mean_difference_ci(&samples(), &config.with_alpha(0.0)),
            Err(StatsError::InvalidAlpha(0.0))
        );
        let nan = BootstrapSamples {
            high: &[1.0],
            low: &[f64::NAN],
        };
        assert_eq!(
            bootstrap_mean_difference_ci(&nan, &config),
            Err(StatsError::NonFiniteValue { index: 0 })
        );
    }

    #[test]
    fn bootstrap_mean_ci_brackets_mean() {
        let config = BootstrapConfig::default().with_seed(3).with_iterations(2_000);
        let ci = bootstrap_mean_ci(&HIGH, &config).expect("should compute");
        assert!(ci.lower < ci.estimate && ci.estimate < ci.upper);
        assert!(ci.lower >= 11.8 && ci.upper <= 14.2);
        assert_eq!(ci, bootstrap_mean_ci(&HIGH, &config).expect("replay"));
    }

    #[test]
    fn bootstrap_wider_at_lower_alpha() {
        let base = BootstrapConfig::default().with_seed(5).with_iterations(4_000);
        let ci90 = bootstrap_mean_difference_ci(&samples(), &base.with_alpha(0.10)).expect("90");
        let ci99 = bootstrap_mean_difference_ci(&samples(), &base.with_alpha(0.01)).expect("99");
        assert!(ci99.upper - ci99.lower >= ci90.upper - ci90.lower);
    }
}
