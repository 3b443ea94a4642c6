//! Hypothesis testing.
//!
//! Between-condition tests: Welch's unequal-variance t-test, the chi-squared
//! test of independence on an r×c contingency table, and the two-proportion
//! z-test, plus multiple-comparison corrections for reports that compare
//! many conditions at once.
//!
//! p-values come from the exact Student-t, chi-squared, and standard normal
//! CDFs; there is no large-df normal shortcut.
//!
//! # Examples
//!
//! ```
//! use trial_stats::testing::welch_t_test_two_sided;
//!
//! let a = [5.1, 4.9, 5.2, 5.0, 4.8];
//! let b = [7.1, 6.9, 7.2, 7.0, 6.8];
//! let r = welch_t_test_two_sided(&a, &b).unwrap();
//! assert!(r.p_two_sided < 0.01); // means clearly differ
//! ```

use u_numflow::special;

use crate::descriptive::{mean, sample_variance, validate_sample};
use crate::error::{Result, StatsError};

/// Result of Welch's two-sample t-test.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WelchTTestResult {
    /// t statistic for x̄ₐ − x̄_b.
    pub t: f64,
    /// Welch–Satterthwaite degrees of freedom (generally fractional).
    pub df: f64,
    /// Two-sided p-value.
    pub p_two_sided: f64,
    /// x̄ₐ − x̄_b.
    pub mean_difference: f64,
}

/// Result of a chi-squared test of independence.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChiSquareTestResult {
    /// χ² statistic.
    pub chi_square: f64,
    /// Degrees of freedom, (rows − 1)(cols − 1).
    pub df: usize,
    /// Upper-tail p-value.
    pub p_value: f64,
}

/// Result of a two-proportion z-test.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProportionZTestResult {
    /// z statistic for p̂₁ − p̂₂.
    pub z: f64,
    /// Two-sided p-value.
    pub p_value: f64,
    /// Observed proportion x₁/n₁.
    pub p1: f64,
    /// Observed proportion x₂/n₂.
    pub p2: f64,
    /// Pooled proportion (x₁+x₂)/(n₁+n₂).
    pub pooled: f64,
}

// ---------------------------------------------------------------------------
// Welch t-test
// ---------------------------------------------------------------------------

/// Two-sample Welch t-test: H₀: μₐ = μ_b (unequal variances).
///
/// # Algorithm
///
/// t = (x̄ₐ − x̄_b) / √(s²ₐ/nₐ + s²_b/n_b)
/// df = (vₐ + v_b)² / (vₐ²/(nₐ−1) + v_b²/(n_b−1)), vᵢ = s²ᵢ/nᵢ
/// p = 2·(1 − F_t(|t|; df))
///
/// # Errors
///
/// [`StatsError::InsufficientData`] if either sample has fewer than 2
/// observations, [`StatsError::DegenerateVariance`] if both samples are
/// constant (standard error zero).
///
/// # References
///
/// Welch (1947). "The generalization of Student's problem when several
/// different population variances are involved". Biometrika, 34, 28–35.
///
/// # Examples
///
/// ```
/// use trial_stats::testing::welch_t_test_two_sided;
///
/// let a = [1.0, 2.0, 3.0, 4.0, 5.0];
/// let b = [3.0, 4.0, 5.0, 6.0, 7.0];
/// let r = welch_t_test_two_sided(&a, &b).unwrap();
/// assert!((r.t + 2.0).abs() < 1e-12);
/// assert!((r.df - 8.0).abs() < 1e-12);
/// ```
pub fn welch_t_test_two_sided(a: &[f64], b: &[f64]) -> Result<WelchTTestResult> {
    validate_sample(a, 2)?;
    validate_sample(b, 2)?;

    let n1 = a.len() as f64;
    let n2 = b.len() as f64;
    let mean_difference = mean(a)? - mean(b)?;

    let v1 = sample_variance(a)? / n1;
    let v2 = sample_variance(b)? / n2;
    let se_sq = v1 + v2;
    if se_sq < 1e-300 {
        tracing::debug!(n_a = a.len(), n_b = b.len(), "both samples are constant");
        return Err(StatsError::DegenerateVariance(
            "standard error of the mean difference is zero",
        ));
    }

    let t = mean_difference / se_sq.sqrt();

    // Welch-Satterthwaite degrees of freedom
    let df = se_sq * se_sq / (v1 * v1 / (n1 - 1.0) + v2 * v2 / (n2 - 1.0));

    let p_two_sided = two_sided_t_p_value(t, df);

    Ok(WelchTTestResult {
        t,
        df,
        p_two_sided,
        mean_difference,
    })
}

fn two_sided_t_p_value(t: f64, df: f64) -> f64 {
    (2.0 * (1.0 - special::t_distribution_cdf(t.abs(), df))).clamp(0.0, 1.0)
}

// ---------------------------------------------------------------------------
// Chi-squared test of independence
// ---------------------------------------------------------------------------

/// Chi-squared test of independence on an r×c table of observed counts.
///
/// # Arguments
///
/// * `observed` — Rows of non-negative counts; every row must have the same
///   number of columns.
///
/// # Algorithm
///
/// Expected: Eᵢⱼ = (row_sumᵢ × col_sumⱼ) / N.
/// χ² = Σᵢⱼ (Oᵢⱼ − Eᵢⱼ)² / Eᵢⱼ, df = (r−1)(c−1), p = 1 − F_χ²(χ²; df).
///
/// # Errors
///
/// [`StatsError::InvalidContingencyTable`] if there are fewer than 2 rows
/// or columns, rows have differing lengths, or any row or column total is
/// zero (which would make an expected count zero).
///
/// # Examples
///
/// ```
/// use trial_stats::testing::chi_square_test;
///
/// let r = chi_square_test(&[[20u64, 10], [10, 20]]).unwrap();
/// assert_eq!(r.df, 1);
/// assert!(r.p_value < 0.05);
/// ```
pub fn chi_square_test<R: AsRef<[u64]>>(observed: &[R]) -> Result<ChiSquareTestResult> {
    let n_rows = observed.len();
    if n_rows < 2 {
        return Err(StatsError::InvalidContingencyTable(format!(
            "need at least 2 rows, got {n_rows}"
        )));
    }
    let n_cols = observed[0].as_ref().len();
    if n_cols < 2 {
        return Err(StatsError::InvalidContingencyTable(format!(
            "need at least 2 columns, got {n_cols}"
        )));
    }
    if let Some(i) = observed.iter().position(|row| row.as_ref().len() != n_cols) {
        return Err(StatsError::InvalidContingencyTable(format!(
            "row {i} has {} columns, expected {n_cols}",
            observed[i].as_ref().len()
        )));
    }

    // Row sums and column sums
    let mut row_sums = vec![0.0; n_rows];
    let mut col_sums = vec![0.0; n_cols];
    let mut total = 0.0;

    for (i, row) in observed.iter().enumerate() {
        for (j, &count) in row.as_ref().iter().enumerate() {
            let val = count as f64;
            row_sums[i] += val;
            col_sums[j] += val;
            total += val;
        }
    }

    if let Some(i) = row_sums.iter().position(|&r| r <= 0.0) {
        tracing::debug!(row = i, "contingency table has an empty row");
        return Err(StatsError::InvalidContingencyTable(format!(
            "row {i} total is zero"
        )));
    }
    if let Some(j) = col_sums.iter().position(|&c| c <= 0.0) {
        tracing::debug!(column = j, "contingency table has an empty column");
        return Err(StatsError::InvalidContingencyTable(format!(
            "column {j} total is zero"
        )));
    }

    let mut chi_square = 0.0;
    for (i, row) in observed.iter().enumerate() {
        for (j, &count) in row.as_ref().iter().enumerate() {
            let expected = row_sums[i] * col_sums[j] / total;
            chi_square += (count as f64 - expected).powi(2) / expected;
        }
    }

    let df = (n_rows - 1) * (n_cols - 1);
    let p_value = (1.0 - special::chi_squared_cdf(chi_square, df as f64)).clamp(0.0, 1.0);

    Ok(ChiSquareTestResult {
        chi_square,
        df,
        p_value,
    })
}

// ---------------------------------------------------------------------------
// Two-proportion z-test
// ---------------------------------------------------------------------------

/// Two-proportion z-test: H₀: p₁ = p₂, using the pooled standard error.
///
/// # Algorithm
///
/// p = (x₁+x₂)/(n₁+n₂), SE = √(p(1−p)(1/n₁ + 1/n₂)),
/// z = (x₁/n₁ − x₂/n₂)/SE, p-value = 2·(1 − Φ(|z|)).
///
/// # Errors
///
/// [`StatsError::InvalidProportion`] if n₁ or n₂ is zero, a success count
/// exceeds its trial count, or the pooled proportion is exactly 0 or 1
/// (standard error collapses to zero).
///
/// # Examples
///
/// ```
/// use trial_stats::testing::proportion_z_test;
///
/// let r = proportion_z_test(45, 100, 30, 100).unwrap();
/// assert!((r.z * r.z - 4.8).abs() < 1e-9);
/// assert!(r.p_value < 0.05);
/// ```
pub fn proportion_z_test(x1: u64, n1: u64, x2: u64, n2: u64) -> Result<ProportionZTestResult> {
    if n1 == 0 || n2 == 0 {
        return Err(StatsError::InvalidProportion(format!(
            "trial counts must be positive, got n1 = {n1}, n2 = {n2}"
        )));
    }
    if x1 > n1 || x2 > n2 {
        return Err(StatsError::InvalidProportion(format!(
            "successes exceed trials: {x1}/{n1}, {x2}/{n2}"
        )));
    }

    // Totals can exceed u64::MAX.
    let x_total = u128::from(x1) + u128::from(x2);
    let n_total = u128::from(n1) + u128::from(n2);
    let pooled = x_total as f64 / n_total as f64;
    if x_total == 0 || x_total == n_total {
        tracing::debug!(pooled, "pooled proportion at boundary");
        return Err(StatsError::InvalidProportion(format!(
            "pooled proportion is {pooled}; standard error is zero"
        )));
    }

    let n1f = n1 as f64;
    let n2f = n2 as f64;
    let p1 = x1 as f64 / n1f;
    let p2 = x2 as f64 / n2f;
    let se = (pooled * (1.0 - pooled) * (1.0 / n1f + 1.0 / n2f)).sqrt();
    let z = (p1 - p2) / se;
    let p_value = (2.0 * (1.0 - special::standard_normal_cdf(z.abs()))).clamp(0.0, 1.0);

    Ok(ProportionZTestResult {
        z,
        p_value,
        p1,
        p2,
        pooled,
    })
}

// ---------------------------------------------------------------------------
// Multiple comparison correction
// ---------------------------------------------------------------------------

fn validate_p_values(p_values: &[f64]) -> Result<()> {
    if p_values.is_empty() {
        return Err(StatsError::InsufficientData { needed: 1, got: 0 });
    }
    if let Some(index) = p_values.iter().position(|v| !v.is_finite()) {
        return Err(StatsError::NonFiniteValue { index });
    }
    if let Some(&p) = p_values.iter().find(|&&p| !(0.0..=1.0).contains(&p)) {
        return Err(StatsError::InvalidProportion(format!(
            "p-value {p} outside [0, 1]"
        )));
    }
    Ok(())
}

/// Bonferroni correction: adjusts p-values for multiple comparisons.
///
/// adjusted_pᵢ = min(pᵢ × m, 1.0) where m = number of tests.
///
/// # Errors
///
/// Empty input, non-finite values, or values outside [0, 1].
pub fn bonferroni_correction(p_values: &[f64]) -> Result<Vec<f64>> {
    validate_p_values(p_values)?;
    let m = p_values.len() as f64;
    Ok(p_values.iter().map(|&p| (p * m).min(1.0)).collect())
}

/// Benjamini-Hochberg FDR correction.
///
/// # Algorithm
///
/// 1. Sort p-values.
/// 2. For rank i (1-indexed): adjusted_pᵢ = pᵢ × m / i.
/// 3. Enforce monotonicity (cumulative minimum from right).
///
/// Adjusted values are returned in the input order.
///
/// # References
///
/// Benjamini & Hochberg (1995). "Controlling the false discovery rate".
/// JRSS-B, 57(1), 289–300.
pub fn benjamini_hochberg(p_values: &[f64]) -> Result<Vec<f64>> {
    validate_p_values(p_values)?;
    let m = p_values.len();

    let mut indices: Vec<usize> = (0..m).collect();
    indices.sort_by(|&a, &b| {
        p_values[a]
            .partial_cmp(&p_values[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mf = m as f64;
    let mut adjusted = vec![0.0; m];

    let mut cummin = f64::INFINITY;
    for (rank_rev, &orig_idx) in indices.iter().enumerate().rev() {
        let rank = rank_rev + 1; // 1-indexed
        let adj = (p_values[orig_idx] * mf / rank as f64).min(1.0);
        cummin = cummin.min(adj);
        adjusted[orig_idx] = cummin;
    }

    Ok(adjusted)
}
