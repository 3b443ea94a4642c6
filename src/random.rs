//! Seedable random source for resampling.
//!
//! Bootstrap intervals must be reproducible: the same seed, iteration count,
//! and input produce bit-identical bounds on every platform. The source wraps
//! a ChaCha8 stream and draws indices through `u64` so the sequence does not
//! depend on the target's pointer width.
//!
//! A `RandomSource` is an owned value. Each bootstrap call either builds a
//! fresh one from its configured seed or borrows one mutably from the caller,
//! so parallel callers never share generator state.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Deterministic pseudo-random generator used by the bootstrap routines.
///
/// # Examples
///
/// ```
/// use trial_stats::random::RandomSource;
///
/// let a = RandomSource::from_seed(7);
/// assert_eq!(a.seed(), 7);
/// ```
#[derive(Debug, Clone)]
pub struct RandomSource {
    seed: u64,
    rng: ChaCha8Rng,
}

impl RandomSource {
    /// Creates a source positioned at the start of the stream for `seed`.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Seed this source was created from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Next raw 64-bit value from the stream.
    pub fn next_u64(&mut self) -> u64 {
        self.rng.gen()
    }

    /// Uniform index in `0..len`. `len` must be non-zero.
    pub(crate) fn index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        self.rng.gen_range(0..len as u64) as usize
    }

    /// Mean of one resample drawn with replacement, same size as `sample`.
    pub(crate) fn resample_mean(&mut self, sample: &[f64]) -> f64 {
        let n = sample.len();
        let mut sum = 0.0;
        for _ in 0..n {
            sum += sample[self.index(n)];
        }
        sum / n as f64
    }
}
