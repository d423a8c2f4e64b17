//! Randomness source for stage parameter draws.
//!
//! Every stochastic decision in the pipeline routes through the [`Sampler`]
//! trait instead of reaching into ambient RNG state. Stages take a
//! `&mut dyn Sampler`, so production code can hand them a thread RNG while
//! tests pass a seeded [`rand::rngs::StdRng`] and get byte-identical output
//! for the same seed.

use rand::Rng;

/// Uniform scalar and choice draws for stage parameters.
///
/// All intervals are closed. A degenerate interval (lo >= hi) returns `lo`
/// rather than panicking, so callers can feed clamped ranges straight in.
pub trait Sampler {
    /// Uniform draw from the closed interval `[lo, hi]`.
    fn uniform(&mut self, lo: f32, hi: f32) -> f32;

    /// Uniform integer draw from `[lo, hi]` inclusive.
    fn uniform_u32(&mut self, lo: u32, hi: u32) -> u32;

    /// Bernoulli trial: true with probability `p` (clamped to [0, 1]).
    fn chance(&mut self, p: f32) -> bool;

    /// Uniform index into a collection of `len` items. `len` must be > 0.
    fn pick_index(&mut self, len: usize) -> usize;

    /// Zero-mean Gaussian draw with standard deviation `sigma`.
    ///
    /// Uses the Box-Muller transform over two uniform draws, so seeded
    /// samplers stay deterministic without a separate distribution source.
    fn gauss(&mut self, sigma: f32) -> f32 {
        let u1 = self.uniform(f32::EPSILON, 1.0);
        let u2 = self.uniform(0.0, 1.0);
        (-2.0 * u1.ln()).sqrt() * (std::f32::consts::TAU * u2).cos() * sigma
    }
}

impl<R: Rng> Sampler for R {
    fn uniform(&mut self, lo: f32, hi: f32) -> f32 {
        if lo >= hi {
            return lo;
        }
        self.gen_range(lo..=hi)
    }

    fn uniform_u32(&mut self, lo: u32, hi: u32) -> u32 {
        if lo >= hi {
            return lo;
        }
        self.gen_range(lo..=hi)
    }

    fn chance(&mut self, p: f32) -> bool {
        if p <= 0.0 {
            false
        } else if p >= 1.0 {
            true
        } else {
            self.gen_bool(p as f64)
        }
    }

    fn pick_index(&mut self, len: usize) -> usize {
        self.gen_range(0..len)
    }
}
