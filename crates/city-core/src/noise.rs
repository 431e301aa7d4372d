//! Injectable randomness for the fluctuation engine.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Source of the perturbations applied on every tick.
pub trait NoiseSource: Send {
    /// Uniform draw in `[-range, range)`. A non-positive range yields `0.0`.
    fn offset(&mut self, range: f64) -> f64;

    /// Uniform integer draw in `[low, high)`. An empty range yields `low`.
    fn step(&mut self, low: i64, high: i64) -> i64;
}

/// Noise backed by any `rand` generator.
#[derive(Debug, Clone)]
pub struct RngNoise<R> {
    rng: R,
}

impl<R> RngNoise<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngNoise<SmallRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(SmallRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(SmallRng::from_entropy())
    }
}

impl<R: Rng + Send> NoiseSource for RngNoise<R> {
    fn offset(&mut self, range: f64) -> f64 {
        if !range.is_finite() || range <= 0.0 {
            return 0.0;
        }
        self.rng.gen_range(-range..range)
    }

    fn step(&mut self, low: i64, high: i64) -> i64 {
        if high <= low {
            return low;
        }
        self.rng.gen_range(low..high)
    }
}

/// Replays a fixed script of draws, cycling when exhausted.
///
/// Offsets are fractions of the requested range (clamped to `[-1, 1]`), so a
/// script of `[1.0]` always pushes a metric by its full percent range.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptedNoise {
    fractions: Vec<f64>,
    steps: Vec<i64>,
    next_fraction: usize,
    next_step: usize,
}

impl ScriptedNoise {
    pub fn new(fractions: Vec<f64>, steps: Vec<i64>) -> Self {
        Self {
            fractions,
            steps,
            next_fraction: 0,
            next_step: 0,
        }
    }

    /// No perturbation at all: every offset and step is zero.
    pub fn still() -> Self {
        Self::constant(0.0, 0)
    }

    pub fn constant(fraction: f64, step: i64) -> Self {
        Self::new(vec![fraction], vec![step])
    }
}

impl NoiseSource for ScriptedNoise {
    fn offset(&mut self, range: f64) -> f64 {
        if self.fractions.is_empty() || range.is_nan() || range <= 0.0 {
            return 0.0;
        }
        let fraction = self.fractions[self.next_fraction % self.fractions.len()];
        self.next_fraction = self.next_fraction.wrapping_add(1);
        fraction.clamp(-1.0, 1.0) * range
    }

    fn step(&mut self, low: i64, high: i64) -> i64 {
        if self.steps.is_empty() || high <= low {
            return low;
        }
        let step = self.steps[self.next_step % self.steps.len()];
        self.next_step = self.next_step.wrapping_add(1);
        step.clamp(low, high - 1)
    }
}
