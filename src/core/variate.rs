use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Exp};

use super::errors::SimError;

/// Opaque source of independently drawn numeric values: inter-arrival
/// delays, service durations, and the like. The kernel treats the stream
/// as pure values with no visible side effects; determinism of a run
/// follows from determinism of the streams plugged into it.
pub trait Variate: Send {
    /// Draw the next value.
    fn next(&mut self) -> f64;
}

/// Exponentially distributed delays with the given mean, seeded for
/// reproducible runs.
pub struct Exponential {
    dist: Exp<f64>,
    rng: StdRng,
}

impl Exponential {
    pub fn new(mean: f64, seed: u64) -> Result<Self, SimError> {
        if mean <= 0.0 || !mean.is_finite() {
            return Err(SimError::InvalidVariate {
                reason: format!("exponential mean must be positive, got {}", mean),
            });
        }
        let dist = Exp::new(1.0 / mean).map_err(|e| SimError::InvalidVariate {
            reason: e.to_string(),
        })?;
        Ok(Self {
            dist,
            rng: StdRng::seed_from_u64(seed),
        })
    }
}

impl Variate for Exponential {
    fn next(&mut self) -> f64 {
        self.dist.sample(&mut self.rng)
    }
}

/// Uniformly distributed values in `[low, high)`, seeded.
pub struct UniformRange {
    low: f64,
    high: f64,
    rng: StdRng,
}

impl UniformRange {
    pub fn new(low: f64, high: f64, seed: u64) -> Result<Self, SimError> {
        if !(low < high) || low < 0.0 {
            return Err(SimError::InvalidVariate {
                reason: format!("uniform range [{}, {}) is not valid", low, high),
            });
        }
        Ok(Self {
            low,
            high,
            rng: StdRng::seed_from_u64(seed),
        })
    }
}

impl Variate for UniformRange {
    fn next(&mut self) -> f64 {
        self.rng.gen_range(self.low..self.high)
    }
}

/// Fixed value on every draw. Useful for deterministic tests and tableau
/// reproductions.
pub struct Constant(pub f64);

impl Variate for Constant {
    fn next(&mut self) -> f64 {
        self.0
    }
}

/// Replays a finite sequence of values, then repeats the last one.
/// Handy for driving a source through a known arrival pattern.
pub struct Sequence {
    values: Vec<f64>,
    cursor: usize,
}

impl Sequence {
    pub fn new(values: Vec<f64>) -> Result<Self, SimError> {
        if values.is_empty() {
            return Err(SimError::InvalidVariate {
                reason: "sequence variate needs at least one value".to_string(),
            });
        }
        Ok(Self { values, cursor: 0 })
    }
}

impl Variate for Sequence {
    fn next(&mut self) -> f64 {
        let value = self.values[self.cursor];
        if self.cursor + 1 < self.values.len() {
            self.cursor += 1;
        }
        value
    }
}
