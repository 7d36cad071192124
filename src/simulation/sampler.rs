use rand::Rng;
use rand::distributions::{Distribution, Standard};

use crate::task::{Task, ThreePointEstimate};

/// Triangular distribution over `[low, high]` peaking at `mode`, sampled by
/// inverse CDF from one uniform draw.
///
/// Parameters are not checked. Every sample consumes exactly one draw from the
/// generator, including the degenerate `low == high` case, so the stream
/// position never depends on parameter values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangular {
    low: f64,
    mode: f64,
    high: f64,
}

impl Triangular {
    pub fn new(low: f64, mode: f64, high: f64) -> Self {
        Self { low, mode, high }
    }
}

impl From<&ThreePointEstimate> for Triangular {
    fn from(estimate: &ThreePointEstimate) -> Self {
        Self::new(estimate.optimistic, estimate.likely, estimate.pessimistic)
    }
}

impl Distribution<f64> for Triangular {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let u: f64 = rng.sample(Standard);
        let base = self.high - self.low;
        if base == 0.0 {
            return self.low;
        }
        let left = self.mode - self.low;
        if u <= left / base {
            self.low + (u * left * base).sqrt()
        } else {
            self.high - ((1.0 - u) * (self.high - self.mode) * base).sqrt()
        }
    }
}

/// One trial's duration for `task`: a triangular draw when a three-point
/// estimate is present, otherwise the fixed duration (no draw consumed).
pub fn sample_duration<R: Rng + ?Sized>(task: &Task, rng: &mut R) -> f64 {
    match task.estimate() {
        Some(estimate) => Triangular::from(estimate).sample(rng),
        None => task.duration_days(),
    }
}
