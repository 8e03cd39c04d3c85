//! Unit-interval random sources driving the simulation.
//!
//! The tick function takes its randomness as a parameter so a transition can
//! be replayed exactly: a seeded [`RngSource`] reproduces a whole run, and
//! [`FixedRandom`] / [`SequenceRandom`] pin individual draws in tests.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Largest value a source may return; draws live in `[0, 1)`.
pub const MAX_DRAW: f64 = 1.0 - f64::EPSILON;

/// A source of uniform draws in `[0, 1)`.
pub trait RandomSource {
    /// Next draw in `[0, 1)`.
    fn next_unit(&mut self) -> f64;
}

impl<T: RandomSource + ?Sized> RandomSource for &mut T {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

impl<T: RandomSource + ?Sized> RandomSource for Box<T> {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

/// Adapter from any [`rand::Rng`].
#[derive(Debug, Clone)]
pub struct RngSource<R>(R);

impl RngSource<StdRng> {
    /// Seeded from the operating system.
    pub fn from_os_rng() -> Self {
        Self(StdRng::from_os_rng())
    }

    /// Deterministic source for reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RngSource<R> {
    /// Wrap an existing generator.
    pub fn new(rng: R) -> Self {
        Self(rng)
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn next_unit(&mut self) -> f64 {
        self.0.random::<f64>()
    }
}

/// Returns the same draw forever.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedRandom(f64);

impl FixedRandom {
    /// Constant source; `value` is clamped into `[0, MAX_DRAW]`.
    pub fn new(value: f64) -> Self {
        Self(clamp_draw(value))
    }

    /// The draw this source returns.
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl RandomSource for FixedRandom {
    fn next_unit(&mut self) -> f64 {
        self.0
    }
}

/// Replays a list of draws, wrapping around at the end.
///
/// An empty list behaves like `FixedRandom::new(0.0)`.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceRandom {
    draws: Vec<f64>,
    cursor: usize,
}

impl SequenceRandom {
    /// Replay `draws` in order; each is clamped into `[0, MAX_DRAW]`.
    pub fn new(draws: impl IntoIterator<Item = f64>) -> Self {
        Self {
            draws: draws.into_iter().map(clamp_draw).collect(),
            cursor: 0,
        }
    }

    /// Number of draws consumed so far.
    pub fn consumed(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for SequenceRandom {
    fn next_unit(&mut self) -> f64 {
        let len = self.draws.len();
        if len == 0 {
            self.cursor = self.cursor.saturating_add(1);
            return 0.0;
        }
        let draw = self.draws.get(self.cursor % len).copied().unwrap_or(0.0);
        self.cursor = self.cursor.saturating_add(1);
        draw
    }
}

fn clamp_draw(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.max(0.0).min(MAX_DRAW)
}
