//! Sources of randomness for the generators.
//!
//! Every generator takes a `&mut dyn RandomSource` instead of reaching for a
//! global RNG, so tests and `--seed` runs can pin the output.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;

/// Uniform selection primitives used by all generators
pub trait RandomSource: fmt::Debug {
    /// Uniform index in `0..len`. `len` must be non-zero.
    fn next_index(&mut self, len: usize) -> usize;

    /// True with probability `p` (clamped to `0.0..=1.0`)
    fn chance(&mut self, p: f64) -> bool {
        let p = p.clamp(0.0, 1.0);
        const RESOLUTION: usize = 10_000;
        (self.next_index(RESOLUTION) as f64) < p * RESOLUTION as f64
    }

    /// Uniform integer in `low..=high`
    fn between(&mut self, low: usize, high: usize) -> usize {
        if high <= low {
            return low;
        }
        low + self.next_index(high - low + 1)
    }
}

/// Fisher-Yates shuffle driven by a `RandomSource`
pub fn shuffle<T>(rng: &mut dyn RandomSource, items: &mut [T]) {
    for i in (1..items.len()).rev() {
        let j = rng.next_index(i + 1);
        items.swap(i, j);
    }
}

/// Pick one element uniformly, `None` for an empty slice
pub fn pick<'a, T>(rng: &mut dyn RandomSource, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        None
    } else {
        Some(&items[rng.next_index(items.len())])
    }
}

/// Ambient thread-local RNG
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_index(&mut self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }

    fn chance(&mut self, p: f64) -> bool {
        rand::thread_rng().gen_bool(p.clamp(0.0, 1.0))
    }
}

/// Reproducible RNG seeded from a `u64`
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        SeededRandom {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }

    fn chance(&mut self, p: f64) -> bool {
        self.rng.gen_bool(p.clamp(0.0, 1.0))
    }
}

/// Replays a fixed list of indices, wrapping around at the end.
///
/// Each value is reduced modulo the requested `len`.
#[derive(Debug, Clone)]
pub struct FixedSequence {
    values: Vec<usize>,
    position: usize,
}

impl FixedSequence {
    pub fn new(values: Vec<usize>) -> Self {
        FixedSequence {
            values,
            position: 0,
        }
    }

    /// Always picks the first option
    pub fn zeros() -> Self {
        FixedSequence::new(vec![0])
    }
}

impl RandomSource for FixedSequence {
    fn next_index(&mut self, len: usize) -> usize {
        if self.values.is_empty() {
            return 0;
        }
        let value = self.values[self.position % self.values.len()];
        self.position += 1;
        value % len
    }
}

/// Boxed source from an optional seed
pub fn source_from_seed(seed: Option<u64>) -> Box<dyn RandomSource> {
    match seed {
        Some(seed) => Box::new(SeededRandom::new(seed)),
        None => Box::new(ThreadRandom),
    }
}
