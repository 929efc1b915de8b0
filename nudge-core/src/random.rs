//! Random source seam for task selection.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Yields uniform samples in `[0, 1)`.
pub trait RandomSource {
    fn next_f64(&mut self) -> f64;
}

/// Thread-local RNG; the default for interactive use.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_f64(&mut self) -> f64 {
        rand::thread_rng().r#gen::<f64>()
    }
}

/// Reproducible sequence from a fixed seed.
#[derive(Debug, Clone)]
pub struct SeededRandom(StdRng);

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl RandomSource for SeededRandom {
    fn next_f64(&mut self) -> f64 {
        self.0.r#gen::<f64>()
    }
}

/// Plays back fixed samples, repeating the last one. For tests and demos.
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    samples: Vec<f64>,
    pos: usize,
}

impl ScriptedRandom {
    pub fn new(samples: impl Into<Vec<f64>>) -> Self {
        Self {
            samples: samples.into(),
            pos: 0,
        }
    }

    pub fn constant(sample: f64) -> Self {
        Self::new(vec![sample])
    }
}

impl RandomSource for ScriptedRandom {
    fn next_f64(&mut self) -> f64 {
        let Some(last) = self.samples.len().checked_sub(1) else {
            return 0.0;
        };
        let s = self.samples[self.pos.min(last)];
        self.pos += 1;
        s
    }
}

/// `floor(sample * n)`, kept inside `0..n`. `None` when `n == 0`.
pub fn pick_index(rng: &mut impl RandomSource, n: usize) -> Option<usize> {
    if n == 0 {
        return None;
    }
    let sample = rng.next_f64().clamp(0.0, 1.0);
    let idx = (sample * n as f64).floor() as usize;
    Some(idx.min(n - 1))
}
