//! Shared pseudo-random source for combat draws.
//!
//! Every random decision in the core (state durations, extra actions, target
//! draws, enemy action choice, drops) goes through [`RandomSource`], so a
//! driver can swap in a seeded generator for replays and tests.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Uniform random draws.
pub trait RandomSource {
    /// Uniform float in `[0, 1)`.
    fn next_f64(&mut self) -> f64;

    /// Uniform integer in `[0, max)`; returns 0 when `max` is 0.
    fn random_int(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        let value = (self.next_f64() * f64::from(max)).floor() as u32;
        value.min(max - 1)
    }

    /// True with probability `chance` (0.0–1.0).
    fn chance(&mut self, chance: f64) -> bool {
        self.next_f64() < chance
    }
}

/// ChaCha-backed generator.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
}

impl GameRng {
    /// Reproducible stream for replays and tests.
    pub fn seeded(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            inner: ChaCha8Rng::from_entropy(),
        }
    }
}

impl RandomSource for GameRng {
    fn next_f64(&mut self) -> f64 {
        self.inner.r#gen::<f64>()
    }

    fn random_int(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        self.inner.gen_range(0..max)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_f64(&mut self) -> f64 {
        (**self).next_f64()
    }

    fn random_int(&mut self, max: u32) -> u32 {
        (**self).random_int(max)
    }
}
