//! Injectable uniform random sources.
//!
//! Every shuffle in the engine goes through [`RandomSource`], so a table
//! built with [`source_for_seed`]`(Some(seed))` replays the exact same card
//! sequence hand after hand.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Uniform generator over `[0, 1)`.
///
/// Implementations are allowed to be sloppy at the edges; consumers clamp
/// with [`unit_to_index`].
pub trait RandomSource: Send {
    fn next_f64(&mut self) -> f64;
}

/// Map a unit-interval sample onto `0..len`, clamping values at or above 1,
/// below 0, and NaN so the index is always in bounds.
pub fn unit_to_index(r: f64, len: usize) -> usize {
    debug_assert!(len > 0);
    if !(r >= 0.0) {
        return 0;
    }
    if r >= 1.0 {
        return len - 1;
    }
    ((r * len as f64) as usize).min(len - 1)
}

/// Marsaglia xorshift32. Tiny, fast and fully reproducible from a seed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Xorshift32 {
    state: u32,
}

impl Xorshift32 {
    // xorshift has a fixed point at zero
    const ZERO_SEED_REPLACEMENT: u32 = 0x9E37_79B9;

    pub fn new(seed: u32) -> Self {
        let state = if seed == 0 {
            Self::ZERO_SEED_REPLACEMENT
        } else {
            seed
        };
        Self { state }
    }

    /// Fold a 64-bit seed into the 32-bit state.
    pub fn from_u64(seed: u64) -> Self {
        Self::new((seed ^ (seed >> 32)) as u32)
    }

    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }
}

impl RandomSource for Xorshift32 {
    fn next_f64(&mut self) -> f64 {
        self.next_u32() as f64 / (u32::MAX as f64 + 1.0)
    }
}

/// Non-reproducible source for unseeded tables.
#[derive(Debug, Clone)]
pub struct EntropySource {
    rng: ChaCha20Rng,
}

impl EntropySource {
    pub fn new() -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(rand::random()),
        }
    }
}

impl Default for EntropySource {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for EntropySource {
    fn next_f64(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}

/// Deterministic-seed switch: a seed yields a replayable [`Xorshift32`],
/// no seed yields an [`EntropySource`].
pub fn source_for_seed(seed: Option<u64>) -> Box<dyn RandomSource> {
    match seed {
        Some(s) => Box::new(Xorshift32::from_u64(s)),
        None => Box::new(EntropySource::new()),
    }
}
