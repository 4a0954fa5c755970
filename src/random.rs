// src/random.rs
//
// Random sources for RandomChoice patterns.

use std::fmt::Debug;

/// Picks uniformly distributed indices.
///
/// Injected into patterns so tests can script the choices.
pub trait RandomSource: Debug {
    /// Return an index in `0..n`. Callers guarantee `n > 0`.
    fn uniform_index(&mut self, n: usize) -> usize;

    /// Clone into a fresh box (patterns are cloned, never aliased).
    fn clone_box(&self) -> Box<dyn RandomSource>;
}

impl Clone for Box<dyn RandomSource> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Pseudorandom source backed by `oorandom`.
#[derive(Debug, Clone)]
pub struct Rng(oorandom::Rand64);

impl Default for Rng {
    fn default() -> Self {
        Self::new_with_seed(Self::generate_seed())
    }
}

impl Rng {
    /// Same seed, same stream.
    pub fn new_with_seed(seed: u128) -> Self {
        Self(oorandom::Rand64::new(seed))
    }

    /// Seed from OS entropy, falling back to a fixed seed if the OS facility
    /// is unavailable.
    pub fn generate_seed() -> u128 {
        let mut bytes = [0u8; 16];
        match getrandom::getrandom(&mut bytes) {
            Ok(()) => u128::from_be_bytes(bytes),
            Err(e) => {
                log::warn!("getrandom failed ({}), using fixed seed", e);
                0x5eed
            }
        }
    }
}

impl RandomSource for Rng {
    fn uniform_index(&mut self, n: usize) -> usize {
        self.0.rand_range(0..n as u64) as usize
    }

    fn clone_box(&self) -> Box<dyn RandomSource> {
        Box::new(self.clone())
    }
}

/// Replays a fixed list of indices, cycling when exhausted.
///
/// Indices are returned as given, even when out of range, so that faulty
/// sources can be simulated.
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    picks: Vec<usize>,
    position: usize,
}

impl ScriptedRandom {
    pub fn new(picks: Vec<usize>) -> Self {
        Self { picks, position: 0 }
    }
}

impl RandomSource for ScriptedRandom {
    fn uniform_index(&mut self, _n: usize) -> usize {
        if self.picks.is_empty() {
            return 0;
        }
        let pick = self.picks[self.position % self.picks.len()];
        self.position += 1;
        pick
    }

    fn clone_box(&self) -> Box<dyn RandomSource> {
        Box::new(self.clone())
    }
}
