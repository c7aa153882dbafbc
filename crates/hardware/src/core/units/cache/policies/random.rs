//! Pseudo-random replacement.
//!
//! Victims come from a 64-bit xorshift generator shared by all sets. The seed is
//! fixed and restored on reset, so a program always sees the same eviction sequence.

use super::ReplacementPolicy;

const SEED: u64 = 0x2545_F491_4F6C_DD1D;

/// Random replacement state.
#[derive(Clone, Debug)]
pub struct RandomPolicy {
    ways: usize,
    state: u64,
}

impl RandomPolicy {
    /// Creates a generator for a cache with `ways` ways; the set count is not needed.
    pub const fn new(_sets: usize, ways: usize) -> Self {
        Self { ways, state: SEED }
    }

    const fn next(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }
}

impl ReplacementPolicy for RandomPolicy {
    fn update(&mut self, _set: usize, _way: usize) {}

    fn get_victim(&mut self, _set: usize) -> usize {
        (self.next() % self.ways as u64) as usize
    }

    fn reset(&mut self) {
        self.state = SEED;
    }
}
