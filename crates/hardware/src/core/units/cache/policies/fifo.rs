//! First-In, First-Out (FIFO) replacement.
//!
//! Every set keeps a pointer to the way that was filled longest ago. Hits leave it
//! alone; a fill advances it past the filled way, wrapping at the associativity.

use super::ReplacementPolicy;

/// FIFO state: the next way to evict, per set.
#[derive(Clone, Debug)]
pub struct FifoPolicy {
    oldest: Vec<usize>,
    ways: usize,
}

impl FifoPolicy {
    /// Creates FIFO state with every pointer at way 0.
    pub fn new(sets: usize, ways: usize) -> Self {
        Self {
            oldest: vec![0; sets],
            ways,
        }
    }
}

impl ReplacementPolicy for FifoPolicy {
    fn update(&mut self, _set: usize, _way: usize) {}

    fn fill(&mut self, set: usize, way: usize) {
        self.oldest[set] = (way + 1) % self.ways;
    }

    fn get_victim(&mut self, set: usize) -> usize {
        self.oldest[set]
    }

    fn reset(&mut self) {
        self.oldest.fill(0);
    }
}
