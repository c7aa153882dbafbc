//! Least Recently Used (LRU) replacement.
//!
//! Each way carries the time of its last use, taken from a per-policy counter.
//! The victim is the way with the oldest stamp. Fresh sets are stamped so that the
//! highest-numbered way is the oldest.

use super::ReplacementPolicy;

/// LRU state: one last-use stamp per way, row-major by set.
#[derive(Clone, Debug)]
pub struct LruPolicy {
    stamps: Vec<u64>,
    ways: usize,
    clock: u64,
}

impl LruPolicy {
    /// Creates LRU state for `sets` sets of `ways` ways.
    pub fn new(sets: usize, ways: usize) -> Self {
        let mut policy = Self {
            stamps: vec![0; sets * ways],
            ways,
            clock: 0,
        };
        policy.reset();
        policy
    }

    fn set_stamps(&self, set: usize) -> &[u64] {
        &self.stamps[set * self.ways..(set + 1) * self.ways]
    }
}

impl ReplacementPolicy for LruPolicy {
    fn update(&mut self, set: usize, way: usize) {
        self.stamps[set * self.ways + way] = self.clock;
        self.clock += 1;
    }

    fn get_victim(&mut self, set: usize) -> usize {
        self.set_stamps(set)
            .iter()
            .enumerate()
            .min_by_key(|&(_, stamp)| *stamp)
            .map_or(0, |(way, _)| way)
    }

    fn reset(&mut self) {
        let ways = self.ways as u64;
        for (slot, stamp) in self.stamps.iter_mut().enumerate() {
            *stamp = ways - 1 - (slot % self.ways) as u64;
        }
        self.clock = ways;
    }
}
