//! Set-Associative Cache Simulator.
//!
//! This module implements the caches that sit between the processor and backing memory.
//! It provides:
//! 1. **Tag Store:** Set/way bookkeeping shared by both cache kinds, with pluggable replacement.
//! 2. **Data Caches:** Levels that hold line data and apply write-hit and write-miss policies.
//! 3. **Instruction Cache:** A tag-only level in front of the program image.
//! 4. **Chains:** A data-cache level together with everything beneath it, usable as [`Storage`].
//!
//! [`Storage`]: crate::soc::traits::Storage

/// Cache chains over data-cache levels and memory.
pub mod chain;

/// Data-cache levels.
pub mod data;

/// Instruction cache.
pub mod instruction;

/// Cache replacement policy implementations (LRU, FIFO, Random).
pub mod policies;

pub use chain::CacheChain;
pub use data::DataCache;
pub use instruction::InstructionCache;

use self::policies::ReplacementPolicy;
use crate::config::CacheGeometry;

/// Hit/miss counters of one cache level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups performed.
    pub accesses: u64,
    /// Lookups that found the line.
    pub hits: u64,
    /// Lookups that did not.
    pub misses: u64,
    /// Dirty lines written to the next level.
    pub writebacks: u64,
}

impl CacheStats {
    /// Fraction of accesses that hit, or 0 before the first access.
    pub fn hit_rate(&self) -> f64 {
        if self.accesses == 0 {
            0.0
        } else {
            self.hits as f64 / self.accesses as f64
        }
    }
}

/// Cache line entry containing tag, validity, and dirty bits.
#[derive(Clone, Copy, Debug, Default)]
struct CacheLine {
    tag: u32,
    valid: bool,
    dirty: bool,
}

/// A line displaced by a fill.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Evicted {
    /// Base address of the displaced line.
    pub address: u32,
    /// Whether the line held unwritten data.
    pub dirty: bool,
}

/// Set/way bookkeeping for one cache level.
///
/// Lines live in a flat vector indexed by `set * ways + way`.
#[derive(Debug)]
pub struct TagStore {
    lines: Vec<CacheLine>,
    sets: usize,
    ways: usize,
    line_bytes: u32,
    policy: Box<dyn ReplacementPolicy>,
}

impl TagStore {
    /// Creates an empty tag store.
    ///
    /// # Arguments
    ///
    /// * `geometry` - Line size, set count, associativity and replacement policy.
    ///   Validated geometry is expected; zero values are raised to one.
    pub fn new(geometry: &CacheGeometry) -> Self {
        let sets = geometry.sets.max(1) as usize;
        let ways = geometry.ways.max(1) as usize;
        Self {
            lines: vec![CacheLine::default(); sets * ways],
            sets,
            ways,
            line_bytes: geometry.line_bytes.max(1),
            policy: policies::build(geometry.policy, sets, ways),
        }
    }

    /// Line size in bytes.
    pub const fn line_bytes(&self) -> u32 {
        self.line_bytes
    }

    /// Number of sets.
    pub const fn sets(&self) -> usize {
        self.sets
    }

    /// Associativity.
    pub const fn ways(&self) -> usize {
        self.ways
    }

    /// Base address of the line containing `address`.
    pub const fn line_base(&self, address: u32) -> u32 {
        address - address % self.line_bytes
    }

    /// Set index and tag for `address`.
    pub const fn locate(&self, address: u32) -> (usize, u32) {
        let line = address / self.line_bytes;
        ((line as usize) % self.sets, line / self.sets as u32)
    }

    /// Flat slot index of `(set, way)`.
    pub const fn slot(&self, set: usize, way: usize) -> usize {
        set * self.ways + way
    }

    /// Looks `address` up; on a hit, records the access with the policy and returns the way.
    pub fn probe(&mut self, address: u32) -> Option<usize> {
        let (set, tag) = self.locate(address);
        let base = self.slot(set, 0);
        let way = self.lines[base..base + self.ways]
            .iter()
            .position(|line| line.valid && line.tag == tag)?;
        self.policy.update(set, way);
        Some(way)
    }

    /// Chooses the way a fill of `address` will use: an invalid way if there is one,
    /// otherwise the replacement policy's victim.
    pub fn victim(&mut self, address: u32) -> usize {
        let (set, _) = self.locate(address);
        let base = self.slot(set, 0);
        self.lines[base..base + self.ways]
            .iter()
            .position(|line| !line.valid)
            .unwrap_or_else(|| self.policy.get_victim(set) % self.ways)
    }

    /// Installs the line for `address` in `way`, returning the line it displaced.
    pub fn install(&mut self, address: u32, way: usize) -> Option<Evicted> {
        let (set, tag) = self.locate(address);
        let slot = self.slot(set, way);
        let old = self.lines[slot];
        self.lines[slot] = CacheLine {
            tag,
            valid: true,
            dirty: false,
        };
        self.policy.fill(set, way);

        old.valid.then(|| Evicted {
            address: (old.tag * self.sets as u32 + set as u32) * self.line_bytes,
            dirty: old.dirty,
        })
    }

    /// Marks the line in `(set, way)` dirty.
    pub fn mark_dirty(&mut self, set: usize, way: usize) {
        let slot = self.slot(set, way);
        self.lines[slot].dirty = true;
    }

    /// Base addresses and slots of every valid dirty line, clearing their dirty bits.
    pub fn take_dirty(&mut self) -> Vec<(u32, usize)> {
        let mut dirty = Vec::new();
        for (slot, line) in self.lines.iter_mut().enumerate() {
            if line.valid && line.dirty {
                line.dirty = false;
                let set = (slot / self.ways) as u32;
                dirty.push(((line.tag * self.sets as u32 + set) * self.line_bytes, slot));
            }
        }
        dirty
    }

    /// Number of valid lines.
    pub fn valid_lines(&self) -> usize {
        self.lines.iter().filter(|line| line.valid).count()
    }

    /// Whether the line holding `address` is present and dirty, without touching the policy.
    pub fn is_dirty(&self, address: u32) -> bool {
        let (set, tag) = self.locate(address);
        let base = self.slot(set, 0);
        self.lines[base..base + self.ways]
            .iter()
            .any(|line| line.valid && line.tag == tag && line.dirty)
    }

    /// Invalidates every line and resets the policy.
    pub fn clear(&mut self) {
        self.lines.fill(CacheLine::default());
        self.policy.reset();
    }
}
