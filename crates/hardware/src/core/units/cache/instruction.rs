//! Instruction Cache.
//!
//! A tag-only set-associative level in front of the program image. It shares the
//! tag store and replacement policies of the data caches but holds no data: a hit is
//! served from the image without touching memory, a miss fetches from memory
//! (counting one instruction access there) and installs the tag.

use super::{CacheStats, TagStore};
use crate::common::error::StorageError;
use crate::config::CacheGeometry;
use crate::isa::instruction::Instruction;
use crate::soc::memory::Memory;

/// The instruction cache.
#[derive(Debug)]
pub struct InstructionCache {
    tags: TagStore,
    access_time: u64,
    stats: CacheStats,
}

impl InstructionCache {
    /// Creates an empty instruction cache from validated geometry.
    pub fn new(geometry: &CacheGeometry) -> Self {
        Self {
            tags: TagStore::new(geometry),
            access_time: geometry.access_time,
            stats: CacheStats::default(),
        }
    }

    /// Time charged per access.
    pub const fn access_time(&self) -> u64 {
        self.access_time
    }

    /// Hit/miss counters.
    pub const fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Fetches the instruction at `address`.
    ///
    /// The address is validated against memory before any counter moves.
    pub fn fetch(&mut self, address: u32, memory: &mut Memory) -> Result<Instruction, StorageError> {
        let _ = memory.instruction(address)?;

        self.stats.accesses += 1;
        if self.tags.probe(address).is_some() {
            self.stats.hits += 1;
            return memory.instruction(address).cloned();
        }

        self.stats.misses += 1;
        let instr = memory.fetch_instruction(address)?;
        let way = self.tags.victim(address);
        let _ = self.tags.install(address, way);
        Ok(instr)
    }

    /// Drops every line and zeroes the counters.
    pub fn clear(&mut self) {
        self.tags.clear();
        self.stats = CacheStats::default();
    }
}
