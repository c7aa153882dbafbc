//! Data Cache Level.
//!
//! A set-associative level that holds line data and sits in front of another
//! [`Storage`] component. Each access is counted once per line it touches and then
//! resolved as follows:
//! 1. **Read Hit:** Data is served from the line.
//! 2. **Read Miss:** A victim way is chosen (invalid ways first); a dirty victim is written
//!    back to the next level; the line is filled from the next level and served.
//! 3. **Write Hit:** Write-back marks the line dirty; write-through also writes the next level.
//! 4. **Write Miss:** Write-allocate fills the line and proceeds as a hit; no-write-allocate
//!    forwards the write to the next level without allocating.

use tracing::trace;

use super::{CacheStats, TagStore};
use crate::common::error::StorageError;
use crate::config::{DataCacheConfig, WritePolicy};
use crate::soc::traits::Storage;

/// One data-cache level.
#[derive(Debug)]
pub struct DataCache {
    name: String,
    tags: TagStore,
    data: Vec<u8>,
    access_time: u64,
    hit_policy: WritePolicy,
    miss_policy: WritePolicy,
    stats: CacheStats,
}

impl DataCache {
    /// Creates an empty level.
    ///
    /// # Arguments
    ///
    /// * `name` - Label used in logs and displays (`L1D`, `L2D`, ...).
    /// * `config` - Geometry, timing and write policies, already validated.
    pub fn new(name: impl Into<String>, config: &DataCacheConfig) -> Self {
        let tags = TagStore::new(&config.geometry);
        let bytes = tags.sets() * tags.ways() * tags.line_bytes() as usize;
        Self {
            name: name.into(),
            tags,
            data: vec![0; bytes],
            access_time: config.geometry.access_time,
            hit_policy: config.hit_policy,
            miss_policy: config.miss_policy,
            stats: CacheStats::default(),
        }
    }

    /// Level name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Time charged per access.
    pub const fn access_time(&self) -> u64 {
        self.access_time
    }

    /// Hit/miss counters.
    pub const fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Write-hit policy.
    pub const fn hit_policy(&self) -> WritePolicy {
        self.hit_policy
    }

    /// Write-miss policy.
    pub const fn miss_policy(&self) -> WritePolicy {
        self.miss_policy
    }

    /// Line size in bytes.
    pub const fn line_bytes(&self) -> u32 {
        self.tags.line_bytes()
    }

    /// Number of valid lines.
    pub fn valid_lines(&self) -> usize {
        self.tags.valid_lines()
    }

    /// Whether the line holding `address` is cached and dirty.
    pub fn is_dirty(&self, address: u32) -> bool {
        self.tags.is_dirty(address)
    }

    /// Byte range of `(set, way)` within `data`.
    fn line_range(&self, set: usize, way: usize) -> std::ops::Range<usize> {
        let start = self.tags.slot(set, way) * self.tags.line_bytes() as usize;
        start..start + self.tags.line_bytes() as usize
    }

    /// Splits `[address, address + len)` into per-line chunks `(address, offset, len)`.
    fn chunks(&self, address: u32, len: usize) -> Vec<(u32, usize, usize)> {
        let line = self.tags.line_bytes() as usize;
        let mut chunks = Vec::new();
        let mut done = 0;
        while done < len {
            let current = address + done as u32;
            let offset = current as usize % line;
            let take = (line - offset).min(len - done);
            chunks.push((current, done, take));
            done += take;
        }
        chunks
    }

    /// Brings the line holding `address` into the cache, writing back a dirty victim first.
    fn allocate(&mut self, address: u32, next: &mut dyn Storage) -> Result<usize, StorageError> {
        let way = self.tags.victim(address);
        let (set, _) = self.tags.locate(address);
        let range = self.line_range(set, way);

        let evicted = self.tags.install(address, way);
        if let Some(victim) = evicted.filter(|v| v.dirty) {
            trace!(cache = %self.name, address = victim.address, "write back");
            next.write(victim.address, &self.data[range.clone()])?;
            self.stats.writebacks += 1;
        }

        let base = self.tags.line_base(address);
        next.read(base, &mut self.data[range])?;
        Ok(way)
    }

    /// Reads `buf.len()` bytes at `address`, going to `next` on misses.
    pub fn read(
        &mut self,
        address: u32,
        buf: &mut [u8],
        next: &mut dyn Storage,
    ) -> Result<(), StorageError> {
        for (current, done, take) in self.chunks(address, buf.len()) {
            self.stats.accesses += 1;
            let way = if let Some(way) = self.tags.probe(current) {
                self.stats.hits += 1;
                way
            } else {
                self.stats.misses += 1;
                self.allocate(current, next)?
            };
            let (set, _) = self.tags.locate(current);
            let start = self.line_range(set, way).start + current as usize % self.line_bytes() as usize;
            buf[done..done + take].copy_from_slice(&self.data[start..start + take]);
        }
        Ok(())
    }

    /// Writes `data` at `address` according to the write policies.
    pub fn write(
        &mut self,
        address: u32,
        data: &[u8],
        next: &mut dyn Storage,
    ) -> Result<(), StorageError> {
        for (current, done, take) in self.chunks(address, data.len()) {
            self.stats.accesses += 1;
            let chunk = &data[done..done + take];
            let way = if let Some(way) = self.tags.probe(current) {
                self.stats.hits += 1;
                way
            } else {
                self.stats.misses += 1;
                if self.miss_policy == WritePolicy::NoWriteAllocate {
                    next.write(current, chunk)?;
                    continue;
                }
                self.allocate(current, next)?
            };

            let (set, _) = self.tags.locate(current);
            let start = self.line_range(set, way).start + current as usize % self.line_bytes() as usize;
            self.data[start..start + take].copy_from_slice(chunk);
            if self.hit_policy == WritePolicy::WriteThrough {
                next.write(current, chunk)?;
            } else {
                self.tags.mark_dirty(set, way);
            }
        }
        Ok(())
    }

    /// Writes every dirty line to `next` and marks it clean.
    pub fn flush(&mut self, next: &mut dyn Storage) -> Result<(), StorageError> {
        let line = self.tags.line_bytes() as usize;
        for (address, slot) in self.tags.take_dirty() {
            let start = slot * line;
            next.write(address, &self.data[start..start + line])?;
            self.stats.writebacks += 1;
        }
        Ok(())
    }

    /// Drops every line and zeroes the counters.
    pub fn clear(&mut self) {
        self.tags.clear();
        self.data.fill(0);
        self.stats = CacheStats::default();
    }
}
