//! Data Access Helpers.
//!
//! This module provides the interface between load/store handlers and the storage
//! hierarchy. It performs the following:
//! 1. **Address Validation:** Range and alignment checks before any cache is touched.
//! 2. **Chain Traversal:** Word reads and writes through the data-cache chain down to memory.
//! 3. **Latency Modeling:** Access-time totals for the data path and the fetch path.

use super::Processor;
use crate::common::data::{bytes_to_word, word_to_bytes};
use crate::common::error::StorageError;
use crate::core::units::cache::CacheChain;
use crate::soc::traits::Storage;

impl Processor {
    /// Computes and validates a data effective address.
    ///
    /// # Arguments
    ///
    /// * `base` - Base register value, interpreted as signed.
    /// * `offset` - Byte offset to add.
    ///
    /// # Returns
    ///
    /// The word-aligned, in-range address, or `InvalidAddress` / `MisalignedWord`.
    pub fn effective_address(&self, base: u16, offset: i64) -> Result<u32, StorageError> {
        let ea = i64::from(base as i16) + offset;
        self.memory.check_word(ea)
    }

    fn chain(&mut self) -> CacheChain<'_> {
        CacheChain::new(&mut self.dcache, &mut self.memory)
    }

    /// Loads a word through the data-cache chain.
    pub fn load_word(&mut self, address: u32) -> Result<u16, StorageError> {
        let address = self.memory.check_word(i64::from(address))?;
        let mut buf = [0; 2];
        self.chain().read(address, &mut buf)?;
        Ok(bytes_to_word(buf))
    }

    /// Stores a word through the data-cache chain.
    pub fn store_word(&mut self, address: u32, value: u16) -> Result<(), StorageError> {
        let address = self.memory.check_word(i64::from(address))?;
        self.chain().write(address, &word_to_bytes(value))
    }

    /// Writes every dirty data-cache line back to memory.
    pub fn flush(&mut self) -> Result<(), StorageError> {
        self.chain().flush()
    }

    /// Total time spent on data accesses so far.
    ///
    /// Sum over data-cache levels of accesses times access time, plus memory data
    /// accesses times memory access time.
    pub fn data_access_time(&self) -> u64 {
        let caches: u64 = self
            .dcache
            .iter()
            .map(|level| level.stats().accesses * level.access_time())
            .sum();
        caches + self.memory.data_accesses() * self.memory.access_time()
    }

    /// Total time spent on instruction fetches so far.
    pub fn instruction_access_time(&self) -> u64 {
        self.icache.stats().accesses * self.icache.access_time()
            + self.memory.instruction_accesses() * self.memory.access_time()
    }
}
