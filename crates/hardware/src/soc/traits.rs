//! Storage trait for the data-access path.
//!
//! This module defines the `Storage` trait implemented by every component a data access
//! can reach. It provides:
//! 1. **Access:** Multi-byte read and write at a byte address, failing on invalid addresses.
//! 2. **Lifecycle:** `clear` to drop contents and counters on reset.
//!
//! Implementors are backing [`Memory`](crate::soc::memory::Memory) and
//! [`CacheChain`](crate::core::units::cache::CacheChain), a cache level together with
//! everything beneath it.

use crate::common::error::StorageError;

/// A byte-addressed storage component.
pub trait Storage {
    /// Reads `buf.len()` bytes starting at `address`.
    ///
    /// Counts as one access of this component.
    fn read(&mut self, address: u32, buf: &mut [u8]) -> Result<(), StorageError>;

    /// Writes `data` starting at `address`.
    ///
    /// Counts as one access of this component.
    fn write(&mut self, address: u32, data: &[u8]) -> Result<(), StorageError>;

    /// Drops all contents and zeroes counters.
    fn clear(&mut self);
}
