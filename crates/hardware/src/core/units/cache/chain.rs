//! Cache Chains.
//!
//! A [`CacheChain`] borrows a run of data-cache levels, nearest first, together with
//! the backing memory beneath them. It implements [`Storage`] by handing the access to
//! the first level with the rest of the chain as that level's next level, so a miss
//! propagates down one level at a time and ends at memory.

use super::DataCache;
use crate::common::error::StorageError;
use crate::soc::memory::Memory;
use crate::soc::traits::Storage;

/// Data-cache levels over memory.
#[derive(Debug)]
pub struct CacheChain<'a> {
    levels: &'a mut [DataCache],
    memory: &'a mut Memory,
}

impl<'a> CacheChain<'a> {
    /// Borrows `levels` (nearest first) over `memory`.
    pub const fn new(levels: &'a mut [DataCache], memory: &'a mut Memory) -> Self {
        Self { levels, memory }
    }

    /// Writes every dirty line of every level down the chain, nearest level first.
    pub fn flush(&mut self) -> Result<(), StorageError> {
        let Self { levels, memory } = self;
        for index in 0..levels.len() {
            let (upper, lower) = levels.split_at_mut(index + 1);
            if let Some(level) = upper.last_mut() {
                level.flush(&mut CacheChain::new(lower, memory))?;
            }
        }
        Ok(())
    }
}

impl Storage for CacheChain<'_> {
    fn read(&mut self, address: u32, buf: &mut [u8]) -> Result<(), StorageError> {
        let Self { levels, memory } = self;
        match levels.split_first_mut() {
            Some((level, rest)) => level.read(address, buf, &mut CacheChain::new(rest, memory)),
            None => memory.read(address, buf),
        }
    }

    fn write(&mut self, address: u32, data: &[u8]) -> Result<(), StorageError> {
        let Self { levels, memory } = self;
        match levels.split_first_mut() {
            Some((level, rest)) => level.write(address, data, &mut CacheChain::new(rest, memory)),
            None => memory.write(address, data),
        }
    }

    fn clear(&mut self) {
        for level in self.levels.iter_mut() {
            level.clear();
        }
        self.memory.clear();
    }
}
