//! Backing Memory.
//!
//! This module implements the memory that terminates every cache chain. It provides:
//! 1. **Sparse Store:** Byte-addressed contents kept in an ordered map; unset bytes read 0.
//! 2. **Program Image:** One slot per word address holding an instruction, or nothing for data.
//! 3. **Counters:** Separate instruction-fetch and data-access counts for timing.
//! 4. **Display:** Listings of non-zero bytes and words for a viewer.

use std::collections::BTreeMap;

use crate::common::constants::{MEMORY_MAX_BYTES, MEMORY_MIN_BYTES, WORD_BYTES};
use crate::common::data::{bytes_to_word, word_to_bytes};
use crate::common::error::{ConfigError, StorageError};
use crate::config::MemoryConfig;
use crate::isa::instruction::Instruction;
use crate::soc::traits::Storage;

/// Backing memory with its instruction image.
#[derive(Clone, Debug)]
pub struct Memory {
    capacity: u32,
    access_time: u64,
    bytes: BTreeMap<u32, u8>,
    image: Vec<Option<Instruction>>,
    instruction_accesses: u64,
    data_accesses: u64,
}

impl Memory {
    /// Creates an empty memory.
    ///
    /// # Arguments
    ///
    /// * `config` - Capacity (a power of two in [128 B, 4 MiB]) and access time.
    pub fn new(config: &MemoryConfig) -> Result<Self, ConfigError> {
        let capacity = config.capacity;
        if !(MEMORY_MIN_BYTES..=MEMORY_MAX_BYTES).contains(&capacity) || !capacity.is_power_of_two()
        {
            return Err(ConfigError::MemoryCapacity(capacity));
        }
        Ok(Self {
            capacity,
            access_time: config.access_time,
            bytes: BTreeMap::new(),
            image: Vec::new(),
            instruction_accesses: 0,
            data_accesses: 0,
        })
    }

    /// Capacity in bytes.
    pub const fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Time charged per access.
    pub const fn access_time(&self) -> u64 {
        self.access_time
    }

    /// Number of instruction fetches served.
    pub const fn instruction_accesses(&self) -> u64 {
        self.instruction_accesses
    }

    /// Number of data reads and writes served.
    pub const fn data_accesses(&self) -> u64 {
        self.data_accesses
    }

    fn check(&self, address: i64) -> Result<u32, StorageError> {
        u32::try_from(address)
            .ok()
            .filter(|a| *a < self.capacity)
            .ok_or(StorageError::InvalidAddress(address))
    }

    /// Validates a word address: in range and even.
    pub fn check_word(&self, address: i64) -> Result<u32, StorageError> {
        let checked = self.check(address)?;
        if checked % WORD_BYTES != 0 {
            return Err(StorageError::MisalignedWord(address));
        }
        self.check(address + 1)?;
        Ok(checked)
    }

    /// Reads one byte without counting an access.
    pub fn read_byte(&self, address: u32) -> Result<u8, StorageError> {
        let address = self.check(i64::from(address))?;
        Ok(self.bytes.get(&address).copied().unwrap_or(0))
    }

    /// Writes one byte without counting an access.
    pub fn write_byte(&mut self, address: u32, value: u8) -> Result<(), StorageError> {
        let address = self.check(i64::from(address))?;
        let _ = self.bytes.insert(address, value);
        Ok(())
    }

    /// Reads a big-endian word without counting an access.
    pub fn read_word(&self, address: u32) -> Result<u16, StorageError> {
        let address = self.check_word(i64::from(address))?;
        Ok(bytes_to_word([
            self.read_byte(address)?,
            self.read_byte(address + 1)?,
        ]))
    }

    /// Writes a big-endian word without counting an access.
    pub fn write_word(&mut self, address: u32, value: u16) -> Result<(), StorageError> {
        let address = self.check_word(i64::from(address))?;
        let [high, low] = word_to_bytes(value);
        self.write_byte(address, high)?;
        self.write_byte(address + 1, low)
    }

    /// Claims the image slot at `address` for data, growing the image as needed.
    pub fn reserve(&mut self, address: u32) -> Result<(), StorageError> {
        let index = self.slot_index(address)?;
        if self.image.len() <= index {
            self.image.resize(index + 1, None);
        }
        Ok(())
    }

    /// Places an instruction in the image slot at its address.
    pub fn load_instruction(&mut self, instr: Instruction) -> Result<(), StorageError> {
        let index = self.slot_index(instr.address)?;
        self.reserve(instr.address)?;
        self.image[index] = Some(instr);
        Ok(())
    }

    fn slot_index(&self, address: u32) -> Result<usize, StorageError> {
        if address.saturating_add(WORD_BYTES) > self.capacity {
            return Err(StorageError::ProgramTooLarge {
                capacity: self.capacity,
            });
        }
        Ok((address / WORD_BYTES) as usize)
    }

    /// Instruction at `address` without counting an access.
    pub fn instruction(&self, address: u32) -> Result<&Instruction, StorageError> {
        let address = self.check_word(i64::from(address))?;
        self.image
            .get((address / WORD_BYTES) as usize)
            .and_then(Option::as_ref)
            .ok_or(StorageError::NoInstruction(address))
    }

    /// Fetches the instruction at `address`, counting one instruction access.
    pub fn fetch_instruction(&mut self, address: u32) -> Result<Instruction, StorageError> {
        let instr = self.instruction(address)?.clone();
        self.instruction_accesses += 1;
        Ok(instr)
    }

    /// Whether the image holds at least one instruction.
    pub fn has_instructions(&self) -> bool {
        self.image.iter().any(Option::is_some)
    }

    /// Address of the last slot holding an instruction.
    pub fn last_instruction_address(&self) -> Option<u32> {
        self.image
            .iter()
            .rposition(Option::is_some)
            .map(|index| index as u32 * WORD_BYTES)
    }

    /// Instructions in address order.
    pub fn instructions(&self) -> impl Iterator<Item = &Instruction> {
        self.image.iter().flatten()
    }

    /// Image slots in address order; data slots are `None`.
    pub fn slots(&self) -> &[Option<Instruction>] {
        &self.image
    }

    /// Non-zero bytes in address order.
    pub fn bytes(&self) -> Vec<(u32, u8)> {
        self.bytes
            .iter()
            .filter(|(_, value)| **value != 0)
            .map(|(address, value)| (*address, *value))
            .collect()
    }

    /// Non-zero words in address order.
    pub fn words(&self) -> Vec<(u32, u16)> {
        let mut words: Vec<(u32, u16)> = Vec::new();
        for address in self.bytes.keys().map(|a| a & !1) {
            if words.last().is_some_and(|(last, _)| *last == address) {
                continue;
            }
            let word = self.read_word(address).unwrap_or(0);
            if word != 0 {
                words.push((address, word));
            }
        }
        words
    }
}

impl Storage for Memory {
    fn read(&mut self, address: u32, buf: &mut [u8]) -> Result<(), StorageError> {
        let end = i64::from(address) + buf.len() as i64 - 1;
        let _ = self.check(end.max(i64::from(address)))?;
        for (offset, byte) in (address..).zip(buf.iter_mut()) {
            *byte = self.read_byte(offset)?;
        }
        self.data_accesses += 1;
        Ok(())
    }

    fn write(&mut self, address: u32, data: &[u8]) -> Result<(), StorageError> {
        let end = i64::from(address) + data.len() as i64 - 1;
        let _ = self.check(end.max(i64::from(address)))?;
        for (offset, byte) in (address..).zip(data) {
            self.write_byte(offset, *byte)?;
        }
        self.data_accesses += 1;
        Ok(())
    }

    fn clear(&mut self) {
        self.bytes.clear();
        self.image.clear();
        self.instruction_accesses = 0;
        self.data_accesses = 0;
    }
}
