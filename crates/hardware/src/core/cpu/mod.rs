//! Processor Definition and Initialization.
//!
//! This module defines the central `Processor` structure, which owns the entire machine
//! state. It coordinates the following:
//! 1. **State Management:** Registers, program counter and change tracking.
//! 2. **Memory Hierarchy:** Backing memory, the instruction cache and the data-cache chain.
//! 3. **Observability:** The execution-order tracker, symbol table and access-time totals.

/// Fetch/decode/execute loop.
pub mod execution;

/// Data-access helpers and timing totals.
pub mod memory;

pub use self::execution::Step;

use crate::asm::context::SymbolTable;
use crate::common::error::ConfigError;
use crate::common::reg::{Register, RegisterFile};
use crate::config::Config;
use crate::core::units::cache::{DataCache, InstructionCache};
use crate::soc::memory::Memory;
use crate::soc::traits::Storage;
use crate::stats::UnitSet;

/// The RiSC-16 processor and everything it owns.
#[derive(Debug)]
pub struct Processor {
    regs: RegisterFile,
    memory: Memory,
    icache: InstructionCache,
    dcache: Vec<DataCache>,
    units: UnitSet,
    symbols: SymbolTable,
    config: Config,
}

impl Processor {
    /// Builds a processor from a configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Memory, caches, units, assembler and execution options.
    ///
    /// # Returns
    ///
    /// A cleared processor, or the first configuration problem found.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;
        let dcache = config
            .data_caches
            .iter()
            .enumerate()
            .map(|(level, cfg)| DataCache::new(format!("L{}D", level + 1), cfg))
            .collect();

        Ok(Self {
            regs: RegisterFile::new(),
            memory: Memory::new(&config.memory)?,
            icache: InstructionCache::new(&config.instruction_cache),
            dcache,
            units: UnitSet::new(config.units.clone()),
            symbols: SymbolTable::default(),
            config: config.clone(),
        })
    }

    /// Configuration the processor was built from.
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Register file.
    pub const fn registers(&self) -> &RegisterFile {
        &self.regs
    }

    /// Mutable register file, for presetting values or acknowledging changes.
    pub const fn registers_mut(&mut self) -> &mut RegisterFile {
        &mut self.regs
    }

    /// Backing memory and program image.
    pub const fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Mutable backing memory.
    pub(crate) const fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }

    /// Instruction cache.
    pub const fn instruction_cache(&self) -> &InstructionCache {
        &self.icache
    }

    /// Data-cache level `level` (0 is nearest the processor).
    pub fn data_cache(&self, level: usize) -> Option<&DataCache> {
        self.dcache.get(level)
    }

    /// All data-cache levels, nearest first.
    pub fn data_caches(&self) -> &[DataCache] {
        &self.dcache
    }

    /// Execution-order tracker.
    pub const fn units(&self) -> &UnitSet {
        &self.units
    }

    /// Symbol table of the last successful assembly.
    pub const fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub(crate) fn set_symbols(&mut self, symbols: SymbolTable) {
        self.symbols = symbols;
    }

    /// Reads a register.
    pub fn read_reg(&self, reg: Register) -> u16 {
        self.regs.read(reg)
    }

    /// Writes a register; writes to `r0` are dropped and flagged.
    pub fn write_reg(&mut self, reg: Register, value: u16) {
        self.regs.write(reg, value);
    }

    /// Program counter.
    pub const fn pc(&self) -> u32 {
        self.regs.pc()
    }

    /// Sets the program counter.
    pub const fn set_pc(&mut self, pc: u32) {
        self.regs.set_pc(pc);
    }

    /// Resets registers, PC, memory, image, caches, counters, symbols and the execution log.
    pub fn clear(&mut self) {
        self.regs.clear();
        self.memory.clear();
        self.icache.clear();
        for level in &mut self.dcache {
            level.clear();
        }
        self.units.clear();
        self.symbols = SymbolTable::default();
    }
}
