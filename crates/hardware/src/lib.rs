//! RiSC-16 assembler and processor simulator library.
//!
//! This crate implements an instructional RiSC-16 tool chain with the following:
//! 1. **Assembler:** Two-pass translation with labels, pseudo-instructions and data directives.
//! 2. **Core:** Register file, program counter and the fetch/execute loop with PC rollback.
//! 3. **Memory Hierarchy:** Byte-addressed memory, an instruction cache and a chain of
//!    data caches with configurable write and replacement policies.
//! 4. **ISA:** Opcodes, operand signatures, handlers, machine-word encoding and disassembly.
//! 5. **Statistics:** Per-level hit/miss counters, access-time totals and the
//!    execution-order tracker that assigns instructions to functional units.

/// Assembler (parsing, pseudo-instructions, symbol table, two-pass resolution).
pub mod asm;
/// Common types and constants (registers, errors, word helpers).
pub mod common;
/// Processor configuration (memory, caches, units, assembler and execution options).
pub mod config;
/// Processor core (architectural state, execution loop, caches).
pub mod core;
/// Instruction set (opcodes, instructions, handlers, encoding, disassembly).
pub mod isa;
/// Backing memory and the storage interface shared with the caches.
pub mod soc;
/// Execution-order tracking and functional-unit accounting.
pub mod stats;

/// Assembles source text into a processor; see [`asm::Assembler`] for options.
pub use crate::asm::{Assembler, assemble};
/// Umbrella error for callers driving the whole tool chain.
pub use crate::common::Error;
/// Root configuration type; use `Config::default()`, deserialize JSON, or build from tables.
pub use crate::config::Config;
/// The processor; construct with `Processor::new`.
pub use crate::core::{Processor, Step};
