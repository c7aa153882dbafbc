//! Instruction Set Architecture (ISA) Definitions.
//!
//! Contains the closed RiSC-16 instruction set, its operand signatures, the
//! execution handlers, and conversion to and from machine words.
//!
//! # Modules
//!
//! * `opcodes`: The eight operations, their formats and signatures.
//! * `instruction`: Instruction records, operands, categories and annotations.
//! * `set`: The dispatch table mapping each opcode to its handler.
//! * `encoding`: Machine-word encoding and decoding.
//! * `disasm`: Disassembly of machine words.

/// Instruction disassembler for listings and diagnostics.
pub mod disasm;

/// Machine-word encoding and decoding.
pub mod encoding;

/// Instruction records, operands and annotations.
pub mod instruction;

/// Opcode definitions, formats and operand signatures.
pub mod opcodes;

/// Instruction dispatch table and execution handlers.
pub mod set;

pub use instruction::{Annotation, Category, Instruction, Operand, OperandKind};
pub use opcodes::Opcode;
pub use set::{Handler, INSTRUCTION_SET};
