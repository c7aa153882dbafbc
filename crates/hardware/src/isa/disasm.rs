//! Instruction Disassembler for RiSC-16.
//!
//! Converts a 16-bit machine word into assembly text for listings, logging and
//! test diagnostics.
//!
//! # Usage
//!
//! ```
//! use risc16_core::isa::disasm::disassemble;
//! assert_eq!(disassemble(0x0503), "add r1, r2, r3");
//! assert_eq!(disassemble(0xE000), "jalr r0, r0");
//! ```

use crate::isa::encoding::decode;

/// Disassembles a machine word.
///
/// Branch and load/store immediates are printed as raw numbers; no label
/// information survives encoding.
pub fn disassemble(word: u16) -> String {
    decode(word, 0).to_string()
}
