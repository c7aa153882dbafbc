//! Pseudo-instructions.
//!
//! Each pseudo-instruction expands at assembly time into one or two real instructions,
//! which then go through the same operand checks as hand-written ones:
//!
//! | pseudo          | expansion                                          |
//! |-----------------|----------------------------------------------------|
//! | `nop`           | `add r0, r0, r0`                                   |
//! | `halt`          | `jalr r0, r0`                                      |
//! | `lli rX, imm`   | `addi rX, rX, imm & 0x3f`                          |
//! | `movi rX, imm`  | `lui rX, imm >> 6` then `addi rX, rX, imm & 0x3f`  |

use crate::common::constants::{LOW_IMM_MASK, UPPER_IMM_SHIFT, WORD_IMM_MAX};
use crate::common::error::AsmErrorKind;
use crate::asm::parse::parse_integer;
use crate::isa::opcodes::Opcode;

/// A pseudo-instruction mnemonic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pseudo {
    /// No operation.
    Nop,
    /// Stop execution.
    Halt,
    /// Load the low six bits of an immediate.
    Lli,
    /// Load a full 16-bit immediate.
    Movi,
}

/// One real instruction produced by an expansion, with operands still as text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expansion {
    /// Real opcode.
    pub opcode: Opcode,
    /// Operand tokens.
    pub operands: Vec<String>,
}

impl Expansion {
    fn new(opcode: Opcode, operands: &[&str]) -> Self {
        Self {
            opcode,
            operands: operands.iter().map(ToString::to_string).collect(),
        }
    }
}

impl Pseudo {
    /// Looks a pseudo-instruction up by mnemonic.
    pub fn from_mnemonic(mnemonic: &str) -> Option<Self> {
        match mnemonic {
            "nop" => Some(Self::Nop),
            "halt" => Some(Self::Halt),
            "lli" => Some(Self::Lli),
            "movi" => Some(Self::Movi),
            _ => None,
        }
    }

    /// Mnemonic as written.
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Nop => "nop",
            Self::Halt => "halt",
            Self::Lli => "lli",
            Self::Movi => "movi",
        }
    }

    /// Number of operands taken.
    pub const fn arity(self) -> usize {
        match self {
            Self::Nop | Self::Halt => 0,
            Self::Lli | Self::Movi => 2,
        }
    }

    /// Expands into real instructions.
    ///
    /// The operand count is checked first; `movi` also range-checks its immediate.
    pub fn expand(self, operands: &[&str]) -> Result<Vec<Expansion>, AsmErrorKind> {
        if operands.len() != self.arity() {
            return Err(AsmErrorKind::OperandCount {
                operation: self.mnemonic().to_string(),
                expected: self.arity(),
                found: operands.len(),
            });
        }

        let expansion = match self {
            Self::Nop => vec![Expansion::new(Opcode::Add, &["r0", "r0", "r0"])],
            Self::Halt => vec![Expansion::new(Opcode::Jalr, &["r0", "r0"])],
            Self::Lli => {
                let reg = operands[0];
                let low = (parse_integer(operands[1])? & LOW_IMM_MASK).to_string();
                vec![Expansion::new(Opcode::Addi, &[reg, reg, &low])]
            }
            Self::Movi => {
                let reg = operands[0];
                let imm = parse_integer(operands[1])?;
                if !(0..=WORD_IMM_MAX).contains(&imm) {
                    return Err(AsmErrorKind::WordImmediateRange(imm));
                }
                let high = (imm >> UPPER_IMM_SHIFT).to_string();
                let low = (imm & LOW_IMM_MASK).to_string();
                vec![
                    Expansion::new(Opcode::Lui, &[reg, &high]),
                    Expansion::new(Opcode::Addi, &[reg, reg, &low]),
                ]
            }
        };
        Ok(expansion)
    }
}
