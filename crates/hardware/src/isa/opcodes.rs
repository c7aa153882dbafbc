//! RiSC-16 Opcodes.
//!
//! Defines the eight operations, their 3-bit major opcodes (bits 15-13) and the
//! instruction format each one is encoded in.

use std::fmt;

use crate::isa::instruction::{Category, OperandKind};

/// Operand signature of RRR-format instructions (`add`, `nand`).
const RRR: &[OperandKind] = &[
    OperandKind::Register,
    OperandKind::Register,
    OperandKind::Register,
];

/// Operand signature of RRI-format instructions (`addi`, `lw`, `sw`, `beq`).
const RRI: &[OperandKind] = &[
    OperandKind::Register,
    OperandKind::Register,
    OperandKind::Integer,
];

/// Operand signature of RI-format instructions (`lui`).
const RI: &[OperandKind] = &[OperandKind::Register, OperandKind::Integer];

/// Operand signature of `jalr`, an RRI encoding with an implicit zero immediate.
const RR: &[OperandKind] = &[OperandKind::Register, OperandKind::Register];

/// Encoding layout of an instruction word.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    /// `op rA rB 0000 rC`
    Rrr,
    /// `op rA rB simm7`
    Rri,
    /// `op rA imm10`
    Ri,
}

/// One of the eight RiSC-16 operations.
///
/// The discriminant is the 3-bit major opcode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Opcode {
    /// Add registers.
    Add = 0,
    /// Add signed immediate.
    Addi = 1,
    /// Bitwise NAND of registers.
    Nand = 2,
    /// Load upper immediate.
    Lui = 3,
    /// Store word.
    Sw = 4,
    /// Load word.
    Lw = 5,
    /// Branch if equal.
    Beq = 6,
    /// Jump and link through register.
    Jalr = 7,
}

impl Opcode {
    /// All opcodes in encoding order.
    pub const ALL: [Self; 8] = [
        Self::Add,
        Self::Addi,
        Self::Nand,
        Self::Lui,
        Self::Sw,
        Self::Lw,
        Self::Beq,
        Self::Jalr,
    ];

    /// Assembly mnemonic.
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Addi => "addi",
            Self::Nand => "nand",
            Self::Lui => "lui",
            Self::Sw => "sw",
            Self::Lw => "lw",
            Self::Beq => "beq",
            Self::Jalr => "jalr",
        }
    }

    /// Looks an opcode up by its (lower-case) mnemonic.
    pub fn from_mnemonic(mnemonic: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.mnemonic() == mnemonic)
    }

    /// Major opcode bits (0-7).
    pub const fn bits(self) -> u16 {
        self as u16
    }

    /// Opcode for the low three bits of `bits`.
    pub const fn from_bits(bits: u16) -> Self {
        Self::ALL[(bits & 0x7) as usize]
    }

    /// Encoding layout.
    pub const fn format(self) -> Format {
        match self {
            Self::Add | Self::Nand => Format::Rrr,
            Self::Lui => Format::Ri,
            Self::Addi | Self::Sw | Self::Lw | Self::Beq | Self::Jalr => Format::Rri,
        }
    }

    /// Ordered operand kinds the assembler expects.
    pub const fn signature(self) -> &'static [OperandKind] {
        match self {
            Self::Add | Self::Nand => RRR,
            Self::Addi | Self::Sw | Self::Lw | Self::Beq => RRI,
            Self::Lui => RI,
            Self::Jalr => RR,
        }
    }

    /// Whether a non-numeric immediate is accepted as a label reference.
    pub const fn accepts_label(self) -> bool {
        matches!(self, Self::Beq | Self::Lw | Self::Sw)
    }

    /// Functional-unit category the instruction executes on.
    pub const fn category(self) -> Category {
        match self {
            Self::Add | Self::Addi => Category::Add,
            Self::Nand => Category::Alu,
            Self::Lui | Self::Lw => Category::Load,
            Self::Sw => Category::Store,
            Self::Beq => Category::Branch,
            Self::Jalr => Category::JumpAndLink,
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}
