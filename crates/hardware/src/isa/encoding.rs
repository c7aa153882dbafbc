//! RiSC-16 Machine-Word Encoding.
//!
//! This module converts between [`Instruction`] records and 16-bit machine words. It handles:
//! 1. **Field Packing:** Opcode in bits 15-13, `rA` in 12-10, `rB` in 9-7.
//! 2. **Formats:** RRR (`rC` in bits 2-0), RRI (signed 7-bit immediate), RI (10-bit immediate).
//! 3. **Range Checks:** Operands that do not fit their field are rejected rather than truncated.
//!
//! A pc-relative load/store keeps its word displacement in the immediate field; the
//! pc-relative flag itself is not part of the machine word.

use crate::common::error::EncodeError;
use crate::common::reg::Register;
use crate::isa::instruction::{Instruction, Operand};
use crate::isa::opcodes::{Format, Opcode};

/// Bit position of the major opcode.
const OPCODE_SHIFT: u16 = 13;

/// Bit position of `rA`.
const RA_SHIFT: u16 = 10;

/// Bit position of `rB`.
const RB_SHIFT: u16 = 7;

/// Mask for a 3-bit register field.
const REG_MASK: u16 = 0x7;

/// Width of the signed RRI immediate.
const SIMM_BITS: u32 = 7;

/// Mask for the signed RRI immediate.
const SIMM_MASK: u16 = 0x7F;

/// Width of the RI immediate.
const UIMM_BITS: u32 = 10;

/// Mask for the RI immediate.
const UIMM_MASK: u16 = 0x3FF;

fn reg_field(instr: &Instruction, index: usize) -> Result<u16, EncodeError> {
    instr
        .register(index)
        .map(|reg| reg.index() as u16 & REG_MASK)
        .ok_or(EncodeError::Unresolved(instr.mnemonic()))
}

fn imm_field(instr: &Instruction, index: usize) -> Result<i32, EncodeError> {
    instr
        .immediate(index)
        .ok_or(EncodeError::Unresolved(instr.mnemonic()))
}

/// Encodes an instruction into a machine word.
///
/// # Arguments
///
/// * `instr` - A resolved instruction.
///
/// # Returns
///
/// The 16-bit encoding, or an error when an operand is a label, has the wrong kind,
/// or does not fit its field (absolute load/store addresses above 63 do not).
pub fn encode(instr: &Instruction) -> Result<u16, EncodeError> {
    let op = instr.opcode.bits() << OPCODE_SHIFT;
    let ra = reg_field(instr, 0)? << RA_SHIFT;

    let word = match instr.opcode.format() {
        Format::Rrr => {
            let rb = reg_field(instr, 1)? << RB_SHIFT;
            op | ra | rb | reg_field(instr, 2)?
        }
        Format::Ri => {
            let imm = imm_field(instr, 1)?;
            if !(0..=i32::from(UIMM_MASK)).contains(&imm) {
                return Err(EncodeError::FieldRange {
                    mnemonic: instr.mnemonic(),
                    value: imm,
                    bits: UIMM_BITS,
                });
            }
            op | ra | imm as u16
        }
        Format::Rri => {
            let rb = reg_field(instr, 1)? << RB_SHIFT;
            let imm = if instr.opcode == Opcode::Jalr {
                0
            } else {
                imm_field(instr, 2)?
            };
            let min = -(1 << (SIMM_BITS - 1));
            let max = (1 << (SIMM_BITS - 1)) - 1;
            if !(min..=max).contains(&imm) {
                return Err(EncodeError::FieldRange {
                    mnemonic: instr.mnemonic(),
                    value: imm,
                    bits: SIMM_BITS,
                });
            }
            op | ra | rb | (imm as u16 & SIMM_MASK)
        }
    };
    Ok(word)
}

/// Decodes a machine word into an instruction placed at `address`.
///
/// Every word decodes; the unused bits of RRR words and of `jalr` are ignored.
pub fn decode(word: u16, address: u32) -> Instruction {
    let opcode = Opcode::from_bits(word >> OPCODE_SHIFT);
    let reg = |shift: u16| {
        Operand::Register(Register::new(((word >> shift) & REG_MASK) as usize).unwrap_or(Register::ZERO))
    };

    let operands = match (opcode, opcode.format()) {
        (Opcode::Jalr, _) => vec![reg(RA_SHIFT), reg(RB_SHIFT)],
        (_, Format::Rrr) => vec![reg(RA_SHIFT), reg(RB_SHIFT), reg(0)],
        (_, Format::Ri) => vec![reg(RA_SHIFT), Operand::Immediate(i32::from(word & UIMM_MASK))],
        (_, Format::Rri) => {
            // Sign-extend the 7-bit field.
            let imm = ((word & SIMM_MASK) << 9) as i16 >> 9;
            vec![reg(RA_SHIFT), reg(RB_SHIFT), Operand::Immediate(i32::from(imm))]
        }
    };
    Instruction::new(address, opcode, operands)
}
