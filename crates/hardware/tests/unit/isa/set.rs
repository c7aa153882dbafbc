//! Handler Table Tests.
//!
//! The table is indexed by major opcode, its signatures drive the assembler's
//! operand checks, and handlers reject operand lists that do not match.

use pretty_assertions::assert_eq;

use crate::common::harness::{TestContext, r};
use risc16_core::common::ExecError;
use risc16_core::isa::set::{by_mnemonic, lookup};
use risc16_core::isa::{Category, INSTRUCTION_SET, Instruction, Opcode, Operand, OperandKind};

#[test]
fn table_is_indexed_by_opcode() {
    for (index, handler) in INSTRUCTION_SET.iter().enumerate() {
        assert_eq!(handler.opcode.bits() as usize, index);
        assert_eq!(handler.mnemonic, handler.opcode.mnemonic());
        assert_eq!(lookup(handler.opcode).opcode, handler.opcode);
    }
}

#[test]
fn mnemonics_resolve_to_handlers() {
    assert_eq!(by_mnemonic("nand").map(|h| h.opcode), Some(Opcode::Nand));
    assert!(by_mnemonic("movi").is_none());
    assert!(by_mnemonic("ADD").is_none());
}

#[test]
fn signatures_follow_the_formats() {
    use OperandKind::{Integer, Register};

    assert_eq!(lookup(Opcode::Add).signature, &[Register, Register, Register]);
    assert_eq!(lookup(Opcode::Lw).signature, &[Register, Register, Integer]);
    assert_eq!(lookup(Opcode::Lui).signature, &[Register, Integer]);
    assert_eq!(lookup(Opcode::Jalr).signature, &[Register, Register]);
}

#[test]
fn categories_cover_every_opcode() {
    assert_eq!(Opcode::Addi.category(), Category::Add);
    assert_eq!(Opcode::Nand.category(), Category::Alu);
    assert_eq!(Opcode::Lui.category(), Category::Load);
    assert_eq!(Opcode::Sw.category(), Category::Store);
    assert_eq!(Opcode::Beq.category(), Category::Branch);
    assert_eq!(Opcode::Jalr.category(), Category::JumpAndLink);
}

#[test]
fn mismatched_operands_are_rejected() {
    let mut ctx = TestContext::new();
    let bogus = Instruction::new(
        4,
        Opcode::Add,
        vec![Operand::Register(r(1)), Operand::Immediate(3)],
    );

    let err = (lookup(Opcode::Add).execute)(&mut ctx.cpu, &bogus).unwrap_err();
    assert_eq!(
        err,
        ExecError::OperandMismatch {
            address: 4,
            mnemonic: "add",
        }
    );
    assert_eq!(err.address(), Some(4));
}
