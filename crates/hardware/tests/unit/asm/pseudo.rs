//! Pseudo-Instruction Tests.
//!
//! Each pseudo-instruction expands into real instructions in the image; the
//! expansions are checked slot by slot and by running them.

use pretty_assertions::assert_eq;
use proptest::prelude::*;

use crate::common::harness::{TestContext, r};
use risc16_core::asm::pseudo::Pseudo;
use risc16_core::common::AsmErrorKind;
use risc16_core::isa::{Opcode, Operand};

#[test]
fn nop_is_add_of_zeroes() {
    let ctx = TestContext::new().load("nop");
    let add = ctx.instruction(0);
    assert_eq!(add.opcode, Opcode::Add);
    assert_eq!(
        add.operands,
        vec![
            Operand::Register(r(0)),
            Operand::Register(r(0)),
            Operand::Register(r(0))
        ]
    );
}

#[test]
fn halt_is_jalr_zero_zero() {
    let ctx = TestContext::new().load("halt");
    let jalr = ctx.instruction(0);
    assert_eq!(jalr.opcode, Opcode::Jalr);
    assert!(jalr.is_halt());
    assert_eq!(jalr.to_string(), "jalr r0, r0");
}

#[test]
fn movi_expands_to_lui_then_addi() {
    let ctx = TestContext::new().load("movi r1, 0xFFFF");
    let lui = ctx.instruction(0);
    let addi = ctx.instruction(2);

    assert_eq!(lui.opcode, Opcode::Lui);
    assert_eq!(lui.register(0), Some(r(1)));
    assert_eq!(lui.immediate(1), Some(1023));

    assert_eq!(addi.opcode, Opcode::Addi);
    assert_eq!(addi.register(0), Some(r(1)));
    assert_eq!(addi.register(1), Some(r(1)));
    assert_eq!(addi.immediate(2), Some(63));
}

#[test]
fn lli_keeps_the_low_six_bits() {
    let mut ctx = TestContext::new().load("lli r2, 0x7F\nhalt");
    assert_eq!(ctx.instruction(0).immediate(2), Some(0x3F));

    ctx.set_reg(2, 0x0040);
    assert!(ctx.run().unwrap());
    assert_eq!(ctx.reg(2), 0x007F);
}

#[test]
fn movi_rejects_values_outside_a_word() {
    let mut ctx = TestContext::new();
    let err = ctx.try_assemble("movi r1, 0x10000").unwrap_err();
    assert_eq!(err.kind, AsmErrorKind::WordImmediateRange(0x10000));
    assert_eq!(err.line, Some(1));

    let err = ctx.try_assemble("movi r1, -1").unwrap_err();
    assert_eq!(err.kind, AsmErrorKind::WordImmediateRange(-1));
}

#[test]
fn pseudo_operand_count_is_checked_before_values() {
    assert_eq!(
        Pseudo::Movi.expand(&["r1"]),
        Err(AsmErrorKind::OperandCount {
            operation: "movi".to_string(),
            expected: 2,
            found: 1,
        })
    );
    assert!(matches!(
        Pseudo::Halt.expand(&["r1"]),
        Err(AsmErrorKind::OperandCount { .. })
    ));
    assert_eq!(
        Pseudo::Lli.expand(&["r1", "five"]),
        Err(AsmErrorKind::InvalidInteger("five".to_string()))
    );
}

#[test]
fn unknown_mnemonics_are_not_pseudo() {
    assert_eq!(Pseudo::from_mnemonic("movi"), Some(Pseudo::Movi));
    assert_eq!(Pseudo::from_mnemonic("add"), None);
    assert_eq!(Pseudo::from_mnemonic(".fill"), None);
}

#[test]
fn sum_program_runs_to_fifteen() {
    let mut ctx = TestContext::new().load(
        "movi r1, 5\n\
         movi r2, 10\n\
         add r3, r1, r2\n\
         halt",
    );
    assert_eq!(ctx.cpu.memory().instructions().count(), 6);

    let halt = ctx.cpu.memory().last_instruction_address().unwrap();
    assert_eq!(halt, 10);

    assert!(ctx.run().unwrap());
    assert_eq!(ctx.reg(3), 15);
    assert_eq!(ctx.cpu.pc(), halt);
}

proptest! {
    #[test]
    fn movi_loads_any_word(value in 0..=0xFFFF_u16) {
        let mut ctx = TestContext::new().load(&format!("movi r4, {value}\nhalt"));
        prop_assert!(ctx.run().unwrap());
        prop_assert_eq!(ctx.reg(4), value);
    }
}
