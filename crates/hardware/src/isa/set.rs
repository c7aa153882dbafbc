//! Instruction Dispatch Table.
//!
//! Every opcode maps to one [`Handler`] in the static [`INSTRUCTION_SET`]. The assembler
//! reads the handler signature for arity and operand-kind checks; the processor calls
//! the handler's `execute` function pointer. All arithmetic wraps at 16 bits.

use std::fmt;

use crate::common::constants::UPPER_IMM_SHIFT;
use crate::common::error::{ExecError, StorageError};
use crate::common::reg::Register;
use crate::core::cpu::Processor;
use crate::isa::instruction::{Annotation, Category, Instruction, OperandKind};
use crate::isa::opcodes::Opcode;

/// Executes one instruction against a processor, returning what it did.
pub type ExecuteFn = fn(&mut Processor, &Instruction) -> Result<Annotation, ExecError>;

/// Dispatch descriptor for one opcode.
#[derive(Clone, Copy)]
pub struct Handler {
    /// Opcode handled.
    pub opcode: Opcode,
    /// Assembly mnemonic.
    pub mnemonic: &'static str,
    /// Ordered operand kinds.
    pub signature: &'static [OperandKind],
    /// Execution function.
    pub execute: ExecuteFn,
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("opcode", &self.opcode)
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

const fn handler(opcode: Opcode, execute: ExecuteFn) -> Handler {
    Handler {
        opcode,
        mnemonic: opcode.mnemonic(),
        signature: opcode.signature(),
        execute,
    }
}

/// The closed instruction set, indexed by major opcode.
pub static INSTRUCTION_SET: [Handler; 8] = [
    handler(Opcode::Add, exec_add),
    handler(Opcode::Addi, exec_addi),
    handler(Opcode::Nand, exec_nand),
    handler(Opcode::Lui, exec_lui),
    handler(Opcode::Sw, exec_sw),
    handler(Opcode::Lw, exec_lw),
    handler(Opcode::Beq, exec_beq),
    handler(Opcode::Jalr, exec_jalr),
];

/// Handler for `opcode`.
pub fn lookup(opcode: Opcode) -> &'static Handler {
    &INSTRUCTION_SET[opcode.bits() as usize]
}

/// Handler for a mnemonic, or `None` if it names no instruction.
pub fn by_mnemonic(mnemonic: &str) -> Option<&'static Handler> {
    INSTRUCTION_SET.iter().find(|h| h.mnemonic == mnemonic)
}

fn mismatch(instr: &Instruction) -> ExecError {
    ExecError::OperandMismatch {
        address: instr.address,
        mnemonic: instr.mnemonic(),
    }
}

const fn fault(instr: &Instruction, source: StorageError) -> ExecError {
    ExecError::Fault {
        address: instr.address,
        source,
    }
}

fn reg(instr: &Instruction, index: usize) -> Result<Register, ExecError> {
    instr.register(index).ok_or_else(|| mismatch(instr))
}

fn imm(instr: &Instruction, index: usize) -> Result<i32, ExecError> {
    instr.immediate(index).ok_or_else(|| mismatch(instr))
}

/// Operands of an RRR instruction.
fn rrr(instr: &Instruction) -> Result<(Register, Register, Register), ExecError> {
    Ok((reg(instr, 0)?, reg(instr, 1)?, reg(instr, 2)?))
}

/// Operands of an RRI instruction.
fn rri(instr: &Instruction) -> Result<(Register, Register, i32), ExecError> {
    Ok((reg(instr, 0)?, reg(instr, 1)?, imm(instr, 2)?))
}

/// Byte offset a load/store adds to its base register.
const fn data_offset(instr: &Instruction, offset: i32) -> i64 {
    if instr.pc_relative {
        instr.address as i64 + 2 * offset as i64
    } else {
        offset as i64
    }
}

fn exec_add(cpu: &mut Processor, instr: &Instruction) -> Result<Annotation, ExecError> {
    let (rd, ra, rb) = rrr(instr)?;
    let value = cpu.read_reg(ra).wrapping_add(cpu.read_reg(rb));
    cpu.write_reg(rd, value);
    Ok(Annotation::new(Category::Add).with_destination(rd))
}

fn exec_addi(cpu: &mut Processor, instr: &Instruction) -> Result<Annotation, ExecError> {
    let (rd, ra, imm) = rri(instr)?;
    let value = cpu.read_reg(ra).wrapping_add(imm as u16);
    cpu.write_reg(rd, value);
    Ok(Annotation::new(Category::Add).with_destination(rd))
}

fn exec_nand(cpu: &mut Processor, instr: &Instruction) -> Result<Annotation, ExecError> {
    let (rd, ra, rb) = rrr(instr)?;
    let value = !(cpu.read_reg(ra) & cpu.read_reg(rb));
    cpu.write_reg(rd, value);
    Ok(Annotation::new(Category::Alu).with_destination(rd))
}

fn exec_lui(cpu: &mut Processor, instr: &Instruction) -> Result<Annotation, ExecError> {
    let rd = reg(instr, 0)?;
    let imm = imm(instr, 1)?;
    cpu.write_reg(rd, (imm as u16) << UPPER_IMM_SHIFT);
    Ok(Annotation::new(Category::Load).with_destination(rd))
}

fn exec_sw(cpu: &mut Processor, instr: &Instruction) -> Result<Annotation, ExecError> {
    let (ra, rb, offset) = rri(instr)?;
    let ea = cpu
        .effective_address(cpu.read_reg(rb), data_offset(instr, offset))
        .map_err(|e| fault(instr, e))?;

    let before = cpu.data_access_time();
    cpu.store_word(ea, cpu.read_reg(ra))
        .map_err(|e| fault(instr, e))?;
    let time = cpu.data_access_time() - before;

    Ok(Annotation::new(Category::Store)
        .with_address(ea)
        .with_time(time))
}

fn exec_lw(cpu: &mut Processor, instr: &Instruction) -> Result<Annotation, ExecError> {
    let (rd, rb, offset) = rri(instr)?;
    let ea = cpu
        .effective_address(cpu.read_reg(rb), data_offset(instr, offset))
        .map_err(|e| fault(instr, e))?;

    let before = cpu.data_access_time();
    let value = cpu.load_word(ea).map_err(|e| fault(instr, e))?;
    let time = cpu.data_access_time() - before;
    cpu.write_reg(rd, value);

    Ok(Annotation::new(Category::Load)
        .with_destination(rd)
        .with_address(ea)
        .with_time(time))
}

fn exec_beq(cpu: &mut Processor, instr: &Instruction) -> Result<Annotation, ExecError> {
    let (ra, rb, offset) = rri(instr)?;
    if cpu.read_reg(ra) == cpu.read_reg(rb) {
        let target = i64::from(cpu.pc()) + 2 * i64::from(offset);
        let target = u32::try_from(target)
            .map_err(|_| fault(instr, StorageError::InvalidAddress(target)))?;
        cpu.set_pc(target);
    }
    Ok(Annotation::new(Category::Branch).with_address(cpu.pc()))
}

/// Faults when the return address lies past 64 KiB and cannot fit a register.
fn exec_jalr(cpu: &mut Processor, instr: &Instruction) -> Result<Annotation, ExecError> {
    let rd = reg(instr, 0)?;
    let rb = reg(instr, 1)?;
    let target = if instr.is_halt() {
        instr.address
    } else {
        u32::from(cpu.read_reg(rb))
    };
    let next = cpu.pc();
    let link = u16::try_from(next)
        .map_err(|_| fault(instr, StorageError::InvalidAddress(i64::from(next))))?;
    cpu.write_reg(rd, link);
    cpu.set_pc(target);
    Ok(Annotation::new(Category::JumpAndLink)
        .with_destination(rd)
        .with_address(target))
}
