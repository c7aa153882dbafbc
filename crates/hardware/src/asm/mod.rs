//! Two-Pass Assembler.
//!
//! This module translates RiSC-16 source text into a program image. It performs the following:
//! 1. **Pass 1:** Strips comments, binds labels to the current address, expands
//!    pseudo-instructions, writes `.fill`/`.space` data and checks every operand.
//! 2. **Pass 2:** Resolves label operands of `beq`, `lw` and `sw`, and label-valued `.fill`s.
//! 3. **Loading:** Places the resolved instructions in the processor's memory image and
//!    stores the symbol table on the processor.
//!
//! The whole source is lower-cased first, so mnemonics, registers and labels are
//! case-insensitive. Every line-level error carries its 1-based line number. On any
//! error the processor is left cleared.

/// Per-call assembler state and the symbol table.
pub mod context;

/// Line splitting and integer parsing.
pub mod parse;

/// Pseudo-instruction expansion.
pub mod pseudo;

use tracing::{debug, trace};

use self::context::{AsmContext, DeferredFill, Pending, SymbolTable};
use self::parse::{parse_integer, split_line, try_parse_integer};
use self::pseudo::Pseudo;
use crate::common::constants::{FILL_MIN, SIMM_MAX, SIMM_MIN, UIMM_MAX, WORD_IMM_MAX};
use crate::common::error::{AsmError, AsmErrorKind};
use crate::common::reg::Register;
use crate::config::{AssemblerConfig, LabelAddressing};
use crate::core::cpu::Processor;
use crate::isa::instruction::{Instruction, Operand, OperandKind};
use crate::isa::opcodes::Opcode;
use crate::isa::set;
use crate::soc::memory::Memory;

/// Assembles `source` into `processor` using the assembler options it was configured with.
///
/// # Examples
///
/// ```
/// use risc16_core::asm::assemble;
/// use risc16_core::{Config, Processor};
///
/// let mut cpu = Processor::new(&Config::default()).unwrap();
/// let symbols = assemble("start: movi r1, 5\nhalt", &mut cpu).unwrap();
/// assert_eq!(symbols.get("start"), Some(0));
/// assert!(cpu.execute(false).unwrap());
/// assert_eq!(cpu.read_reg(risc16_core::common::Register::new(1).unwrap()), 5);
/// ```
pub fn assemble(source: &str, processor: &mut Processor) -> Result<SymbolTable, AsmError> {
    Assembler::new(processor.config().assembler).assemble(source, processor)
}

/// The assembler and its options.
#[derive(Clone, Copy, Debug, Default)]
pub struct Assembler {
    config: AssemblerConfig,
}

impl Assembler {
    /// Creates an assembler with the given options.
    pub const fn new(config: AssemblerConfig) -> Self {
        Self { config }
    }

    /// Assembles `source` into `processor`.
    ///
    /// The processor is cleared first. On success its memory holds the instruction image
    /// and data, and it keeps a copy of the returned symbol table.
    pub fn assemble(
        &self,
        source: &str,
        processor: &mut Processor,
    ) -> Result<SymbolTable, AsmError> {
        processor.clear();
        match self.translate(source, processor.memory_mut()) {
            Ok(symbols) => {
                processor.set_symbols(symbols.clone());
                Ok(symbols)
            }
            Err(err) => {
                processor.clear();
                Err(err)
            }
        }
    }

    fn translate(&self, source: &str, memory: &mut Memory) -> Result<SymbolTable, AsmError> {
        let source = source.to_lowercase();
        let mut ctx = AsmContext::new(memory.capacity());
        let mut statements = 0_usize;

        for (index, text) in source.lines().enumerate() {
            ctx.line = index + 1;
            let Some(line) = split_line(text).map_err(|kind| ctx.error(kind))? else {
                continue;
            };
            statements += 1;
            if let Some(label) = line.label {
                ctx.define(label);
            }

            match line.mnemonic {
                ".fill" => Self::fill(&mut ctx, &line.operands, memory)?,
                ".space" => Self::space(&mut ctx, &line.operands, memory)?,
                mnemonic => {
                    if let Some(pseudo) = Pseudo::from_mnemonic(mnemonic) {
                        let expansion = pseudo
                            .expand(&line.operands)
                            .map_err(|kind| ctx.error(kind))?;
                        for real in expansion {
                            let operands: Vec<&str> =
                                real.operands.iter().map(String::as_str).collect();
                            Self::emit(&mut ctx, real.opcode, &operands)?;
                        }
                    } else {
                        let handler = set::by_mnemonic(mnemonic).ok_or_else(|| {
                            ctx.error(AsmErrorKind::UnknownOperation(mnemonic.to_string()))
                        })?;
                        Self::emit(&mut ctx, handler.opcode, &line.operands)?;
                    }
                }
            }
        }

        if statements == 0 {
            return Err(AsmErrorKind::EmptyProgram.into());
        }

        self.resolve(&mut ctx, memory)?;
        for pending in ctx.instructions {
            memory
                .load_instruction(pending.instruction)
                .map_err(|err| AsmError::at(pending.line, err.into()))?;
        }
        debug!(symbols = ?ctx.symbols, slots = ctx.address / 2, "assembly complete");
        Ok(ctx.symbols)
    }

    /// Checks an operand list against `opcode`'s signature and emits one instruction.
    fn emit(ctx: &mut AsmContext, opcode: Opcode, tokens: &[&str]) -> Result<(), AsmError> {
        let handler = set::lookup(opcode);
        if tokens.len() != handler.signature.len() {
            return Err(ctx.error(AsmErrorKind::OperandCount {
                operation: handler.mnemonic.to_string(),
                expected: handler.signature.len(),
                found: tokens.len(),
            }));
        }

        let operands = handler
            .signature
            .iter()
            .zip(tokens)
            .map(|(kind, token)| operand(opcode, *kind, token))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|kind| ctx.error(kind))?;

        let address = ctx.claim(1)?;
        let instruction = Instruction::new(address, opcode, operands);
        trace!(address, instruction = %instruction, "emit");
        ctx.instructions.push(Pending {
            line: ctx.line,
            instruction,
        });
        Ok(())
    }

    /// `.fill <value|label>`: one word, literal now or label address in pass 2.
    fn fill(ctx: &mut AsmContext, operands: &[&str], memory: &mut Memory) -> Result<(), AsmError> {
        let [token] = operands else {
            return Err(ctx.error(AsmErrorKind::OperandCount {
                operation: ".fill".to_string(),
                expected: 1,
                found: operands.len(),
            }));
        };

        match try_parse_integer(token) {
            Some(value) => {
                if !(FILL_MIN..=WORD_IMM_MAX).contains(&value) {
                    return Err(ctx.error(AsmErrorKind::FillRange(value)));
                }
                let address = ctx.claim(1)?;
                memory
                    .reserve(address)
                    .and_then(|()| memory.write_word(address, value as u16))
                    .map_err(|err| ctx.error(err))?;
            }
            None => {
                let address = ctx.claim(1)?;
                memory.reserve(address).map_err(|err| ctx.error(err))?;
                let _ = ctx.fills.insert(
                    address,
                    DeferredFill {
                        line: ctx.line,
                        label: (*token).to_string(),
                    },
                );
            }
        }
        Ok(())
    }

    /// `.space <n>`: `n` zero words.
    fn space(ctx: &mut AsmContext, operands: &[&str], memory: &mut Memory) -> Result<(), AsmError> {
        let [token] = operands else {
            return Err(ctx.error(AsmErrorKind::OperandCount {
                operation: ".space".to_string(),
                expected: 1,
                found: operands.len(),
            }));
        };

        let count = parse_integer(token).map_err(|kind| ctx.error(kind))?;
        if count < 1 {
            return Err(ctx.error(AsmErrorKind::SpaceCount(count)));
        }
        let start = ctx.claim(count as u32)?;
        for slot in 0..count as u32 {
            let address = start + 2 * slot;
            memory
                .reserve(address)
                .and_then(|()| memory.write_word(address, 0))
                .map_err(|err| ctx.error(err))?;
        }
        Ok(())
    }

    /// Second pass: label operands and label-valued `.fill`s.
    fn resolve(&self, ctx: &mut AsmContext, memory: &mut Memory) -> Result<(), AsmError> {
        let AsmContext {
            symbols,
            fills,
            instructions,
            ..
        } = ctx;

        for pending in instructions.iter_mut() {
            let line = pending.line;
            let instruction = &mut pending.instruction;
            let Some(label) = instruction.label().map(str::to_string) else {
                continue;
            };
            let at = |kind: AsmErrorKind| AsmError::at(line, kind);
            let target = symbols
                .get(&label)
                .ok_or_else(|| at(AsmErrorKind::UndefinedLabel(label.clone())))?;

            let address = i64::from(instruction.address);
            let target = i64::from(target);
            let (value, pc_relative) = match instruction.opcode {
                Opcode::Beq => (displacement(&label, target - address - 2).map_err(at)?, false),
                _ => {
                    let offset = displacement(&label, target - address).map_err(at)?;
                    match self.config.label_addressing {
                        LabelAddressing::Absolute => (target as i32, false),
                        LabelAddressing::PcRelative => (offset, true),
                    }
                }
            };

            for operand in &mut instruction.operands {
                if matches!(operand, Operand::Label(_)) {
                    *operand = Operand::Immediate(value);
                }
            }
            instruction.pc_relative = pc_relative;
        }

        for (address, DeferredFill { line, label }) in fills.iter() {
            let target = symbols
                .get(label)
                .ok_or_else(|| AsmError::at(*line, AsmErrorKind::UndefinedLabel(label.clone())))?;
            memory
                .write_word(*address, target as u16)
                .map_err(|err| AsmError::at(*line, err.into()))?;
        }
        Ok(())
    }
}

/// Converts a byte distance into a word displacement that fits a signed 7-bit field.
fn displacement(label: &str, bytes: i64) -> Result<i32, AsmErrorKind> {
    let words = bytes / 2;
    if (i64::from(SIMM_MIN)..=i64::from(SIMM_MAX)).contains(&words) {
        Ok(words as i32)
    } else {
        Err(AsmErrorKind::DisplacementRange {
            label: label.to_string(),
            offset: words.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32,
        })
    }
}

/// Parses one operand token of the given kind.
fn operand(opcode: Opcode, kind: OperandKind, token: &str) -> Result<Operand, AsmErrorKind> {
    match kind {
        OperandKind::Register => token.parse::<Register>().map(Operand::Register),
        OperandKind::Integer => match try_parse_integer(token) {
            Some(value) => check_immediate(opcode, value).map(Operand::Immediate),
            None if opcode.accepts_label() => Ok(Operand::Label(token.to_string())),
            None => Err(AsmErrorKind::InvalidImmediate(token.to_string())),
        },
    }
}

fn check_immediate(opcode: Opcode, value: i32) -> Result<i32, AsmErrorKind> {
    match opcode {
        Opcode::Lui if !(0..=UIMM_MAX).contains(&value) => {
            Err(AsmErrorKind::UpperImmediateRange(value))
        }
        Opcode::Lui => Ok(value),
        _ if !(SIMM_MIN..=SIMM_MAX).contains(&value) => Err(AsmErrorKind::ImmediateRange(value)),
        _ => Ok(value),
    }
}
