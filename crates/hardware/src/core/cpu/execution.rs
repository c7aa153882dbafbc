//! Main Execution Loop.
//!
//! This module implements the fetch/decode/execute cycle. Each step performs the following:
//! 1. **Fetch:** Reads the instruction at the PC through the instruction cache and works on a copy.
//! 2. **Advance:** Moves the PC to the next slot before dispatch.
//! 3. **Dispatch:** Runs the opcode's handler; any failure restores the PC to its pre-step value.
//! 4. **Annotate:** Attaches what the step did and hands the copy to the execution-order tracker.
//! 5. **Termination:** Reports finished on a halt or when the PC passes the last instruction.

use tracing::{debug, trace, warn};

use super::Processor;
use crate::common::constants::WORD_BYTES;
use crate::common::error::ExecError;
use crate::isa::instruction::Instruction;
use crate::isa::set;

/// Outcome of a single step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Step {
    /// The executed, annotated copy; `None` when there was nothing to execute.
    pub instruction: Option<Instruction>,
    /// Whether execution has finished.
    pub finished: bool,
}

impl Processor {
    /// Executes exactly one instruction.
    ///
    /// # Returns
    ///
    /// The executed instruction and whether execution finished, or the failure. On failure
    /// the PC is left at the instruction that failed.
    pub fn step(&mut self) -> Result<Step, ExecError> {
        if !self.memory.has_instructions() {
            return Ok(Step {
                instruction: None,
                finished: true,
            });
        }

        let pc = self.pc();
        let mut instr = self
            .icache
            .fetch(pc, &mut self.memory)
            .map_err(|source| ExecError::Fault {
                address: pc,
                source,
            })?;

        self.set_pc(pc + WORD_BYTES);

        let handler = set::lookup(instr.opcode);
        let annotation = match (handler.execute)(self, &instr) {
            Ok(annotation) => annotation,
            Err(err) => {
                self.set_pc(pc);
                warn!(address = pc, instruction = %instr, error = %err, "step rolled back");
                return Err(err);
            }
        };
        instr.annotation = Some(annotation);
        trace!(address = pc, instruction = %instr, next_pc = self.pc(), "executed");

        let finished = instr.is_halt()
            || self
                .memory
                .last_instruction_address()
                .is_none_or(|last| self.pc() > last);
        self.units.record(instr.clone());

        Ok(Step {
            instruction: Some(instr),
            finished,
        })
    }

    /// Executes one step, or runs until execution finishes.
    ///
    /// # Arguments
    ///
    /// * `stepped` - Execute a single instruction instead of running to completion.
    ///
    /// # Returns
    ///
    /// `true` once execution has finished. A continuous run that reaches the configured
    /// step limit fails with [`ExecError::StepLimit`], leaving the PC at the next
    /// unexecuted instruction.
    pub fn execute(&mut self, stepped: bool) -> Result<bool, ExecError> {
        if stepped {
            return self.step().map(|step| step.finished);
        }
        self.run_observed(|_, _| {})
    }

    /// Runs to completion, handing every executed instruction to `observe`.
    ///
    /// The configured step limit applies exactly as for a continuous [`execute`](Self::execute).
    pub fn run_observed<F>(&mut self, mut observe: F) -> Result<bool, ExecError>
    where
        F: FnMut(&mut Self, &Instruction),
    {
        let limit = self.config.execution.step_limit;
        let mut steps: u64 = 0;
        loop {
            if let Some(limit) = limit.filter(|&limit| steps >= limit) {
                return Err(ExecError::StepLimit { limit });
            }

            let step = self.step()?;
            steps += 1;
            if let Some(instr) = &step.instruction {
                observe(self, instr);
            }
            if step.finished {
                debug!(
                    steps,
                    pc = self.pc(),
                    executed = self.units.total(),
                    "execution finished"
                );
                return Ok(true);
            }
        }
    }
}
