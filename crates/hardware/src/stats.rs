//! Execution-order tracking and statistics.
//!
//! This module records every executed instruction for an external scheduler view. It provides:
//! 1. **Execution Log:** Annotated copies of executed instructions, in execution order.
//! 2. **Unit Assignment:** Round-robin placement of each instruction on its category's units.
//! 3. **Instruction Mix:** Counts by category.
//! 4. **Cycle Estimate:** Configured unit cycles plus the data-access time each step reported.

use crate::config::UnitsConfig;
use crate::isa::instruction::{Category, Instruction};

/// One executed instruction and where it was scheduled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScheduledInstruction {
    /// The annotated copy.
    pub instruction: Instruction,
    /// Category it executed on.
    pub category: Category,
    /// Unit index within the category.
    pub unit: u32,
    /// Cycles charged: unit latency, extra latency and data-access time.
    pub cycles: u64,
}

/// Execution-order tracker.
#[derive(Clone, Debug)]
pub struct UnitSet {
    config: UnitsConfig,
    executed: Vec<ScheduledInstruction>,
    counts: [u64; Category::ALL.len()],
}

impl UnitSet {
    /// Creates an empty tracker for the given unit configuration.
    pub fn new(config: UnitsConfig) -> Self {
        Self {
            config,
            executed: Vec::new(),
            counts: [0; Category::ALL.len()],
        }
    }

    /// Unit configuration.
    pub const fn config(&self) -> &UnitsConfig {
        &self.config
    }

    /// Records an executed instruction.
    ///
    /// Unannotated instructions are recorded under their opcode's category.
    pub fn record(&mut self, instruction: Instruction) {
        let category = instruction
            .annotation
            .map_or_else(|| instruction.opcode.category(), |a| a.category);
        let units = self.config.get(category);
        let count = &mut self.counts[category.index()];
        let unit = (*count % u64::from(units.units.max(1))) as u32;
        *count += 1;

        let cycles = units.cycles()
            + instruction
                .annotation
                .and_then(|a| a.execution_time)
                .unwrap_or(0);

        self.executed.push(ScheduledInstruction {
            instruction,
            category,
            unit,
            cycles,
        });
    }

    /// Executed instructions, oldest first.
    pub fn executed(&self) -> &[ScheduledInstruction] {
        &self.executed
    }

    /// Number of executed instructions in `category`.
    pub const fn count(&self, category: Category) -> u64 {
        self.counts[category.index()]
    }

    /// Number of executed instructions.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Sum of the cycles charged to every executed instruction.
    pub fn cycles(&self) -> u64 {
        self.executed.iter().map(|s| s.cycles).sum()
    }

    /// Drops the log and the counts.
    pub fn clear(&mut self) {
        self.executed.clear();
        self.counts = [0; Category::ALL.len()];
    }
}
