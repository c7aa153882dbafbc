//! Register Names and the Register File.
//!
//! This module provides the register-level view of the machine. It provides:
//! 1. **Register Names:** The `Register` newtype, parsed from `r0`-`r7` and displayed as `R0`-`R7`.
//! 2. **Unified Storage:** `RegisterFile`, the general-purpose registers plus the program counter.
//! 3. **Observability:** Snapshots of values, PC and change tracking for display.

use std::fmt;
use std::str::FromStr;

use crate::common::constants::{REGISTER_COUNT, START_PC};
use crate::common::error::AsmErrorKind;
use crate::core::arch::gpr::Gpr;

/// A general-purpose register name (`r0`-`r7`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Register(u8);

impl Register {
    /// The hardwired-zero register.
    pub const ZERO: Self = Self(0);

    /// Creates a register name from its index, or `None` if the index is not 0-7.
    pub const fn new(index: usize) -> Option<Self> {
        if index < REGISTER_COUNT {
            Some(Self(index as u8))
        } else {
            None
        }
    }

    /// Register index (0-7).
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl FromStr for Register {
    type Err = AsmErrorKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AsmErrorKind::InvalidRegister(s.to_string());
        let digits = s
            .strip_prefix('r')
            .or_else(|| s.strip_prefix('R'))
            .ok_or_else(invalid)?;
        if digits.len() != 1 {
            return Err(invalid());
        }
        digits
            .parse::<usize>()
            .ok()
            .and_then(Self::new)
            .ok_or_else(invalid)
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{}", self.0)
    }
}

/// Point-in-time copy of the register file for display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegisterSnapshot {
    /// Register values `r0`-`r7`.
    pub values: [u16; REGISTER_COUNT],
    /// Program counter (byte address).
    pub pc: u32,
    /// Registers written since the last acknowledgment.
    pub changed: Vec<Register>,
    /// Whether a write to `r0` was attempted since the last acknowledgment.
    pub zero_written: bool,
}

/// General-purpose registers plus the program counter.
#[derive(Clone, Debug, Default)]
pub struct RegisterFile {
    gpr: Gpr,
    pc: u32,
}

impl RegisterFile {
    /// Creates a new register file with all registers and the PC at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a general-purpose register.
    pub fn read(&self, reg: Register) -> u16 {
        self.gpr.read(reg.index())
    }

    /// Writes a general-purpose register. Writes to `r0` are ignored and flagged.
    pub fn write(&mut self, reg: Register, val: u16) {
        self.gpr.write(reg.index(), val);
    }

    /// Current program counter.
    pub const fn pc(&self) -> u32 {
        self.pc
    }

    /// Sets the program counter.
    pub const fn set_pc(&mut self, pc: u32) {
        self.pc = pc;
    }

    /// Whether a write to `r0` was attempted since the last acknowledgment.
    pub const fn zero_written(&self) -> bool {
        self.gpr.zero_written()
    }

    /// Registers written since the last acknowledgment.
    pub fn changed(&self) -> Vec<Register> {
        self.gpr.changed().filter_map(Register::new).collect()
    }

    /// Acknowledges change tracking without altering any value.
    pub fn clear_changes(&mut self) {
        self.gpr.clear_changes();
    }

    /// Zeroes every register, the PC and the change tracking.
    pub fn clear(&mut self) {
        self.gpr.reset();
        self.pc = START_PC;
    }

    /// Captures the register state for display.
    pub fn snapshot(&self) -> RegisterSnapshot {
        RegisterSnapshot {
            values: self.gpr.values(),
            pc: self.pc,
            changed: self.changed(),
            zero_written: self.zero_written(),
        }
    }
}
