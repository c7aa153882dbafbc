//! RiSC-16 General-Purpose Register File.
//!
//! This module implements the eight 16-bit general-purpose registers. It performs the following:
//! 1. **Storage:** Maintains registers `r0`-`r7`.
//! 2. **Invariant Enforcement:** Register `r0` is hardwired to zero; writes to it are dropped.
//! 3. **Change Tracking:** Records which registers were written since the last acknowledgment,
//!    and whether a write to `r0` was attempted, so a viewer can highlight them.

use std::collections::BTreeSet;

use crate::common::constants::{REG_ZERO, REGISTER_COUNT};

/// General-Purpose Register file.
///
/// Contains eight registers. Register `r0` always reads zero.
#[derive(Clone, Debug, Default)]
pub struct Gpr {
    regs: [u16; REGISTER_COUNT],
    changed: BTreeSet<usize>,
    zero_written: bool,
}

impl Gpr {
    /// Creates a new register file with all registers initialized to zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a general-purpose register value.
    ///
    /// # Arguments
    ///
    /// * `idx` - Register index (0-7).
    ///
    /// # Returns
    ///
    /// The 16-bit value stored in the register. Register `r0` always returns 0.
    pub fn read(&self, idx: usize) -> u16 {
        if idx == REG_ZERO {
            0
        } else {
            self.regs[idx]
        }
    }

    /// Writes a value to a general-purpose register.
    ///
    /// Writes to `r0` are discarded and only raise the attempted-write flag.
    ///
    /// # Arguments
    ///
    /// * `idx` - Register index (0-7).
    /// * `val` - The 16-bit value to write.
    pub fn write(&mut self, idx: usize, val: u16) {
        if idx == REG_ZERO {
            self.zero_written = true;
        } else {
            self.regs[idx] = val;
            let _ = self.changed.insert(idx);
        }
    }

    /// Indices of the registers written since the last acknowledgment, in ascending order.
    pub fn changed(&self) -> impl Iterator<Item = usize> + '_ {
        self.changed.iter().copied()
    }

    /// Whether a write to `r0` was attempted since the last acknowledgment.
    pub const fn zero_written(&self) -> bool {
        self.zero_written
    }

    /// Acknowledges the change set and the `r0` flag without touching values.
    pub fn clear_changes(&mut self) {
        self.changed.clear();
        self.zero_written = false;
    }

    /// Zeroes every register and the change tracking.
    pub fn reset(&mut self) {
        self.regs = [0; REGISTER_COUNT];
        self.clear_changes();
    }

    /// Copies out all eight values, with `r0` reading zero.
    pub fn values(&self) -> [u16; REGISTER_COUNT] {
        std::array::from_fn(|i| self.read(i))
    }
}
