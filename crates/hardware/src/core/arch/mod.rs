//! RiSC-16 architectural state.
//!
//! This module contains the architectural register state of the machine:
//! 1. **GPRs:** The eight-entry general-purpose register file with hardwired `r0`.

/// General-Purpose Register file implementation.
pub mod gpr;
