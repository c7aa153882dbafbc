//! Core processor implementation.
//!
//! This module contains the processor model: the architectural register state, the
//! fetch/decode/execute loop and the storage units it drives.

/// Architectural state (general-purpose registers).
pub mod arch;

/// Processor definition and execution loop.
pub mod cpu;

/// Storage units (instruction cache, data caches, replacement policies).
pub mod units;

pub use self::cpu::{Processor, Step};
