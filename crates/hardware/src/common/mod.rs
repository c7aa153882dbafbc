//! Common utilities and types used throughout the RiSC-16 simulator.
//!
//! This module provides fundamental building blocks shared by the assembler and the
//! processor model. It includes:
//! 1. **Constants:** Word width, immediate ranges and memory bounds.
//! 2. **Word Helpers:** Big-endian word/byte conversion and display radix.
//! 3. **Error Handling:** Every error type the crate reports.
//! 4. **Register Management:** Register names and the register file.

/// Common constants used throughout the simulator.
pub mod constants;

/// Word/byte conversion and display helpers.
pub mod data;

/// Error types.
pub mod error;

/// Register names and register file.
pub mod reg;

pub use data::Radix;
pub use error::{
    AsmError, AsmErrorKind, ConfigError, EncodeError, Error, ErrorCategory, ExecError,
    StorageError,
};
pub use reg::{Register, RegisterFile, RegisterSnapshot};
