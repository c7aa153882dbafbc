

/// The handler table and opcode metadata.
pub mod set;
