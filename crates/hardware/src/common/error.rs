//! Error definitions.
//!
//! This module defines every failure the simulator reports. It provides:
//! 1. **Assembly Errors:** Structural, range and resolution failures, tagged with the source line.
//! 2. **Storage Errors:** Address, alignment and capacity violations raised by memory.
//! 3. **Execution Errors:** Faults raised while a step runs; the processor rolls back its PC first.
//! 4. **Configuration Errors:** Invalid geometry, capacity or policy rows.
//! 5. **Encoding Errors:** Operands that do not fit a machine-word field.

use thiserror::Error;

/// Failure raised by memory or a cache level for a single access.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum StorageError {
    /// The address lies outside the configured memory capacity.
    #[error("invalid address ({0})")]
    InvalidAddress(i64),

    /// A word access used an odd address.
    #[error("invalid word address ({0})")]
    MisalignedWord(i64),

    /// The program image needs a slot beyond the end of memory.
    #[error("program too large for memory ({capacity} bytes)")]
    ProgramTooLarge {
        /// Configured memory capacity in bytes.
        capacity: u32,
    },

    /// The program counter points at a slot with no instruction (data or past the image).
    #[error("no instruction at address {0}")]
    NoInstruction(u32),
}

/// Coarse classification of assembly failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Malformed source: bad labels, operand counts, names or literals.
    Structural,
    /// A well-formed value outside the range its field accepts.
    Range,
    /// A reference that could not be resolved, or an image that does not fit memory.
    Resolution,
}

/// The reason an assembly failed.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AsmErrorKind {
    /// The source has no instruction or directive at all.
    #[error("please enter one or more instructions")]
    EmptyProgram,

    /// A `:` with nothing in front of it.
    #[error("empty label")]
    EmptyLabel,

    /// A label with characters outside `[A-Za-z0-9._]`.
    #[error("label '{0}' can only contain alphanumeric symbols and '.' or '_'")]
    InvalidLabel(String),

    /// A label with no instruction or directive on the same line.
    #[error("cannot have a line with just a label ('{0}')")]
    LabelWithoutInstruction(String),

    /// Mnemonic is neither an instruction, a pseudo-instruction nor a directive.
    #[error("'{0}' is an invalid operation")]
    UnknownOperation(String),

    /// Wrong number of operands for the operation.
    #[error("invalid number of operands for '{operation}' (expected {expected}, found {found})")]
    OperandCount {
        /// Mnemonic as written.
        operation: String,
        /// Operands the operation takes.
        expected: usize,
        /// Operands supplied.
        found: usize,
    },

    /// Register operand is not one of `r0`..`r7`.
    #[error("'{0}' is an invalid register name")]
    InvalidRegister(String),

    /// Token where an integer is mandatory does not parse.
    #[error("{0} is an invalid integer")]
    InvalidInteger(String),

    /// Non-numeric immediate on an operation that does not take labels.
    #[error("invalid immediate operand: {0}")]
    InvalidImmediate(String),

    /// `lui` immediate outside `[0, 0x3ff]`.
    #[error("upper immediate must be between 0x000 and 0x3ff (found {0})")]
    UpperImmediateRange(i32),

    /// Signed immediate outside `[-64, 63]`.
    #[error("signed immediate must be between -64 and 63 (found {0})")]
    ImmediateRange(i32),

    /// `movi` immediate outside `[0, 0xffff]`.
    #[error("word immediate must be between 0x0000 and 0xffff (found {0})")]
    WordImmediateRange(i32),

    /// `.fill` literal that does not fit a word.
    #[error(".fill value must fit in 16 bits (found {0})")]
    FillRange(i32),

    /// Resolved label lies too far away for a 7-bit displacement.
    #[error("offset out of range for label '{label}' (offset: {offset})")]
    DisplacementRange {
        /// Target label.
        label: String,
        /// Word displacement that was computed.
        offset: i32,
    },

    /// `.space` count below one.
    #[error(".space count must be positive (found {0})")]
    SpaceCount(i32),

    /// Label referenced but never defined.
    #[error("undefined label '{0}'")]
    UndefinedLabel(String),

    /// Memory rejected part of the image.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl AsmErrorKind {
    /// Classifies the failure.
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::EmptyProgram
            | Self::EmptyLabel
            | Self::InvalidLabel(_)
            | Self::LabelWithoutInstruction(_)
            | Self::UnknownOperation(_)
            | Self::OperandCount { .. }
            | Self::InvalidRegister(_)
            | Self::InvalidInteger(_)
            | Self::InvalidImmediate(_) => ErrorCategory::Structural,
            Self::UpperImmediateRange(_)
            | Self::ImmediateRange(_)
            | Self::WordImmediateRange(_)
            | Self::FillRange(_)
            | Self::DisplacementRange { .. }
            | Self::SpaceCount(_) => ErrorCategory::Range,
            Self::UndefinedLabel(_) | Self::Storage(_) => ErrorCategory::Resolution,
        }
    }
}

/// An assembly failure, optionally tied to the 1-based source line that caused it.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{}{kind}", line_prefix(.line))]
pub struct AsmError {
    /// Source line, when the failure belongs to one.
    pub line: Option<usize>,
    /// What went wrong.
    pub kind: AsmErrorKind,
}

impl AsmError {
    /// Creates an error for a specific source line.
    pub const fn at(line: usize, kind: AsmErrorKind) -> Self {
        Self {
            line: Some(line),
            kind,
        }
    }

    /// Classifies the failure.
    pub const fn category(&self) -> ErrorCategory {
        self.kind.category()
    }
}

impl From<AsmErrorKind> for AsmError {
    fn from(kind: AsmErrorKind) -> Self {
        Self { line: None, kind }
    }
}

fn line_prefix(line: &Option<usize>) -> String {
    line.map_or_else(String::new, |n| format!("Line {n}: "))
}

/// Failure raised while executing a step.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ExecError {
    /// Fetch or a data access failed; carries the faulting instruction's address.
    #[error("{source}")]
    Fault {
        /// Address of the instruction being executed (or fetched).
        address: u32,
        /// Underlying storage failure.
        source: StorageError,
    },

    /// The instruction's operands do not match its handler signature.
    #[error("operands of '{mnemonic}' at {address} do not match its signature")]
    OperandMismatch {
        /// Address of the instruction.
        address: u32,
        /// Mnemonic of the instruction.
        mnemonic: &'static str,
    },

    /// A continuous run executed the configured maximum number of steps.
    #[error("step limit of {limit} instructions reached without finishing")]
    StepLimit {
        /// Configured limit.
        limit: u64,
    },
}

impl ExecError {
    /// Address of the instruction that failed, when the failure belongs to one.
    pub const fn address(&self) -> Option<u32> {
        match self {
            Self::Fault { address, .. } | Self::OperandMismatch { address, .. } => Some(*address),
            Self::StepLimit { .. } => None,
        }
    }
}

/// Invalid processor configuration.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Storage table needs at least a memory row and an instruction-cache row.
    #[error("invalid configuration: expected at least {expected} storage rows, found {found}")]
    MissingRows {
        /// Minimum row count.
        expected: usize,
        /// Rows supplied.
        found: usize,
    },

    /// A row is shorter than its layout requires.
    #[error("invalid configuration: row {row} needs {expected} values, found {found}")]
    RowWidth {
        /// Row index within its table.
        row: usize,
        /// Values required.
        expected: usize,
        /// Values supplied.
        found: usize,
    },

    /// A table value is negative or does not fit its field.
    #[error("invalid configuration: row {row} column {column} holds {value}")]
    NegativeValue {
        /// Row index within its table.
        row: usize,
        /// Column index within the row.
        column: usize,
        /// Offending value.
        value: i64,
    },

    /// Memory capacity out of range or not a power of two.
    #[error("memory size ({0}) must be a power of 2 between 128B and 4MB")]
    MemoryCapacity(u32),

    /// Cache geometry that cannot be built.
    #[error("invalid geometry for {level}: {reason}")]
    InvalidGeometry {
        /// Level name (`L1I`, `L1D`, `L2D`, ...).
        level: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Write-policy index outside the enumeration.
    #[error("write policy index {0} is out of range")]
    WritePolicyIndex(i64),

    /// Hit policy must be write-back or write-through.
    #[error("{0} is not a write-hit policy")]
    HitPolicy(String),

    /// Miss policy must be write-allocate or no-write-allocate.
    #[error("{0} is not a write-miss policy")]
    MissPolicy(String),

    /// Functional-unit table shape does not match the category count.
    #[error("invalid unit configuration: {0}")]
    UnitRows(String),
}

/// Failure turning an instruction into a machine word.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// Operand value does not fit its bit field.
    #[error("'{mnemonic}' operand {value} does not fit a {bits}-bit field")]
    FieldRange {
        /// Mnemonic of the instruction.
        mnemonic: &'static str,
        /// Operand value.
        value: i32,
        /// Width of the field.
        bits: u32,
    },

    /// Instruction still carries a label or has operands of the wrong kind.
    #[error("'{0}' has unresolved or mistyped operands")]
    Unresolved(&'static str),
}

/// Umbrella error for callers that drive the whole tool chain.
#[derive(Debug, Error)]
pub enum Error {
    /// Assembly failed.
    #[error(transparent)]
    Asm(#[from] AsmError),
    /// Execution failed.
    #[error(transparent)]
    Exec(#[from] ExecError),
    /// Configuration rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Storage access failed outside of a step.
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// Encoding failed.
    #[error(transparent)]
    Encode(#[from] EncodeError),
}
