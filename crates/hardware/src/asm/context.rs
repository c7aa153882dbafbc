//! Assembly context and symbol table.
//!
//! An [`AsmContext`] holds everything one assembly run accumulates: the current
//! address, the symbol table, the deferred `.fill` labels and the instructions
//! waiting for the second pass. A fresh context is created per call, so assemblies
//! never share state.

use std::collections::BTreeMap;

use tracing::warn;

use crate::common::constants::WORD_BYTES;
use crate::common::error::{AsmError, AsmErrorKind, StorageError};
use crate::isa::instruction::Instruction;

/// Label to address mapping, iterated in label order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SymbolTable {
    labels: BTreeMap<String, u32>,
}

impl SymbolTable {
    /// Address of `label`.
    pub fn get(&self, label: &str) -> Option<u32> {
        self.labels.get(label).copied()
    }

    /// Binds `label` to `address`, returning the previous address if it was bound.
    pub fn insert(&mut self, label: &str, address: u32) -> Option<u32> {
        self.labels.insert(label.to_string(), address)
    }

    /// Number of labels.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether no label is defined.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Labels and addresses in label order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.labels.iter().map(|(label, address)| (label.as_str(), *address))
    }
}

/// An instruction emitted in the first pass, with the line that produced it.
#[derive(Clone, Debug)]
pub struct Pending {
    /// 1-based source line.
    pub line: usize,
    /// The instruction, possibly still referencing a label.
    pub instruction: Instruction,
}

/// A `.fill` whose value is a label.
#[derive(Clone, Debug)]
pub struct DeferredFill {
    /// 1-based source line.
    pub line: usize,
    /// Label to resolve.
    pub label: String,
}

/// Per-call assembler state.
#[derive(Debug)]
pub struct AsmContext {
    /// Address of the next slot.
    pub address: u32,
    /// Current 1-based source line.
    pub line: usize,
    /// Memory capacity the image must fit in.
    pub capacity: u32,
    /// Labels defined so far.
    pub symbols: SymbolTable,
    /// `.fill` slots waiting for a label address.
    pub fills: BTreeMap<u32, DeferredFill>,
    /// Instructions in emission order.
    pub instructions: Vec<Pending>,
}

impl AsmContext {
    /// Creates a context for an image of at most `capacity` bytes.
    pub fn new(capacity: u32) -> Self {
        Self {
            address: 0,
            line: 0,
            capacity,
            symbols: SymbolTable::default(),
            fills: BTreeMap::new(),
            instructions: Vec::new(),
        }
    }

    /// Binds `label` to the current address. Redefinition keeps the latest binding.
    pub fn define(&mut self, label: &str) {
        if let Some(previous) = self.symbols.insert(label, self.address) {
            warn!(
                label,
                previous,
                address = self.address,
                line = self.line,
                "label redefined"
            );
        }
    }

    /// Claims the next `slots` word slots, returning the first address.
    pub fn claim(&mut self, slots: u32) -> Result<u32, AsmError> {
        let start = self.address;
        let end = u64::from(start) + u64::from(slots) * u64::from(WORD_BYTES);
        if end > u64::from(self.capacity) {
            return Err(self.error(StorageError::ProgramTooLarge {
                capacity: self.capacity,
            }));
        }
        self.address = end as u32;
        Ok(start)
    }

    /// Wraps an error kind with the current line.
    pub fn error(&self, kind: impl Into<AsmErrorKind>) -> AsmError {
        AsmError::at(self.line, kind.into())
    }
}
