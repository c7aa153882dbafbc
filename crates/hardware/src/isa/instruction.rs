//! Instruction records.
//!
//! An [`Instruction`] is one slot of the program image: its address, opcode and operand
//! list. Copies taken at execution time additionally carry an [`Annotation`] describing
//! what the step did, which feeds the execution-order tracker.

use std::fmt;

use crate::common::reg::Register;
use crate::isa::opcodes::Opcode;

/// Kind of operand an instruction signature slot expects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperandKind {
    /// A register name.
    Register,
    /// An integer, or a label on operations that accept one.
    Integer,
}

/// A single operand.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Operand {
    /// Register operand.
    Register(Register),
    /// Integer operand (resolved).
    Immediate(i32),
    /// Label reference awaiting the second assembler pass.
    Label(String),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Register(reg) => write!(f, "r{}", reg.index()),
            Self::Immediate(value) => write!(f, "{value}"),
            Self::Label(label) => f.write_str(label),
        }
    }
}

/// Functional-unit category of an executed instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// `add`, `addi`
    Add,
    /// `nand`
    Alu,
    /// `lw`, `lui`
    Load,
    /// `sw`
    Store,
    /// `beq`
    Branch,
    /// `jalr`
    JumpAndLink,
}

impl Category {
    /// All categories in configuration-table order.
    pub const ALL: [Self; 6] = [
        Self::Add,
        Self::Alu,
        Self::Load,
        Self::Store,
        Self::Branch,
        Self::JumpAndLink,
    ];

    /// Position in [`Category::ALL`].
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Add => "add",
            Self::Alu => "alu",
            Self::Load => "load",
            Self::Store => "store",
            Self::Branch => "branch",
            Self::JumpAndLink => "jump-and-link",
        };
        f.write_str(name)
    }
}

/// What a single execution of an instruction did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Annotation {
    /// Functional-unit category.
    pub category: Category,
    /// Register written, if any.
    pub destination: Option<Register>,
    /// Data address for loads/stores, resulting PC for branches and jumps.
    pub effective_address: Option<u32>,
    /// Data-access time spent by loads/stores.
    pub execution_time: Option<u64>,
}

impl Annotation {
    /// Annotation with only a category.
    pub const fn new(category: Category) -> Self {
        Self {
            category,
            destination: None,
            effective_address: None,
            execution_time: None,
        }
    }

    /// Sets the destination register.
    #[must_use]
    pub const fn with_destination(mut self, reg: Register) -> Self {
        self.destination = Some(reg);
        self
    }

    /// Sets the effective address or branch target.
    #[must_use]
    pub const fn with_address(mut self, address: u32) -> Self {
        self.effective_address = Some(address);
        self
    }

    /// Sets the data-access time.
    #[must_use]
    pub const fn with_time(mut self, time: u64) -> Self {
        self.execution_time = Some(time);
        self
    }
}

/// One instruction of the program image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Instruction {
    /// Byte address of the slot.
    pub address: u32,
    /// Operation.
    pub opcode: Opcode,
    /// Operands in signature order.
    pub operands: Vec<Operand>,
    /// The load/store immediate is a word displacement from `address`.
    pub pc_relative: bool,
    /// Set on executed copies only.
    pub annotation: Option<Annotation>,
}

impl Instruction {
    /// Creates an unannotated instruction.
    pub const fn new(address: u32, opcode: Opcode, operands: Vec<Operand>) -> Self {
        Self {
            address,
            opcode,
            operands,
            pc_relative: false,
            annotation: None,
        }
    }

    /// Assembly mnemonic.
    pub const fn mnemonic(&self) -> &'static str {
        self.opcode.mnemonic()
    }

    /// Register operand at `index`, if that operand is a register.
    pub fn register(&self, index: usize) -> Option<Register> {
        match self.operands.get(index) {
            Some(Operand::Register(reg)) => Some(*reg),
            _ => None,
        }
    }

    /// Resolved integer operand at `index`, if that operand is one.
    pub fn immediate(&self, index: usize) -> Option<i32> {
        match self.operands.get(index) {
            Some(Operand::Immediate(value)) => Some(*value),
            _ => None,
        }
    }

    /// Label operand, if the instruction still references one.
    pub fn label(&self) -> Option<&str> {
        self.operands.iter().find_map(|op| match op {
            Operand::Label(label) => Some(label.as_str()),
            _ => None,
        })
    }

    /// Whether this is the `jalr r0, r0` halt form.
    pub fn is_halt(&self) -> bool {
        self.opcode == Opcode::Jalr
            && self.register(0) == Some(Register::ZERO)
            && self.register(1) == Some(Register::ZERO)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())?;
        for (i, operand) in self.operands.iter().enumerate() {
            let sep = if i == 0 { " " } else { ", " };
            write!(f, "{sep}{operand}")?;
        }
        Ok(())
    }
}
