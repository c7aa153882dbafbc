use risc16_core::asm::context::SymbolTable;
use risc16_core::common::{AsmError, ExecError, Register};
use risc16_core::isa::Instruction;
use risc16_core::{Assembler, Config, Processor};
use tracing_subscriber::EnvFilter;

/// Installs a test-writer subscriber once; `RUST_LOG` selects the level.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Shorthand for a register index known to be valid.
pub fn r(index: usize) -> Register {
    Register::new(index).expect("register index in range")
}

pub struct TestContext {
    pub cpu: Processor,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_config(&Config::default())
    }

    pub fn with_config(config: &Config) -> Self {
        init_tracing();
        Self {
            cpu: Processor::new(config).expect("valid configuration"),
        }
    }

    /// Assembles `source` with the processor's configured assembler options.
    pub fn try_assemble(&mut self, source: &str) -> Result<SymbolTable, AsmError> {
        Assembler::new(self.cpu.config().assembler).assemble(source, &mut self.cpu)
    }

    /// Assembles `source`, panicking on failure.
    pub fn load(mut self, source: &str) -> Self {
        let _ = self.try_assemble(source).expect("source assembles");
        self
    }

    /// Runs to completion.
    pub fn run(&mut self) -> Result<bool, ExecError> {
        self.cpu.execute(false)
    }

    /// Executes a single step and returns the annotated instruction.
    pub fn step(&mut self) -> Instruction {
        self.cpu
            .step()
            .expect("step succeeds")
            .instruction
            .expect("an instruction executed")
    }

    pub fn reg(&self, index: usize) -> u16 {
        self.cpu.read_reg(r(index))
    }

    pub fn set_reg(&mut self, index: usize, value: u16) {
        self.cpu.write_reg(r(index), value);
    }

    /// Image slot at `address`.
    pub fn instruction(&self, address: u32) -> &Instruction {
        self.cpu
            .memory()
            .instruction(address)
            .expect("instruction slot")
    }

    /// Word in memory, bypassing the caches.
    pub fn word(&self, address: u32) -> u16 {
        self.cpu.memory().read_word(address).expect("valid address")
    }
}
