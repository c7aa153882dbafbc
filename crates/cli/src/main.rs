//! RiSC-16 assembler and simulator CLI.
//!
//! This binary provides a single entry point for the tool chain. It performs:
//! 1. **Run:** Assemble a source file and execute it, continuously or one step at a time.
//! 2. **Check:** Assemble only and report the symbol table.
//! 3. **Listing:** Print every image slot with its machine word and disassembly.
//!
//! Configuration is read from a JSON file (see `risc16_core::Config`); without one the
//! built-in reference configuration is used. Logging follows `RUST_LOG`.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use risc16_core::common::Radix;
use risc16_core::isa::encoding::encode;
use risc16_core::isa::instruction::Category;
use risc16_core::{Assembler, Config, Error, Processor};

#[derive(Parser, Debug)]
#[command(
    name = "risc16",
    author,
    version,
    about = "RiSC-16 assembler and cache-hierarchy simulator",
    long_about = "Assemble and run RiSC-16 programs on a processor model with an instruction cache and a configurable chain of data caches.\n\nExamples:\n  risc16 run program.s\n  risc16 run program.s --config caches.json --hex\n  risc16 listing program.s"
)]
struct Cli {
    /// JSON configuration file (memory, caches, units, assembler and execution options).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Assemble and execute a program, then print registers, caches and timing.
    Run {
        /// Assembly source file.
        file: PathBuf,

        /// Execute one instruction at a time, printing each step.
        #[arg(long)]
        step: bool,

        /// Abort a continuous run after this many instructions.
        #[arg(long)]
        step_limit: Option<u64>,

        /// Print values in hexadecimal instead of signed decimal.
        #[arg(long)]
        hex: bool,
    },

    /// Assemble a program and print its symbol table.
    Check {
        /// Assembly source file.
        file: PathBuf,
    },

    /// Print the assembled image: address, machine word and disassembly per slot.
    Listing {
        /// Assembly source file.
        file: PathBuf,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = load_config(cli.config.as_deref()).and_then(|config| match cli.command {
        Commands::Run {
            file,
            step,
            step_limit,
            hex,
        } => {
            let mut config = config;
            if step_limit.is_some() {
                config.execution.step_limit = step_limit;
            }
            let radix = if hex { Radix::Hex } else { Radix::Decimal };
            cmd_run(&config, &file, step, radix)
        }
        Commands::Check { file } => cmd_check(&config, &file),
        Commands::Listing { file } => cmd_listing(&config, &file),
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

/// Reads the JSON configuration, or returns the reference configuration.
fn load_config(path: Option<&Path>) -> Result<Config, String> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let text = fs::read_to_string(path)
        .map_err(|e| format!("cannot read config {}: {e}", path.display()))?;
    let config: Config = serde_json::from_str(&text)
        .map_err(|e| format!("invalid config {}: {e}", path.display()))?;
    config.validate().map_err(|e| e.to_string())?;
    debug!(path = %path.display(), "configuration loaded");
    Ok(config)
}

/// Builds a processor and assembles `file` into it.
fn assemble_file(config: &Config, file: &Path) -> Result<Processor, String> {
    let source = fs::read_to_string(file)
        .map_err(|e| format!("cannot read {}: {e}", file.display()))?;
    let mut cpu = Processor::new(config).map_err(|e| Error::from(e).to_string())?;
    let symbols = Assembler::new(config.assembler)
        .assemble(&source, &mut cpu)
        .map_err(|e| Error::from(e).to_string())?;
    info!(
        file = %file.display(),
        labels = symbols.len(),
        instructions = cpu.memory().instructions().count(),
        "assembled"
    );
    Ok(cpu)
}

fn cmd_run(config: &Config, file: &Path, stepped: bool, radix: Radix) -> Result<(), String> {
    let mut cpu = assemble_file(config, file)?;
    let capacity = cpu.memory().capacity();

    if stepped {
        let _ = cpu
            .run_observed(|cpu, instr| {
                let changed: Vec<String> = cpu
                    .registers()
                    .changed()
                    .iter()
                    .map(|reg| format!("{reg}={}", radix.word(cpu.read_reg(*reg))))
                    .collect();
                println!(
                    "{:>8}  {:<20} {}",
                    radix.address(instr.address, capacity),
                    instr.to_string(),
                    changed.join(" ")
                );
                cpu.registers_mut().clear_changes();
            })
            .map_err(|e| Error::from(e).to_string())?;
    } else {
        let _ = cpu.execute(false).map_err(|e| Error::from(e).to_string())?;
    }

    print_report(&cpu, radix);
    Ok(())
}

fn print_report(cpu: &Processor, radix: Radix) {
    let capacity = cpu.memory().capacity();
    let snapshot = cpu.registers().snapshot();

    println!();
    println!("PC = {}", radix.address(snapshot.pc, capacity));
    for (index, value) in snapshot.values.iter().enumerate() {
        println!("R{index} = {}", radix.word(*value));
    }
    if snapshot.zero_written {
        println!("(a write to R0 was attempted and discarded)");
    }

    println!();
    let icache = cpu.instruction_cache().stats();
    println!(
        "{:<5} accesses {:>6}  hits {:>6}  misses {:>6}  hit rate {:>6.2}%",
        "L1I",
        icache.accesses,
        icache.hits,
        icache.misses,
        icache.hit_rate() * 100.0
    );
    for level in cpu.data_caches() {
        let stats = level.stats();
        println!(
            "{:<5} accesses {:>6}  hits {:>6}  misses {:>6}  hit rate {:>6.2}%  write-backs {:>6}",
            level.name(),
            stats.accesses,
            stats.hits,
            stats.misses,
            stats.hit_rate() * 100.0,
            stats.writebacks
        );
    }
    println!(
        "{:<5} instruction accesses {:>6}  data accesses {:>6}",
        "MEM",
        cpu.memory().instruction_accesses(),
        cpu.memory().data_accesses()
    );

    println!();
    println!("instruction access time {}", cpu.instruction_access_time());
    println!("data access time        {}", cpu.data_access_time());

    println!();
    let units = cpu.units();
    for category in Category::ALL {
        println!("{:<14} {:>6}", category.to_string(), units.count(category));
    }
    println!("{:<14} {:>6}  ({} cycles)", "total", units.total(), units.cycles());

    let words = cpu.memory().words();
    if !words.is_empty() {
        println!();
        for (address, word) in words {
            println!("[{}] = {}", radix.address(address, capacity), radix.word(word));
        }
    }
}

fn cmd_check(config: &Config, file: &Path) -> Result<(), String> {
    let cpu = assemble_file(config, file)?;
    println!(
        "{}: {} instruction(s), {} label(s)",
        file.display(),
        cpu.memory().instructions().count(),
        cpu.symbols().len()
    );
    for (label, address) in cpu.symbols().iter() {
        println!("  {label:<16} {address}");
    }
    Ok(())
}

fn cmd_listing(config: &Config, file: &Path) -> Result<(), String> {
    let cpu = assemble_file(config, file)?;
    let memory = cpu.memory();
    let capacity = memory.capacity();

    for (slot, entry) in memory.slots().iter().enumerate() {
        let address = (slot * 2) as u32;
        match entry {
            Some(instr) => {
                let word = encode(instr).map_or_else(|_| "----".to_string(), |w| format!("{w:04X}"));
                println!("{}  {word}  {instr}", Radix::Hex.address(address, capacity));
            }
            None => {
                let word = memory.read_word(address).map_err(|e| Error::from(e).to_string())?;
                println!(
                    "{}  {word:04X}  .fill {}",
                    Radix::Hex.address(address, capacity),
                    word as i16
                );
            }
        }
    }
    Ok(())
}
