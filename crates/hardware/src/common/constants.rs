//! Global Machine Constants.
//!
//! This module defines machine-wide constants used across the simulator. It includes:
//! 1. **Word Constants:** Word width and the byte size of one instruction slot.
//! 2. **Register Constants:** Size of the register file and the hardwired-zero index.
//! 3. **Immediate Ranges:** Bounds enforced by the assembler for every immediate form.
//! 4. **Memory Bounds:** The configurable capacity window for backing memory.

/// Size of one machine word (and one instruction slot) in bytes.
pub const WORD_BYTES: u32 = 2;

/// Number of general-purpose registers.
pub const REGISTER_COUNT: usize = 8;

/// Index of the hardwired-zero register.
pub const REG_ZERO: usize = 0;

/// Smallest signed 7-bit immediate (`addi`, `lw`, `sw`, `beq`).
pub const SIMM_MIN: i32 = -64;

/// Largest signed 7-bit immediate.
pub const SIMM_MAX: i32 = 63;

/// Largest unsigned 10-bit upper immediate accepted by `lui`.
pub const UIMM_MAX: i32 = 0x3FF;

/// Largest full-word immediate accepted by `movi`.
pub const WORD_IMM_MAX: i32 = 0xFFFF;

/// Smallest literal accepted by `.fill` (most negative signed word).
pub const FILL_MIN: i32 = -0x8000;

/// Mask selecting the low six bits that `lli` and `movi` place with `addi`.
pub const LOW_IMM_MASK: i32 = 0x3F;

/// Shift between a full word and its `lui` upper part.
pub const UPPER_IMM_SHIFT: u32 = 6;

/// Smallest allowed memory capacity in bytes.
pub const MEMORY_MIN_BYTES: u32 = 128;

/// Largest allowed memory capacity in bytes (4 MiB).
pub const MEMORY_MAX_BYTES: u32 = 4 * 1024 * 1024;

/// Address at which execution starts after a clear.
pub const START_PC: u32 = 0;
