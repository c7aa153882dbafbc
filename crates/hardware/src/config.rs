//! Configuration system for the RiSC-16 simulator.
//!
//! This module defines all configuration structures and enums used to parameterize
//! the processor and the assembler. It provides:
//! 1. **Defaults:** The reference memory hierarchy and functional-unit tables.
//! 2. **Structures:** Memory, instruction cache, data-cache levels, units, assembler and execution.
//! 3. **Enums:** Write policies, replacement policy and load/store label addressing.
//! 4. **Tables:** Conversion from the integer row form used by front ends, with validation.
//!
//! Configuration is supplied as JSON (see the `risc16` binary), built from integer
//! tables with [`Config::from_tables`], or taken from `Config::default()`.

use serde::Deserialize;

use crate::common::constants::{MEMORY_MAX_BYTES, MEMORY_MIN_BYTES, WORD_BYTES};
use crate::common::error::ConfigError;
use crate::isa::instruction::Category;

/// Default configuration constants for the simulator.
///
/// These match the reference tables
/// `{1024,0,32,100}, {2,8,8,5}, {4,16,1,5,0,2}` and
/// `{6}, {1,2,1}, {1,2,2}, {1,2,5}, {1,2,10}, {1,2}, {1,2}`.
mod defaults {
    /// Backing memory capacity (1 KiB).
    pub const MEMORY_CAPACITY: u32 = 1024;

    /// Time charged per memory access.
    pub const MEMORY_ACCESS_TIME: u64 = 100;

    /// Instruction cache line size in bytes.
    pub const ICACHE_LINE: u32 = 2;

    /// Instruction cache set count.
    pub const ICACHE_SETS: u32 = 8;

    /// Instruction cache associativity.
    pub const ICACHE_WAYS: u32 = 8;

    /// Time charged per cache access.
    pub const CACHE_ACCESS_TIME: u64 = 5;

    /// Data cache line size in bytes.
    pub const DCACHE_LINE: u32 = 4;

    /// Data cache set count.
    pub const DCACHE_SETS: u32 = 16;

    /// Data cache associativity (direct-mapped).
    pub const DCACHE_WAYS: u32 = 1;

    /// Functional units per category.
    pub const UNITS: u32 = 1;

    /// Base latency per category.
    pub const UNIT_LATENCY: u32 = 2;
}

/// Data-cache write policy.
///
/// The order of the variants is the index order used by configuration tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WritePolicy {
    /// Write hits only mark the line dirty; the lower level is updated on eviction.
    #[serde(alias = "WriteBack")]
    WriteBack,
    /// Write hits update the lower level immediately.
    #[serde(alias = "WriteThrough")]
    WriteThrough,
    /// Write misses fill the line, then behave as a hit.
    #[serde(alias = "WriteAllocate")]
    WriteAllocate,
    /// Write misses go straight to the lower level without allocating.
    #[serde(alias = "NoWriteAllocate")]
    NoWriteAllocate,
}

impl WritePolicy {
    /// All policies in table index order.
    pub const ALL: [Self; 4] = [
        Self::WriteBack,
        Self::WriteThrough,
        Self::WriteAllocate,
        Self::NoWriteAllocate,
    ];

    /// Looks a policy up by its table index.
    pub fn from_index(index: i64) -> Result<Self, ConfigError> {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
            .ok_or(ConfigError::WritePolicyIndex(index))
    }

    /// Whether this policy decides what a write hit does.
    pub const fn is_hit_policy(self) -> bool {
        matches!(self, Self::WriteBack | Self::WriteThrough)
    }

    /// Whether this policy decides what a write miss does.
    pub const fn is_miss_policy(self) -> bool {
        matches!(self, Self::WriteAllocate | Self::NoWriteAllocate)
    }

    /// Human-readable name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::WriteBack => "write-back",
            Self::WriteThrough => "write-through",
            Self::WriteAllocate => "write-allocate",
            Self::NoWriteAllocate => "no-write-allocate",
        }
    }
}

/// Cache replacement policy.
///
/// Determines which way is evicted when a full set needs a new line.
/// Invalid ways are always filled first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReplacementPolicy {
    /// Evicts the way accessed least recently.
    #[default]
    #[serde(alias = "Lru")]
    Lru,
    /// Evicts ways in fill order (round-robin).
    #[serde(alias = "Fifo")]
    Fifo,
    /// Evicts a pseudo-randomly selected way.
    #[serde(alias = "Random")]
    Random,
}

/// How `lw`/`sw` label operands are stored after resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LabelAddressing {
    /// The operand holds the label's address; EA = rB + address.
    #[default]
    Absolute,
    /// The operand holds the word displacement to the label; EA = rB + PC + 2·imm.
    PcRelative,
}

/// Root configuration.
///
/// # Examples
///
/// ```
/// use risc16_core::config::{Config, WritePolicy};
///
/// let json = r#"{
///     "memory": { "capacity": 2048, "access_time": 50 },
///     "data_caches": [
///         { "line_bytes": 8, "sets": 4, "ways": 2, "access_time": 2,
///           "hit_policy": "write-through", "miss_policy": "no-write-allocate" }
///     ],
///     "assembler": { "label_addressing": "pc-relative" }
/// }"#;
///
/// let config: Config = serde_json::from_str(json).unwrap();
/// assert_eq!(config.memory.capacity, 2048);
/// assert_eq!(config.data_caches[0].hit_policy, WritePolicy::WriteThrough);
/// assert_eq!(config.instruction_cache.ways, 8);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Backing memory
    #[serde(default)]
    pub memory: MemoryConfig,
    /// Instruction cache in front of memory on the fetch path
    #[serde(default)]
    pub instruction_cache: CacheGeometry,
    /// Data-cache levels; index 0 is nearest the processor
    #[serde(default = "Config::default_data_caches")]
    pub data_caches: Vec<DataCacheConfig>,
    /// Functional units per instruction category
    #[serde(default)]
    pub units: UnitsConfig,
    /// Assembler options
    #[serde(default)]
    pub assembler: AssemblerConfig,
    /// Execution options
    #[serde(default)]
    pub execution: ExecutionConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            memory: MemoryConfig::default(),
            instruction_cache: CacheGeometry::default(),
            data_caches: Self::default_data_caches(),
            units: UnitsConfig::default(),
            assembler: AssemblerConfig::default(),
            execution: ExecutionConfig::default(),
        }
    }
}

impl Config {
    /// Returns the default data-cache hierarchy (one level).
    fn default_data_caches() -> Vec<DataCacheConfig> {
        vec![DataCacheConfig::default()]
    }

    /// Builds a configuration from integer tables.
    ///
    /// # Arguments
    ///
    /// * `storage` - Row 0 is memory `[capacity, _, _, access_time]`; row 1 the instruction
    ///   cache `[line_bytes, sets, ways, access_time]`; rows 2.. data-cache levels
    ///   `[line_bytes, sets, ways, access_time, hit_policy, miss_policy]`, nearest first.
    /// * `units` - Row 0 is `[category_count]`, then one `[units, latency, (extra_latency)]`
    ///   row per category in [`Category::ALL`] order.
    ///
    /// # Returns
    ///
    /// A validated configuration, or the first problem found.
    pub fn from_tables<S, U>(storage: &[S], units: &[U]) -> Result<Self, ConfigError>
    where
        S: AsRef<[i64]>,
        U: AsRef<[i64]>,
    {
        if storage.len() < 2 {
            return Err(ConfigError::MissingRows {
                expected: 2,
                found: storage.len(),
            });
        }
        let table = Table(storage);

        let memory = MemoryConfig {
            capacity: table.value(0, 0, 4)?,
            access_time: table.value(0, 3, 4)?,
        };
        let instruction_cache = CacheGeometry {
            line_bytes: table.value(1, 0, 4)?,
            sets: table.value(1, 1, 4)?,
            ways: table.value(1, 2, 4)?,
            access_time: table.value(1, 3, 4)?,
            policy: ReplacementPolicy::default(),
        };
        let data_caches = (2..storage.len())
            .map(|row| {
                Ok(DataCacheConfig {
                    geometry: CacheGeometry {
                        line_bytes: table.value(row, 0, 6)?,
                        sets: table.value(row, 1, 6)?,
                        ways: table.value(row, 2, 6)?,
                        access_time: table.value(row, 3, 6)?,
                        policy: ReplacementPolicy::default(),
                    },
                    hit_policy: WritePolicy::from_index(table.raw(row, 4, 6)?)?,
                    miss_policy: WritePolicy::from_index(table.raw(row, 5, 6)?)?,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        let config = Self {
            memory,
            instruction_cache,
            data_caches,
            units: UnitsConfig::from_table(units)?,
            assembler: AssemblerConfig::default(),
            execution: ExecutionConfig::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks capacity, geometry, write policies and units.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let capacity = self.memory.capacity;
        if !(MEMORY_MIN_BYTES..=MEMORY_MAX_BYTES).contains(&capacity) || !capacity.is_power_of_two()
        {
            return Err(ConfigError::MemoryCapacity(capacity));
        }

        self.instruction_cache.validate("L1I", capacity)?;
        for (level, cache) in self.data_caches.iter().enumerate() {
            cache.validate(&format!("L{}D", level + 1), capacity)?;
        }
        self.units.validate()
    }
}

/// Row access helper for integer configuration tables.
struct Table<'a, S>(&'a [S]);

impl<S: AsRef<[i64]>> Table<'_, S> {
    fn raw(&self, row: usize, column: usize, width: usize) -> Result<i64, ConfigError> {
        let values = self.0.get(row).map_or(&[][..], AsRef::as_ref);
        if values.len() < width {
            return Err(ConfigError::RowWidth {
                row,
                expected: width,
                found: values.len(),
            });
        }
        Ok(values[column])
    }

    fn value<T: TryFrom<i64>>(&self, row: usize, column: usize, width: usize) -> Result<T, ConfigError> {
        let value = self.raw(row, column, width)?;
        T::try_from(value).map_err(|_| ConfigError::NegativeValue { row, column, value })
    }
}

/// Backing memory configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MemoryConfig {
    /// Capacity in bytes; a power of two in [128 B, 4 MiB]
    #[serde(default = "MemoryConfig::default_capacity")]
    pub capacity: u32,

    /// Time charged per data access
    #[serde(default = "MemoryConfig::default_access_time")]
    pub access_time: u64,
}

impl MemoryConfig {
    /// Returns the default memory capacity in bytes.
    const fn default_capacity() -> u32 {
        defaults::MEMORY_CAPACITY
    }

    /// Returns the default memory access time.
    const fn default_access_time() -> u64 {
        defaults::MEMORY_ACCESS_TIME
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            capacity: defaults::MEMORY_CAPACITY,
            access_time: defaults::MEMORY_ACCESS_TIME,
        }
    }
}

/// Shape and timing of one cache level.
///
/// The default is the reference instruction cache (2-byte lines, 8 sets, 8 ways).
#[derive(Debug, Clone, Deserialize)]
pub struct CacheGeometry {
    /// Line size in bytes
    #[serde(default = "CacheGeometry::default_line")]
    pub line_bytes: u32,

    /// Number of sets
    #[serde(default = "CacheGeometry::default_sets")]
    pub sets: u32,

    /// Associativity (number of ways)
    #[serde(default = "CacheGeometry::default_ways")]
    pub ways: u32,

    /// Time charged per access
    #[serde(default = "CacheGeometry::default_access_time")]
    pub access_time: u64,

    /// Replacement policy
    #[serde(default)]
    pub policy: ReplacementPolicy,
}

impl CacheGeometry {
    const fn default_line() -> u32 {
        defaults::ICACHE_LINE
    }

    const fn default_sets() -> u32 {
        defaults::ICACHE_SETS
    }

    const fn default_ways() -> u32 {
        defaults::ICACHE_WAYS
    }

    const fn default_access_time() -> u64 {
        defaults::CACHE_ACCESS_TIME
    }

    /// Total data capacity of the level in bytes.
    pub const fn size_bytes(&self) -> u64 {
        self.line_bytes as u64 * self.sets as u64 * self.ways as u64
    }

    /// Rejects geometry that cannot be built in front of `capacity` bytes of memory.
    pub fn validate(&self, level: &str, capacity: u32) -> Result<(), ConfigError> {
        let reject = |reason: String| ConfigError::InvalidGeometry {
            level: level.to_string(),
            reason,
        };
        if self.line_bytes < WORD_BYTES || !self.line_bytes.is_power_of_two() {
            return Err(reject(format!(
                "line size {} must be a power of 2 of at least {WORD_BYTES} bytes",
                self.line_bytes
            )));
        }
        if self.line_bytes > capacity {
            return Err(reject(format!(
                "line size {} exceeds memory capacity {capacity}",
                self.line_bytes
            )));
        }
        if !self.sets.is_power_of_two() {
            return Err(reject(format!("set count {} must be a power of 2", self.sets)));
        }
        if !self.ways.is_power_of_two() {
            return Err(reject(format!("associativity {} must be a power of 2", self.ways)));
        }
        Ok(())
    }
}

impl Default for CacheGeometry {
    fn default() -> Self {
        Self {
            line_bytes: defaults::ICACHE_LINE,
            sets: defaults::ICACHE_SETS,
            ways: defaults::ICACHE_WAYS,
            access_time: defaults::CACHE_ACCESS_TIME,
            policy: ReplacementPolicy::default(),
        }
    }
}

/// One data-cache level.
#[derive(Debug, Clone, Deserialize)]
pub struct DataCacheConfig {
    /// Shape and timing
    #[serde(flatten)]
    pub geometry: CacheGeometry,

    /// What a write hit does (write-back or write-through)
    #[serde(default = "DataCacheConfig::default_hit_policy")]
    pub hit_policy: WritePolicy,

    /// What a write miss does (write-allocate or no-write-allocate)
    #[serde(default = "DataCacheConfig::default_miss_policy")]
    pub miss_policy: WritePolicy,
}

impl DataCacheConfig {
    const fn default_hit_policy() -> WritePolicy {
        WritePolicy::WriteBack
    }

    const fn default_miss_policy() -> WritePolicy {
        WritePolicy::WriteAllocate
    }

    /// Rejects bad geometry or a policy used in the wrong role.
    pub fn validate(&self, level: &str, capacity: u32) -> Result<(), ConfigError> {
        self.geometry.validate(level, capacity)?;
        if !self.hit_policy.is_hit_policy() {
            return Err(ConfigError::HitPolicy(self.hit_policy.name().to_string()));
        }
        if !self.miss_policy.is_miss_policy() {
            return Err(ConfigError::MissPolicy(self.miss_policy.name().to_string()));
        }
        Ok(())
    }
}

impl Default for DataCacheConfig {
    /// The reference L1 data cache: 4-byte lines, 16 sets, direct-mapped,
    /// write-back and write-allocate.
    fn default() -> Self {
        Self {
            geometry: CacheGeometry {
                line_bytes: defaults::DCACHE_LINE,
                sets: defaults::DCACHE_SETS,
                ways: defaults::DCACHE_WAYS,
                access_time: defaults::CACHE_ACCESS_TIME,
                policy: ReplacementPolicy::default(),
            },
            hit_policy: Self::default_hit_policy(),
            miss_policy: Self::default_miss_policy(),
        }
    }
}

/// Functional units for one instruction category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct UnitConfig {
    /// Number of units
    #[serde(default = "UnitConfig::default_units")]
    pub units: u32,

    /// Base latency of one instruction
    #[serde(default = "UnitConfig::default_latency")]
    pub latency: u32,

    /// Additional latency, when the category has one
    #[serde(default)]
    pub extra_latency: Option<u32>,
}

impl UnitConfig {
    const fn default_units() -> u32 {
        defaults::UNITS
    }

    const fn default_latency() -> u32 {
        defaults::UNIT_LATENCY
    }

    const fn with_extra(extra: u32) -> Self {
        Self {
            units: defaults::UNITS,
            latency: defaults::UNIT_LATENCY,
            extra_latency: Some(extra),
        }
    }

    /// Latency plus any extra latency.
    pub fn cycles(&self) -> u64 {
        u64::from(self.latency) + u64::from(self.extra_latency.unwrap_or(0))
    }
}

impl Default for UnitConfig {
    fn default() -> Self {
        Self {
            units: defaults::UNITS,
            latency: defaults::UNIT_LATENCY,
            extra_latency: None,
        }
    }
}

/// Functional units for every instruction category.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UnitsConfig {
    /// `add`, `addi`
    #[serde(default = "UnitsConfig::default_add")]
    pub add: UnitConfig,
    /// `nand`
    #[serde(default = "UnitsConfig::default_alu")]
    pub alu: UnitConfig,
    /// `lw`, `lui`
    #[serde(default = "UnitsConfig::default_load")]
    pub load: UnitConfig,
    /// `sw`
    #[serde(default = "UnitsConfig::default_store")]
    pub store: UnitConfig,
    /// `beq`
    #[serde(default)]
    pub branch: UnitConfig,
    /// `jalr`
    #[serde(default)]
    pub jump_and_link: UnitConfig,
}

impl UnitsConfig {
    const fn default_add() -> UnitConfig {
        UnitConfig::with_extra(1)
    }

    const fn default_alu() -> UnitConfig {
        UnitConfig::with_extra(2)
    }

    const fn default_load() -> UnitConfig {
        UnitConfig::with_extra(5)
    }

    const fn default_store() -> UnitConfig {
        UnitConfig::with_extra(10)
    }

    /// Units configured for `category`.
    pub const fn get(&self, category: Category) -> &UnitConfig {
        match category {
            Category::Add => &self.add,
            Category::Alu => &self.alu,
            Category::Load => &self.load,
            Category::Store => &self.store,
            Category::Branch => &self.branch,
            Category::JumpAndLink => &self.jump_and_link,
        }
    }

    const fn get_mut(&mut self, category: Category) -> &mut UnitConfig {
        match category {
            Category::Add => &mut self.add,
            Category::Alu => &mut self.alu,
            Category::Load => &mut self.load,
            Category::Store => &mut self.store,
            Category::Branch => &mut self.branch,
            Category::JumpAndLink => &mut self.jump_and_link,
        }
    }

    fn from_table<U: AsRef<[i64]>>(rows: &[U]) -> Result<Self, ConfigError> {
        let table = Table(rows);
        let declared: usize = table.value(0, 0, 1)?;
        if declared != Category::ALL.len() || rows.len() != declared + 1 {
            return Err(ConfigError::UnitRows(format!(
                "expected {} categories and {} rows, found {declared} categories and {} rows",
                Category::ALL.len(),
                Category::ALL.len() + 1,
                rows.len()
            )));
        }

        let mut units = Self::default();
        for (row, category) in (1..).zip(Category::ALL) {
            let extra = if rows[row].as_ref().len() > 2 {
                Some(table.value(row, 2, 3)?)
            } else {
                None
            };
            *units.get_mut(category) = UnitConfig {
                units: table.value(row, 0, 2)?,
                latency: table.value(row, 1, 2)?,
                extra_latency: extra,
            };
        }
        Ok(units)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for category in Category::ALL {
            if self.get(category).units == 0 {
                return Err(ConfigError::UnitRows(format!(
                    "{category} needs at least one unit"
                )));
            }
        }
        Ok(())
    }
}

impl Default for UnitsConfig {
    fn default() -> Self {
        Self {
            add: Self::default_add(),
            alu: Self::default_alu(),
            load: Self::default_load(),
            store: Self::default_store(),
            branch: UnitConfig::default(),
            jump_and_link: UnitConfig::default(),
        }
    }
}

/// Assembler options.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct AssemblerConfig {
    /// How `lw`/`sw` label operands are stored
    #[serde(default)]
    pub label_addressing: LabelAddressing,
}

/// Execution options.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ExecutionConfig {
    /// Maximum steps a continuous run may take before failing
    #[serde(default)]
    pub step_limit: Option<u64>,
}
