//! # Configuration Tests
//!
//! Defaults, JSON deserialization, table parsing and validation.

use pretty_assertions::assert_eq;
use rstest::rstest;

use risc16_core::common::ConfigError;
use risc16_core::config::*;
use risc16_core::isa::Category;
use risc16_core::Processor;

const STORAGE: [[i64; 6]; 3] = [
    [1024, 0, 32, 100, 0, 0],
    [2, 8, 8, 5, 0, 0],
    [4, 16, 1, 5, 0, 2],
];

const UNITS: [&[i64]; 7] = [&[6], &[1, 2, 1], &[1, 2, 2], &[1, 2, 5], &[1, 2, 10], &[1, 2], &[1, 2]];

#[test]
fn defaults_match_reference_tables() {
    let config = Config::default();
    assert_eq!(config.memory.capacity, 1024);
    assert_eq!(config.memory.access_time, 100);

    assert_eq!(config.instruction_cache.line_bytes, 2);
    assert_eq!(config.instruction_cache.sets, 8);
    assert_eq!(config.instruction_cache.ways, 8);
    assert_eq!(config.instruction_cache.access_time, 5);

    assert_eq!(config.data_caches.len(), 1);
    let l1 = &config.data_caches[0];
    assert_eq!(l1.geometry.line_bytes, 4);
    assert_eq!(l1.geometry.sets, 16);
    assert_eq!(l1.geometry.ways, 1);
    assert_eq!(l1.hit_policy, WritePolicy::WriteBack);
    assert_eq!(l1.miss_policy, WritePolicy::WriteAllocate);
    assert_eq!(l1.geometry.policy, ReplacementPolicy::Lru);

    assert_eq!(config.assembler.label_addressing, LabelAddressing::Absolute);
    assert_eq!(config.execution.step_limit, None);
    assert!(config.validate().is_ok());
}

#[test]
fn tables_build_the_default_configuration() {
    let config = Config::from_tables(&STORAGE, &UNITS).unwrap();
    let default = Config::default();

    assert_eq!(config.memory.capacity, default.memory.capacity);
    assert_eq!(config.data_caches.len(), 1);
    assert_eq!(config.data_caches[0].miss_policy, WritePolicy::WriteAllocate);
    assert_eq!(config.units, default.units);
    assert_eq!(config.units.get(Category::Store).cycles(), 12);
    assert_eq!(config.units.get(Category::Branch).extra_latency, None);
}

#[test]
fn tables_order_levels_nearest_first() {
    let storage: Vec<Vec<i64>> = vec![
        vec![2048, 0, 0, 50],
        vec![2, 8, 8, 5],
        vec![4, 16, 1, 1, 1, 3],
        vec![16, 32, 4, 10, 0, 2],
    ];
    let config = Config::from_tables(&storage, &UNITS).unwrap();

    assert_eq!(config.data_caches[0].geometry.access_time, 1);
    assert_eq!(config.data_caches[0].hit_policy, WritePolicy::WriteThrough);
    assert_eq!(config.data_caches[0].miss_policy, WritePolicy::NoWriteAllocate);
    assert_eq!(config.data_caches[1].geometry.line_bytes, 16);

    let cpu = Processor::new(&config).unwrap();
    assert_eq!(cpu.data_caches().len(), 2);
}

#[test]
fn memory_row_only_uses_capacity_and_time() {
    let storage: [Vec<i64>; 2] = [vec![256, 99, 99, 7], vec![2, 8, 8, 5]];
    let config = Config::from_tables(&storage, &UNITS).unwrap();
    assert_eq!(config.memory.capacity, 256);
    assert_eq!(config.memory.access_time, 7);
    assert!(config.data_caches.is_empty());
}

#[rstest]
#[case(vec![vec![1024, 0, 0, 100]], ConfigError::MissingRows { expected: 2, found: 1 })]
#[case(vec![vec![1024, 0, 0], vec![2, 8, 8, 5]], ConfigError::RowWidth { row: 0, expected: 4, found: 3 })]
#[case(vec![vec![1024, 0, 0, 100], vec![2, 8, 8, -5]], ConfigError::NegativeValue { row: 1, column: 3, value: -5 })]
#[case(vec![vec![1000, 0, 0, 100], vec![2, 8, 8, 5]], ConfigError::MemoryCapacity(1000))]
#[case(vec![vec![1024, 0, 0, 100], vec![2, 8, 8, 5], vec![4, 16, 1, 5, 4, 2]], ConfigError::WritePolicyIndex(4))]
#[case(vec![vec![1024, 0, 0, 100], vec![2, 8, 8, 5], vec![4, 16, 1, 5, 2, 2]], ConfigError::HitPolicy("write-allocate".to_string()))]
#[case(vec![vec![1024, 0, 0, 100], vec![2, 8, 8, 5], vec![4, 16, 1, 5, 0, 1]], ConfigError::MissPolicy("write-through".to_string()))]
fn bad_storage_tables(#[case] storage: Vec<Vec<i64>>, #[case] expected: ConfigError) {
    assert_eq!(Config::from_tables(&storage, &UNITS).unwrap_err(), expected);
}

#[rstest]
#[case(3, 8, 8)]
#[case(2, 6, 8)]
#[case(2, 8, 3)]
#[case(2048, 8, 8)]
fn bad_geometry(#[case] line: i64, #[case] sets: i64, #[case] ways: i64) {
    let storage: [Vec<i64>; 2] = [vec![1024, 0, 0, 100], vec![line, sets, ways, 5]];
    assert!(matches!(
        Config::from_tables(&storage, &UNITS),
        Err(ConfigError::InvalidGeometry { ref level, .. }) if level == "L1I"
    ));
}

#[test]
fn unit_tables_must_cover_every_category() {
    let short: [&[i64]; 3] = [&[2], &[1, 2], &[1, 2]];
    assert!(matches!(
        Config::from_tables(&STORAGE, &short),
        Err(ConfigError::UnitRows(_))
    ));

    let mut zero = UNITS;
    zero[3] = &[0, 2, 5];
    assert!(matches!(
        Config::from_tables(&STORAGE, &zero),
        Err(ConfigError::UnitRows(_))
    ));
}

#[test]
fn write_policy_indices() {
    assert_eq!(WritePolicy::from_index(0), Ok(WritePolicy::WriteBack));
    assert_eq!(WritePolicy::from_index(3), Ok(WritePolicy::NoWriteAllocate));
    assert_eq!(WritePolicy::from_index(-1), Err(ConfigError::WritePolicyIndex(-1)));
    assert!(WritePolicy::WriteThrough.is_hit_policy());
    assert!(WritePolicy::NoWriteAllocate.is_miss_policy());
}

#[test]
fn json_fills_missing_fields_with_defaults() {
    let config: Config = serde_json::from_str("{}").unwrap();
    assert_eq!(config.memory.capacity, 1024);
    assert_eq!(config.data_caches.len(), 1);
    assert_eq!(config.units, UnitsConfig::default());
}

#[test]
fn json_reads_every_section() {
    let json = r#"{
        "memory": { "capacity": 4096, "access_time": 80 },
        "instruction_cache": { "line_bytes": 4, "sets": 2, "ways": 2, "access_time": 1, "policy": "FIFO" },
        "data_caches": [
            { "line_bytes": 8, "sets": 8, "ways": 2, "access_time": 2, "policy": "RANDOM",
              "hit_policy": "write-through", "miss_policy": "no-write-allocate" },
            { "line_bytes": 16, "sets": 16, "ways": 4, "access_time": 12 }
        ],
        "units": { "load": { "units": 2, "latency": 3, "extra_latency": 4 } },
        "assembler": { "label_addressing": "pc-relative" },
        "execution": { "step_limit": 5000 }
    }"#;
    let config: Config = serde_json::from_str(json).unwrap();

    assert_eq!(config.instruction_cache.policy, ReplacementPolicy::Fifo);
    assert_eq!(config.data_caches[0].geometry.policy, ReplacementPolicy::Random);
    assert_eq!(config.data_caches[1].hit_policy, WritePolicy::WriteBack);
    assert_eq!(config.units.load.units, 2);
    assert_eq!(config.units.load.cycles(), 7);
    assert_eq!(config.units.store, UnitsConfig::default().store);
    assert_eq!(config.assembler.label_addressing, LabelAddressing::PcRelative);
    assert_eq!(config.execution.step_limit, Some(5000));
    assert!(config.validate().is_ok());
}

#[test]
fn json_policies_in_the_wrong_role_fail_validation() {
    let json = r#"{ "data_caches": [ { "hit_policy": "write-allocate" } ] }"#;
    let config: Config = serde_json::from_str(json).unwrap();
    assert_eq!(
        config.validate(),
        Err(ConfigError::HitPolicy("write-allocate".to_string()))
    );
    assert!(Processor::new(&config).is_err());
}
