//! Write Policy Tests.
//!
//! A single data-cache level in front of memory, exercised for each combination of
//! write-hit policy (write-back, write-through) and write-miss policy
//! (write-allocate, no-write-allocate).

use pretty_assertions::assert_eq;
use rstest::rstest;

use risc16_core::config::{CacheGeometry, DataCacheConfig, MemoryConfig, ReplacementPolicy, WritePolicy};
use risc16_core::core::units::cache::DataCache;
use risc16_core::soc::Memory;

fn level(hit: WritePolicy, miss: WritePolicy) -> (DataCache, Memory) {
    let config = DataCacheConfig {
        geometry: CacheGeometry {
            line_bytes: 4,
            sets: 16,
            ways: 1,
            access_time: 5,
            policy: ReplacementPolicy::Lru,
        },
        hit_policy: hit,
        miss_policy: miss,
    };
    let memory = Memory::new(&MemoryConfig::default()).unwrap();
    (DataCache::new("L1D", &config), memory)
}

#[test]
fn read_miss_then_hit() {
    let (mut cache, mut memory) = level(WritePolicy::WriteBack, WritePolicy::WriteAllocate);
    memory.write_word(8, 0xCAFE).unwrap();

    let mut buf = [0; 2];
    cache.read(8, &mut buf, &mut memory).unwrap();
    assert_eq!(buf, [0xCA, 0xFE]);
    cache.read(10, &mut buf, &mut memory).unwrap();

    let stats = cache.stats();
    assert_eq!((stats.accesses, stats.hits, stats.misses), (2, 1, 1));
    assert_eq!(memory.data_accesses(), 1);
    assert!((stats.hit_rate() - 0.5).abs() < f64::EPSILON);
}

#[test]
fn write_back_defers_memory_until_flush() {
    let (mut cache, mut memory) = level(WritePolicy::WriteBack, WritePolicy::WriteAllocate);
    cache.write(4, &[0x12, 0x34], &mut memory).unwrap();

    assert_eq!(memory.read_word(4), Ok(0));
    assert!(cache.is_dirty(4));

    cache.flush(&mut memory).unwrap();
    assert_eq!(memory.read_word(4), Ok(0x1234));
    assert!(!cache.is_dirty(4));
    assert_eq!(cache.stats().writebacks, 1);

    cache.flush(&mut memory).unwrap();
    assert_eq!(cache.stats().writebacks, 1);
}

#[test]
fn write_through_updates_memory_immediately() {
    let (mut cache, mut memory) = level(WritePolicy::WriteThrough, WritePolicy::WriteAllocate);
    cache.write(4, &[0x12, 0x34], &mut memory).unwrap();

    assert_eq!(memory.read_word(4), Ok(0x1234));
    assert!(!cache.is_dirty(4));
    assert_eq!(cache.valid_lines(), 1);
}

#[test]
fn no_write_allocate_bypasses_the_level() {
    let (mut cache, mut memory) = level(WritePolicy::WriteBack, WritePolicy::NoWriteAllocate);
    cache.write(20, &[0, 7], &mut memory).unwrap();

    assert_eq!(memory.read_word(20), Ok(7));
    assert_eq!(cache.valid_lines(), 0);
    assert_eq!(cache.stats().misses, 1);

    let mut buf = [0; 2];
    cache.read(20, &mut buf, &mut memory).unwrap();
    assert_eq!(buf, [0, 7]);
    cache.write(20, &[0, 8], &mut memory).unwrap();
    assert_eq!(cache.stats().hits, 1);
    assert!(cache.is_dirty(20));
}

#[test]
fn dirty_victim_is_written_back_on_eviction() {
    let (mut cache, mut memory) = level(WritePolicy::WriteBack, WritePolicy::WriteAllocate);
    cache.write(0, &[0xAB, 0xCD], &mut memory).unwrap();

    // 64 bytes further maps to the same set of a 16 x 4-byte direct-mapped level.
    let mut buf = [0; 2];
    cache.read(64, &mut buf, &mut memory).unwrap();

    assert_eq!(memory.read_word(0), Ok(0xABCD));
    assert_eq!(cache.stats().writebacks, 1);
    assert!(!cache.is_dirty(0));
}

#[rstest]
#[case(WritePolicy::WriteBack, WritePolicy::WriteAllocate, 0)]
#[case(WritePolicy::WriteThrough, WritePolicy::WriteAllocate, 0x0102)]
#[case(WritePolicy::WriteBack, WritePolicy::NoWriteAllocate, 0x0102)]
#[case(WritePolicy::WriteThrough, WritePolicy::NoWriteAllocate, 0x0102)]
fn memory_visibility_before_flush(
    #[case] hit: WritePolicy,
    #[case] miss: WritePolicy,
    #[case] visible: u16,
) {
    let (mut cache, mut memory) = level(hit, miss);
    cache.write(12, &[0x01, 0x02], &mut memory).unwrap();
    assert_eq!(memory.read_word(12), Ok(visible));

    cache.flush(&mut memory).unwrap();
    assert_eq!(memory.read_word(12), Ok(0x0102));
}

#[test]
fn clear_drops_lines_and_counters() {
    let (mut cache, mut memory) = level(WritePolicy::WriteBack, WritePolicy::WriteAllocate);
    cache.write(0, &[1, 1], &mut memory).unwrap();
    cache.clear();

    assert_eq!(cache.valid_lines(), 0);
    assert_eq!(cache.stats().accesses, 0);
    assert!(!cache.is_dirty(0));
}
