//! Cache Replacement Policy Tests.
//!
//! Verifies the victim selection logic for LRU, FIFO and Random policies in isolation,
//! then the tag store's rule that invalid ways are filled before any eviction.

use pretty_assertions::assert_eq;

use risc16_core::config::{CacheGeometry, ReplacementPolicy as PolicyType};
use risc16_core::core::units::cache::TagStore;
use risc16_core::core::units::cache::policies::{
    FifoPolicy, LruPolicy, RandomPolicy, ReplacementPolicy,
};

// ══════════════════════════════════════════════════════════
// 1. LRU Policy
// ══════════════════════════════════════════════════════════

/// A fresh set ages ways from the highest index down, so way 3 goes first.
#[test]
fn lru_initial_victim_is_last_way() {
    let mut policy = LruPolicy::new(1, 4);
    assert_eq!(policy.get_victim(0), 3);
}

/// Access 0,1,2,3 then re-access 0: the LRU becomes 1.
#[test]
fn lru_evicts_true_lru_after_reaccess() {
    let mut policy = LruPolicy::new(1, 4);
    for way in 0..4 {
        policy.update(0, way);
    }
    assert_eq!(policy.get_victim(0), 0);

    policy.update(0, 0);
    assert_eq!(policy.get_victim(0), 1);

    policy.update(0, 1);
    assert_eq!(policy.get_victim(0), 2);
}

#[test]
fn lru_sets_are_independent() {
    let mut policy = LruPolicy::new(2, 2);
    policy.update(0, 1);
    policy.update(0, 0);
    assert_eq!(policy.get_victim(0), 1);
    assert_eq!(policy.get_victim(1), 1);

    policy.update(1, 1);
    assert_eq!(policy.get_victim(1), 0);
    assert_eq!(policy.get_victim(0), 1);
}

#[test]
fn lru_reset_restores_initial_order() {
    let mut policy = LruPolicy::new(1, 4);
    policy.update(0, 3);
    policy.reset();
    assert_eq!(policy.get_victim(0), 3);
}

// ══════════════════════════════════════════════════════════
// 2. FIFO Policy
// ══════════════════════════════════════════════════════════

#[test]
fn fifo_evicts_in_fill_order() {
    let mut policy = FifoPolicy::new(1, 4);
    for way in 0..4 {
        assert_eq!(policy.get_victim(0), way);
        policy.fill(0, way);
    }
    assert_eq!(policy.get_victim(0), 0);
}

#[test]
fn fifo_hits_do_not_move_the_pointer() {
    let mut policy = FifoPolicy::new(1, 4);
    policy.fill(0, 0);
    policy.fill(0, 1);
    policy.update(0, 0);
    policy.update(0, 3);
    assert_eq!(policy.get_victim(0), 2);
}

// ══════════════════════════════════════════════════════════
// 3. Random Policy
// ══════════════════════════════════════════════════════════

#[test]
fn random_victims_are_in_range() {
    let mut policy = RandomPolicy::new(1, 8);
    for _ in 0..1000 {
        assert!(policy.get_victim(0) < 8);
    }
}

#[test]
fn random_sequence_is_reproducible_after_reset() {
    let mut policy = RandomPolicy::new(1, 4);
    let first: Vec<usize> = (0..16).map(|_| policy.get_victim(0)).collect();
    policy.reset();
    let second: Vec<usize> = (0..16).map(|_| policy.get_victim(0)).collect();
    assert_eq!(first, second);
}

#[test]
fn single_way_always_evicts_way_zero() {
    let mut policy = RandomPolicy::new(4, 1);
    assert!((0..32).all(|_| policy.get_victim(0) == 0));
}

// ══════════════════════════════════════════════════════════
// 4. Tag store
// ══════════════════════════════════════════════════════════

fn store(policy: PolicyType, sets: u32, ways: u32) -> TagStore {
    TagStore::new(&CacheGeometry {
        line_bytes: 4,
        sets,
        ways,
        access_time: 1,
        policy,
    })
}

#[test]
fn invalid_ways_fill_first() {
    let mut tags = store(PolicyType::Lru, 1, 4);
    for (i, address) in [0_u32, 4, 8, 12].into_iter().enumerate() {
        assert_eq!(tags.probe(address), None);
        let way = tags.victim(address);
        assert_eq!(way, i);
        assert_eq!(tags.install(address, way), None);
    }
    assert_eq!(tags.valid_lines(), 4);
}

#[test]
fn lru_store_evicts_least_recent_line() {
    let mut tags = store(PolicyType::Lru, 1, 2);
    for address in [0, 4] {
        let way = tags.victim(address);
        let _ = tags.install(address, way);
    }
    assert_eq!(tags.probe(0), Some(0));

    let way = tags.victim(8);
    assert_eq!(way, 1);
    let evicted = tags.install(8, way).unwrap();
    assert_eq!(evicted.address, 4);
    assert!(!evicted.dirty);
}

#[test]
fn fifo_store_ignores_hits() {
    let mut tags = store(PolicyType::Fifo, 1, 2);
    for address in [0, 4] {
        let way = tags.victim(address);
        let _ = tags.install(address, way);
    }
    assert_eq!(tags.probe(0), Some(0));

    let way = tags.victim(8);
    assert_eq!(way, 0);
    assert_eq!(tags.install(8, way).map(|e| e.address), Some(0));
}

#[test]
fn addresses_map_to_sets_by_line() {
    let tags = store(PolicyType::Lru, 16, 1);
    assert_eq!(tags.locate(0), (0, 0));
    assert_eq!(tags.locate(6), (1, 0));
    assert_eq!(tags.locate(64), (0, 1));
    assert_eq!(tags.line_base(7), 4);
}

#[test]
fn dirty_lines_report_their_base_address() {
    let mut tags = store(PolicyType::Lru, 16, 1);
    let way = tags.victim(70);
    let _ = tags.install(70, way);
    let (set, _) = tags.locate(70);
    tags.mark_dirty(set, way);

    assert!(tags.is_dirty(68));
    let dirty = tags.take_dirty();
    assert_eq!(dirty.len(), 1);
    assert_eq!(dirty[0].0, 68);
    assert!(!tags.is_dirty(68));
}
