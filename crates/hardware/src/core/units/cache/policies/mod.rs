//! Cache Replacement Policies.
//!
//! Implements the algorithms for selecting victim ways in set-associative caches.
//! Invalid ways are filled before any policy is consulted.
//!
//! # Policies
//!
//! - `Lru`: Least Recently Used (default).
//! - `Fifo`: First-In, First-Out.
//! - `Random`: Pseudo-random selection.

use std::fmt;

use crate::config::ReplacementPolicy as PolicyType;

/// First-In, First-Out replacement policy.
pub mod fifo;

/// Least Recently Used replacement policy.
pub mod lru;

/// Random replacement policy.
pub mod random;

pub use fifo::FifoPolicy;
pub use lru::LruPolicy;
pub use random::RandomPolicy;

/// Trait for cache replacement policies.
///
/// Defines the interface for updating usage state and selecting victim ways.
pub trait ReplacementPolicy: fmt::Debug + Send + Sync {
    /// Updates the policy state when a way is hit.
    ///
    /// # Arguments
    ///
    /// * `set` - The cache set index.
    /// * `way` - The way index within the set that was accessed.
    fn update(&mut self, set: usize, way: usize);

    /// Updates the policy state when a way receives a newly filled line.
    ///
    /// Defaults to treating the fill as an access.
    fn fill(&mut self, set: usize, way: usize) {
        self.update(set, way);
    }

    /// Selects a victim way to evict from a full set.
    ///
    /// # Arguments
    ///
    /// * `set` - The cache set index.
    ///
    /// # Returns
    ///
    /// The index of the way to evict.
    fn get_victim(&mut self, set: usize) -> usize;

    /// Returns the policy to its initial state.
    fn reset(&mut self);
}

/// Builds the policy selected by configuration.
pub fn build(policy: PolicyType, sets: usize, ways: usize) -> Box<dyn ReplacementPolicy> {
    match policy {
        PolicyType::Lru => Box::new(LruPolicy::new(sets, ways)),
        PolicyType::Fifo => Box::new(FifoPolicy::new(sets, ways)),
        PolicyType::Random => Box::new(RandomPolicy::new(sets, ways)),
    }
}
