//! Storage units between the processor and backing memory.
//!
//! This module contains the cache system: the instruction cache on the fetch path,
//! the data-cache levels on the load/store path, and their replacement policies.

/// Cache hierarchy implementation with replacement policies.
pub mod cache;
