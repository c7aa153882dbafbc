//! Storage Components.
//!
//! This module organizes the storage side of the simulated machine: the backing
//! memory that terminates every cache chain, and the trait shared by everything a
//! data access can reach.

/// Backing memory and the program image.
pub mod memory;

/// Storage trait definitions.
pub mod traits;

pub use memory::Memory;
pub use traits::Storage;
