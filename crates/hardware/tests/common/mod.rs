/// Processor test harness.
pub mod harness;
