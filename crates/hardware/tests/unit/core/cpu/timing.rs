//! Access-Time Accounting Tests.
//!
//! Each data access charges every cache level it reaches plus memory; each fetch
//! charges the instruction cache plus memory on a miss.

use pretty_assertions::assert_eq;

use crate::common::harness::TestContext;
use risc16_core::Config;

const TWICE: &str = "lw r1, r0, data\nlw r2, r0, data\nhalt\ndata: .fill 9";

#[test]
fn second_load_of_a_line_is_faster() {
    let mut ctx = TestContext::new().load(TWICE);
    let first = ctx.step().annotation.unwrap().execution_time.unwrap();
    let second = ctx.step().annotation.unwrap().execution_time.unwrap();

    assert_eq!(first, 105);
    assert_eq!(second, 5);
    assert!(second < first);
    assert_eq!(ctx.reg(2), 9);
}

#[test]
fn data_time_sums_levels_and_memory() {
    let mut ctx = TestContext::new().load(TWICE);
    assert!(ctx.run().unwrap());

    let l1 = ctx.cpu.data_cache(0).unwrap().stats();
    assert_eq!(l1.accesses, 2);
    assert_eq!(l1.hits, 1);
    assert_eq!(l1.misses, 1);
    assert_eq!(ctx.cpu.memory().data_accesses(), 1);
    assert_eq!(ctx.cpu.data_access_time(), 2 * 5 + 100);
}

#[test]
fn fetches_charge_the_instruction_cache() {
    let mut ctx = TestContext::new().load("loop: addi r1, r1, 1\nbeq r1, r2, loop\nhalt");
    ctx.set_reg(2, 1);
    assert!(ctx.run().unwrap());

    // addi, beq (taken), addi, beq, halt: the second pass hits both lines.
    let icache = ctx.cpu.instruction_cache().stats();
    assert_eq!(icache.accesses, 5);
    assert_eq!(icache.hits, 2);
    assert_eq!(ctx.cpu.memory().instruction_accesses(), 3);
    assert_eq!(ctx.cpu.instruction_access_time(), 5 * 5 + 3 * 100);
}

#[test]
fn without_data_caches_loads_go_to_memory() {
    let mut config = Config::default();
    config.data_caches.clear();
    let mut ctx = TestContext::with_config(&config).load(TWICE);

    let first = ctx.step().annotation.unwrap().execution_time.unwrap();
    let second = ctx.step().annotation.unwrap().execution_time.unwrap();
    assert_eq!((first, second), (100, 100));
    assert!(ctx.cpu.data_caches().is_empty());
}

#[test]
fn unit_cycles_include_access_time() {
    let mut ctx = TestContext::new().load(TWICE);
    assert!(ctx.run().unwrap());

    let executed = ctx.cpu.units().executed();
    assert_eq!(executed.len(), 3);
    // load: latency 2 + extra 5, plus the access time the step reported.
    assert_eq!(executed[0].cycles, 7 + 105);
    assert_eq!(executed[1].cycles, 7 + 5);
    assert_eq!(executed[2].cycles, 2);
    assert_eq!(ctx.cpu.units().cycles(), 112 + 12 + 2);
}
