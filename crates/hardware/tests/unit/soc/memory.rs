//! Backing Memory Tests.

use pretty_assertions::assert_eq;
use rstest::rstest;

use risc16_core::common::{ConfigError, StorageError};
use risc16_core::config::MemoryConfig;
use risc16_core::isa::{Instruction, Opcode};
use risc16_core::soc::{Memory, Storage};

fn memory(capacity: u32) -> Memory {
    Memory::new(&MemoryConfig {
        capacity,
        access_time: 10,
    })
    .unwrap()
}

#[rstest]
#[case(64)]
#[case(1000)]
#[case(8 * 1024 * 1024)]
fn capacity_must_be_a_power_of_two_in_range(#[case] capacity: u32) {
    let err = Memory::new(&MemoryConfig {
        capacity,
        access_time: 1,
    })
    .unwrap_err();
    assert_eq!(err, ConfigError::MemoryCapacity(capacity));
}

#[test]
fn unset_bytes_read_zero() {
    let mem = memory(128);
    assert_eq!(mem.read_word(126), Ok(0));
    assert!(mem.bytes().is_empty());
}

#[rstest]
#[case(-2, StorageError::InvalidAddress(-2))]
#[case(128, StorageError::InvalidAddress(128))]
#[case(5, StorageError::MisalignedWord(5))]
fn word_addresses_are_checked(#[case] address: i64, #[case] expected: StorageError) {
    assert_eq!(memory(128).check_word(address), Err(expected));
}

#[test]
fn storage_accesses_count_once_per_call() {
    let mut mem = memory(256);
    mem.write(10, &[1, 2, 3, 4]).unwrap();

    let mut buf = [0; 4];
    mem.read(10, &mut buf).unwrap();
    assert_eq!(buf, [1, 2, 3, 4]);
    assert_eq!(mem.data_accesses(), 2);
    assert_eq!(mem.instruction_accesses(), 0);
}

#[test]
fn storage_rejects_spans_past_the_end() {
    let mut mem = memory(128);
    let mut buf = [0; 4];
    assert_eq!(
        mem.read(126, &mut buf),
        Err(StorageError::InvalidAddress(129))
    );
    assert_eq!(mem.data_accesses(), 0);
}

#[test]
fn words_skip_zeroes() {
    let mut mem = memory(128);
    mem.write_word(2, 0x0100).unwrap();
    mem.write_word(4, 0).unwrap();
    mem.write_word(6, 0x00FF).unwrap();

    assert_eq!(mem.words(), vec![(2, 0x0100), (6, 0x00FF)]);
    assert_eq!(mem.bytes(), vec![(2, 0x01), (7, 0xFF)]);
}

#[test]
fn image_slots_track_instructions() {
    let mut mem = memory(128);
    mem.reserve(0).unwrap();
    mem.load_instruction(Instruction::new(2, Opcode::Add, Vec::new()))
        .unwrap();

    assert!(mem.has_instructions());
    assert_eq!(mem.last_instruction_address(), Some(2));
    assert_eq!(mem.instruction(0), Err(StorageError::NoInstruction(0)));
    assert_eq!(mem.instruction(4), Err(StorageError::NoInstruction(4)));

    let fetched = mem.fetch_instruction(2).unwrap();
    assert_eq!(fetched.opcode, Opcode::Add);
    assert_eq!(mem.instruction_accesses(), 1);
}

#[test]
fn image_cannot_grow_past_capacity() {
    let mut mem = memory(128);
    assert_eq!(
        mem.reserve(128),
        Err(StorageError::ProgramTooLarge { capacity: 128 })
    );
}

#[test]
fn clear_forgets_everything() {
    let mut mem = memory(128);
    mem.write_word(0, 9).unwrap();
    mem.load_instruction(Instruction::new(2, Opcode::Add, Vec::new()))
        .unwrap();
    let _ = mem.fetch_instruction(2).unwrap();

    mem.clear();
    assert_eq!(mem.read_word(0), Ok(0));
    assert!(!mem.has_instructions());
    assert_eq!(mem.instruction_accesses(), 0);
}
