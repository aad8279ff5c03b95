//! Tests for the register transfers and the flag set/clear instructions.

use vic6502::{FlatMemory, MemoryBus, CPU};

/// Helper function to create a CPU with reset vector at 0x8000
fn setup_cpu() -> CPU<FlatMemory> {
    let mut memory = FlatMemory::new();
    memory.write(0xFFFC, 0x00);
    memory.write(0xFFFD, 0x80);
    CPU::new(memory)
}

fn run_one(opcode: u8, setup: impl FnOnce(&mut CPU<FlatMemory>)) -> CPU<FlatMemory> {
    let mut cpu = setup_cpu();
    cpu.memory_mut().write(0x8000, opcode);
    setup(&mut cpu);
    cpu.step().unwrap();
    assert_eq!(cpu.pc(), 0x8001);
    assert_eq!(cpu.cycles(), 2);
    cpu
}

// ========== Transfers ==========

#[test]
fn test_tax_tay() {
    let cpu = run_one(0xAA, |cpu| cpu.set_a(0x80));
    assert_eq!(cpu.x(), 0x80);
    assert!(cpu.flag_n());

    let cpu = run_one(0xA8, |cpu| cpu.set_a(0x00));
    assert_eq!(cpu.y(), 0x00);
    assert!(cpu.flag_z());
}

#[test]
fn test_txa_tya() {
    let cpu = run_one(0x8A, |cpu| cpu.set_x(0x12));
    assert_eq!(cpu.a(), 0x12);
    assert!(!cpu.flag_z() && !cpu.flag_n());

    let cpu = run_one(0x98, |cpu| cpu.set_y(0xFF));
    assert_eq!(cpu.a(), 0xFF);
    assert!(cpu.flag_n());
}

#[test]
fn test_tsx_sets_flags() {
    let cpu = run_one(0xBA, |cpu| cpu.set_sp(0x80));
    assert_eq!(cpu.x(), 0x80);
    assert!(cpu.flag_n());
}

#[test]
fn test_txs_leaves_flags_alone() {
    let cpu = run_one(0x9A, |cpu| {
        cpu.set_x(0x00);
        cpu.set_flag_z(false);
    });
    assert_eq!(cpu.sp(), 0x00);
    assert!(!cpu.flag_z());
}

// ========== Flags ==========

#[test]
fn test_carry_flag_instructions() {
    assert!(run_one(0x38, |cpu| cpu.set_flag_c(false)).flag_c()); // SEC
    assert!(!run_one(0x18, |cpu| cpu.set_flag_c(true)).flag_c()); // CLC
}

#[test]
fn test_interrupt_flag_instructions() {
    assert!(!run_one(0x58, |_| {}).flag_i()); // CLI
    assert!(run_one(0x78, |cpu| cpu.set_flag_i(false)).flag_i()); // SEI
}

#[test]
fn test_decimal_flag_instructions() {
    assert!(run_one(0xF8, |_| {}).flag_d()); // SED
    assert!(!run_one(0xD8, |cpu| cpu.set_flag_d(true)).flag_d()); // CLD
}

#[test]
fn test_clv() {
    let cpu = run_one(0xB8, |cpu| {
        cpu.set_flag_v(true);
        cpu.set_flag_c(true);
    });
    assert!(!cpu.flag_v());
    assert!(cpu.flag_c());
}

#[test]
fn test_nop_changes_nothing_but_pc() {
    let cpu = run_one(0xEA, |cpu| cpu.set_a(0x33));
    assert_eq!(cpu.a(), 0x33);
    assert_eq!(cpu.status(), 0x24);
    assert_eq!(cpu.sp(), 0xFD);
}
