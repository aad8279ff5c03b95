//! Tests for JMP, JSR and RTS.

use vic6502::{FlatMemory, MemoryBus, CPU};

/// Helper function to create a CPU with reset vector at 0x8000
fn setup_cpu() -> CPU<FlatMemory> {
    let mut memory = FlatMemory::new();
    memory.write(0xFFFC, 0x00);
    memory.write(0xFFFD, 0x80);
    CPU::new(memory)
}

#[test]
fn test_jsr_pushes_last_byte_address() {
    let mut memory = FlatMemory::new();
    // JSR $FD3F at $FD24
    memory.load(0xFD24, &[0x20, 0x3F, 0xFD]);
    let mut cpu = CPU::with_start(memory, 0xFD24);
    let sp = cpu.sp();

    cpu.step().unwrap();

    assert_eq!(cpu.pc(), 0xFD3F);
    assert_eq!(cpu.sp(), sp.wrapping_sub(2));
    // $FD26 pushed high byte first
    assert_eq!(cpu.memory().read(0x0100 | sp as u16), 0xFD);
    assert_eq!(cpu.memory().read(0x0100 | sp.wrapping_sub(1) as u16), 0x26);
    assert_eq!(cpu.cycles(), 6);
}

#[test]
fn test_rts_returns_after_jsr() {
    let mut memory = FlatMemory::new();
    memory.load(0xFD24, &[0x20, 0x3F, 0xFD]);
    memory.write(0xFD3F, 0x60); // RTS
    let mut cpu = CPU::with_start(memory, 0xFD24);
    let sp = cpu.sp();

    cpu.step().unwrap();
    cpu.step().unwrap();

    assert_eq!(cpu.pc(), 0xFD27);
    assert_eq!(cpu.sp(), sp);
    assert_eq!(cpu.cycles(), 12);
}

#[test]
fn test_nested_subroutines() {
    let mut cpu = setup_cpu();

    // $8000: JSR $9000 ; $9000: JSR $A000 ; $A000: RTS ; $9003: RTS
    cpu.memory_mut().load(0x8000, &[0x20, 0x00, 0x90]);
    cpu.memory_mut().load(0x9000, &[0x20, 0x00, 0xA0, 0x60]);
    cpu.memory_mut().write(0xA000, 0x60);

    let pcs: Vec<u16> = (0..4)
        .map(|_| {
            cpu.step().unwrap();
            cpu.pc()
        })
        .collect();

    assert_eq!(pcs, vec![0x9000, 0xA000, 0x9003, 0x8003]);
    assert_eq!(cpu.sp(), 0xFD);
}

#[test]
fn test_jmp_absolute() {
    let mut cpu = setup_cpu();
    cpu.memory_mut().load(0x8000, &[0x4C, 0x34, 0x12]);

    cpu.step().unwrap();

    assert_eq!(cpu.pc(), 0x1234);
    assert_eq!(cpu.cycles(), 3);
}

#[test]
fn test_jmp_indirect() {
    let mut cpu = setup_cpu();
    cpu.memory_mut().load(0x8000, &[0x6C, 0x00, 0x02]);
    cpu.memory_mut().load(0x0200, &[0xCD, 0xAB]);

    cpu.step().unwrap();

    assert_eq!(cpu.pc(), 0xABCD);
    assert_eq!(cpu.cycles(), 5);
}

#[test]
fn test_jmp_indirect_reads_across_page() {
    let mut cpu = setup_cpu();

    // Pointer at $10FF: high byte comes from $1100, not $1000
    cpu.memory_mut().load(0x8000, &[0x6C, 0xFF, 0x10]);
    cpu.memory_mut().write(0x10FF, 0x34);
    cpu.memory_mut().write(0x1100, 0x12);
    cpu.memory_mut().write(0x1000, 0x56);

    cpu.step().unwrap();

    assert_eq!(cpu.pc(), 0x1234);
}
