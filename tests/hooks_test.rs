//! Tests for the bundled execution hooks running inside the CPU loop.

use vic6502::{Breakpoints, FlatMemory, Mnemonic, Profile, SelfJumpHalt, Trace, TrapReason, CPU};

/// Counts down X from 3 then halts:
/// $0200 LDX #$03 ; $0202 DEX ; $0203 BNE $0202 ; $0205 JMP $0205
fn countdown_cpu() -> CPU<FlatMemory> {
    let mut memory = FlatMemory::new();
    memory.load(0x0200, &[0xA2, 0x03, 0xCA, 0xD0, 0xFD, 0x4C, 0x05, 0x02]);
    CPU::with_start(memory, 0x0200)
}

#[test]
fn test_trace_never_traps() {
    let mut cpu = countdown_cpu();
    cpu.add_hook(Trace);
    cpu.add_hook(SelfJumpHalt);

    let trap = cpu.run().unwrap();

    assert_eq!(trap.pc, 0x0205);
    assert_eq!(cpu.x(), 0);
}

#[test]
fn test_profile_counts_loop_body() {
    let profile = Profile::new();
    let counts = profile.counts();

    let mut cpu = countdown_cpu();
    cpu.add_hook(profile.clone());
    cpu.add_hook(SelfJumpHalt);
    cpu.run().unwrap();

    let counts = counts.borrow();
    assert_eq!(counts.total, 1 + 3 + 3);
    assert_eq!(counts.by_mnemonic[&Mnemonic::Dex], 3);
    assert_eq!(counts.by_mnemonic[&Mnemonic::Bne], 3);
    assert_eq!(counts.by_address[&0x0200], 1);
    // The trapping JMP never executed
    assert!(!counts.by_address.contains_key(&0x0205));

    assert_eq!(counts.hottest_addresses(2), vec![(0x0202, 3), (0x0203, 3)]);
}

#[test]
fn test_profile_report_renders_listing() {
    let profile = Profile::new().with_report_size(3);

    let mut cpu = countdown_cpu();
    cpu.add_hook(profile.clone());
    cpu.add_hook(SelfJumpHalt);
    cpu.run().unwrap();

    let report = profile.report(cpu.memory(), 1);
    assert_eq!(report.len(), 1);
    assert!(report[0].trim_start().starts_with('3'));
    assert!(report[0].ends_with("DEX"));
}

#[test]
fn test_breakpoint_inside_loop_hits_each_pass() {
    let mut cpu = countdown_cpu();
    cpu.add_hook(Breakpoints::from_iter([0x0202]));
    cpu.add_hook(SelfJumpHalt);

    let trap = cpu.run().unwrap();
    assert_eq!(trap.reason, TrapReason::Breakpoint);
    assert_eq!(cpu.x(), 3);

    // Stepping past the breakpoint requires running without it
    let hooks = cpu.take_hooks();
    cpu.step().unwrap();
    for hook in hooks {
        cpu.add_boxed_hook(hook);
    }

    let trap = cpu.run().unwrap();
    assert_eq!(trap.pc, 0x0202);
    assert_eq!(cpu.x(), 2);
}
