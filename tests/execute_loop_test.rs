//! Tests for the fetch-execute loop: `step`, `run`, `run_for_cycles` and
//! how traps and errors leave the machine.

use std::cell::RefCell;
use std::rc::Rc;

use vic6502::{
    Breakpoints, ExecutionError, ExecutionHook, FlatMemory, Instruction, MemoryBus, Registers,
    SelfJumpHalt, Trap, TrapReason, CPU,
};

/// CPU at $0200 with `program` loaded there
fn cpu_with_program(program: &[u8]) -> CPU<FlatMemory> {
    let mut memory = FlatMemory::new();
    memory.load(0x0200, program);
    CPU::with_start(memory, 0x0200)
}

#[test]
fn test_run_stops_on_self_jump() {
    // LDX #$05 ; DEX ; BNE -3 ; JMP $0205
    let mut cpu = cpu_with_program(&[0xA2, 0x05, 0xCA, 0xD0, 0xFD, 0x4C, 0x05, 0x02]);
    cpu.add_hook(SelfJumpHalt);

    let trap = cpu.run().unwrap();

    assert_eq!(trap, Trap::new(0x0205, TrapReason::SelfJump));
    assert_eq!(cpu.pc(), 0x0205);
    assert_eq!(cpu.x(), 0x00);
    // LDX + 5 * (DEX + BNE); the JMP never ran
    assert_eq!(cpu.cycles(), 2 + 5 * 4);
}

#[test]
fn test_trap_leaves_state_untouched() {
    let mut cpu = cpu_with_program(&[0xA9, 0x01, 0xA9, 0x02]);
    cpu.add_hook(Breakpoints::from_iter([0x0202]));

    let trap = cpu.run().unwrap();
    let before = cpu.registers();
    let cycles = cpu.cycles();

    assert_eq!(trap.pc, 0x0202);
    assert_eq!(trap.reason, TrapReason::Breakpoint);
    assert_eq!(cpu.a(), 0x01);

    // Stepping again re-checks the same breakpoint
    assert_eq!(cpu.step(), Ok(Some(trap)));
    assert_eq!(cpu.registers(), before);
    assert_eq!(cpu.cycles(), cycles);
}

#[test]
fn test_resume_after_removing_hooks() {
    let mut cpu = cpu_with_program(&[0xA9, 0x01, 0xA9, 0x02]);
    cpu.add_hook(Breakpoints::from_iter([0x0202]));
    cpu.run().unwrap();

    let removed = cpu.take_hooks();
    assert_eq!(removed.len(), 1);

    assert_eq!(cpu.step(), Ok(None));
    assert_eq!(cpu.a(), 0x02);
}

#[test]
fn test_first_hook_wins() {
    // JMP * at a breakpoint: both hooks would trap
    let mut cpu = cpu_with_program(&[0x4C, 0x00, 0x02]);
    cpu.add_hook(Breakpoints::from_iter([0x0200]));
    cpu.add_hook(SelfJumpHalt);

    assert_eq!(cpu.run().unwrap().reason, TrapReason::Breakpoint);
}

#[test]
fn test_taken_branch_to_self_halts() {
    // CLC ; BCC *
    let mut cpu = cpu_with_program(&[0x18, 0x90, 0xFE]);
    cpu.add_hook(SelfJumpHalt);

    assert_eq!(cpu.run(), Ok(Trap::new(0x0201, TrapReason::SelfJump)));
}

#[test]
fn test_untaken_branch_to_self_falls_through() {
    // SEC ; BCC * ; JMP $0203
    let mut cpu = cpu_with_program(&[0x38, 0x90, 0xFE, 0x4C, 0x03, 0x02]);
    cpu.add_hook(SelfJumpHalt);

    assert_eq!(cpu.run(), Ok(Trap::new(0x0203, TrapReason::SelfJump)));
}

#[test]
fn test_run_surfaces_illegal_opcode() {
    let mut cpu = cpu_with_program(&[0xEA, 0x02]);
    cpu.add_hook(SelfJumpHalt);

    assert_eq!(
        cpu.run(),
        Err(ExecutionError::IllegalOpcode {
            opcode: 0x02,
            pc: 0x0201
        })
    );
    // The faulting instruction did not advance PC
    assert_eq!(cpu.pc(), 0x0201);
}

#[test]
fn test_run_for_cycles_slices() {
    // Endless INX loop: INX ; JMP $0200
    let mut cpu = cpu_with_program(&[0xE8, 0x4C, 0x00, 0x02]);

    assert_eq!(cpu.run_for_cycles(50), Ok(None));
    assert_eq!(cpu.cycles(), 50);
    assert_eq!(cpu.x(), 10);

    // Budget is a minimum: the instruction crossing it completes
    assert_eq!(cpu.run_for_cycles(1), Ok(None));
    assert_eq!(cpu.cycles(), 52);
}

#[test]
fn test_run_for_cycles_reports_trap() {
    let mut cpu = cpu_with_program(&[0xEA, 0x4C, 0x01, 0x02]);
    cpu.add_hook(SelfJumpHalt);

    assert_eq!(
        cpu.run_for_cycles(1_000),
        Ok(Some(Trap::new(0x0201, TrapReason::SelfJump)))
    );
}

#[test]
fn test_pc_wraps_at_top_of_memory() {
    let mut memory = FlatMemory::new();
    memory.write(0xFFFF, 0xEA);
    let mut cpu = CPU::with_start(memory, 0xFFFF);

    cpu.step().unwrap();

    assert_eq!(cpu.pc(), 0x0000);
}

/// Records every callback it receives.
#[derive(Clone, Default)]
struct Recorder {
    events: Rc<RefCell<Vec<String>>>,
}

impl<M: MemoryBus> ExecutionHook<M> for Recorder {
    fn before_execute(
        &mut self,
        regs: &Registers,
        _memory: &M,
        instruction: &Instruction,
    ) -> Option<Trap> {
        let event = format!("before {:04X} pc={:04X}", instruction.address, regs.pc);
        self.events.borrow_mut().push(event);
        None
    }

    fn after_execute(&mut self, regs: &Registers, _memory: &M, instruction: &Instruction) {
        let event = format!("after {:04X} a={:02X}", instruction.address, regs.a);
        self.events.borrow_mut().push(event);
    }

    fn on_trap(&mut self, trap: &Trap) {
        self.events.borrow_mut().push(format!("trap {}", trap));
    }
}

#[test]
fn test_hooks_see_every_phase() {
    let recorder = Recorder::default();
    let events = Rc::clone(&recorder.events);

    let mut cpu = cpu_with_program(&[0xA9, 0x07, 0x4C, 0x02, 0x02]);
    cpu.add_hook(recorder);
    cpu.add_hook(SelfJumpHalt);

    cpu.run().unwrap();

    assert_eq!(
        *events.borrow(),
        vec![
            "before 0200 pc=0200".to_string(),
            "after 0200 a=07".to_string(),
            "before 0202 pc=0202".to_string(),
            "trap self-jump at $0202".to_string(),
        ]
    );
}
