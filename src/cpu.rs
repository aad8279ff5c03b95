//! # CPU State and Execution
//!
//! This module contains the CPU struct representing the 6502 processor state and
//! the fetch-decode-execute loop.
//!
//! ## CPU State
//!
//! The CPU maintains:
//! - **Registers**: A, X, Y, P (status), S (stack pointer), PC
//! - **Cycle counter**: sum of base cycle costs of executed instructions
//! - **Hooks**: an ordered chain of [`ExecutionHook`]s consulted around each instruction
//!
//! ## Execution Model
//!
//! One call to [`CPU::step`]:
//! 1. Fetches and decodes the instruction at PC
//! 2. Offers it to every hook; the first hook to return a [`Trap`] stops the
//!    step before anything changes
//! 3. Resolves the addressing mode into an [`Operand`]
//! 4. Advances PC past the instruction
//! 5. Runs the instruction handler
//! 6. Notifies the hooks that the instruction completed
//!
//! Because PC is advanced before the handler runs, branch targets, JSR return
//! addresses and BRK's pushed address are all computed from the address of
//! the following instruction.

use log::{debug, warn};

use crate::addressing::{AddressingMode, Operand};
use crate::disassembler::{decode_at, Instruction};
use crate::flags::StatusFlags;
use crate::hooks::ExecutionHook;
use crate::instructions;
use crate::registers::{Registers, STACK_BASE};
use crate::{ExecutionError, MemoryBus, Trap};

/// Reset vector location.
pub const RESET_VECTOR: u16 = 0xFFFC;
/// IRQ/BRK vector location.
pub const IRQ_VECTOR: u16 = 0xFFFE;

/// 6502 CPU state and execution context.
///
/// # Examples
///
/// ```
/// use vic6502::{CPU, FlatMemory, MemoryBus};
///
/// let mut memory = FlatMemory::new();
/// memory.write(0xFFFC, 0x00);
/// memory.write(0xFFFD, 0x80);
/// memory.load(0x8000, &[0xA9, 0x42]); // LDA #$42
///
/// let mut cpu = CPU::new(memory);
/// assert_eq!(cpu.pc(), 0x8000);
///
/// assert_eq!(cpu.step(), Ok(None));
/// assert_eq!(cpu.a(), 0x42);
/// assert_eq!(cpu.pc(), 0x8002);
/// assert_eq!(cpu.cycles(), 2);
/// ```
pub struct CPU<M: MemoryBus> {
    pub(crate) regs: Registers,

    /// Total base cycles of executed instructions
    pub(crate) cycles: u64,

    pub(crate) memory: M,

    hooks: Vec<Box<dyn ExecutionHook<M>>>,
}

impl<M: MemoryBus> CPU<M> {
    /// Creates a CPU with PC loaded from the reset vector at 0xFFFC/0xFFFD.
    ///
    /// S is set to 0xFD, P to `UNUSED | INTERRUPT_DISABLE`, A/X/Y to zero.
    pub fn new(memory: M) -> Self {
        let pc = memory.read_word(RESET_VECTOR);
        debug!("reset: PC=${:04X} from vector ${:04X}", pc, RESET_VECTOR);
        Self::build(memory, pc)
    }

    /// Creates a CPU starting at `pc` instead of the reset vector.
    pub fn with_start(memory: M, pc: u16) -> Self {
        debug!("reset: PC=${:04X} (override)", pc);
        Self::build(memory, pc)
    }

    fn build(memory: M, pc: u16) -> Self {
        Self {
            regs: Registers::reset(pc),
            cycles: 0,
            memory,
            hooks: Vec::new(),
        }
    }

    /// Appends a hook to the end of the chain.
    pub fn add_hook(&mut self, hook: impl ExecutionHook<M> + 'static) {
        self.hooks.push(Box::new(hook));
    }

    /// Appends an already boxed hook, such as one returned by
    /// [`take_hooks`](Self::take_hooks).
    pub fn add_boxed_hook(&mut self, hook: Box<dyn ExecutionHook<M>>) {
        self.hooks.push(hook);
    }

    /// Removes and returns all installed hooks.
    pub fn take_hooks(&mut self) -> Vec<Box<dyn ExecutionHook<M>>> {
        std::mem::take(&mut self.hooks)
    }

    /// Decodes the instruction at PC without executing it.
    pub fn decode(&self) -> Instruction {
        decode_at(&self.memory, self.regs.pc)
    }

    /// Resolves the addressing mode of `instruction` against the current
    /// registers and memory.
    ///
    /// For [`AddressingMode::Relative`] the result is the branch target,
    /// computed from the address of the following instruction.
    pub fn resolve(&self, instruction: &Instruction) -> Operand {
        use AddressingMode::*;

        let byte = instruction.operand_byte();
        let word = instruction.operand_word();
        let x = self.regs.x;
        let y = self.regs.y;

        match instruction.metadata.addressing_mode {
            Implicit => Operand::None,
            Accumulator => Operand::Accumulator,
            Immediate => Operand::Immediate(byte),
            ZeroPage => Operand::Address(byte as u16),
            ZeroPageX => Operand::Address(byte.wrapping_add(x) as u16),
            ZeroPageY => Operand::Address(byte.wrapping_add(y) as u16),
            Absolute => Operand::Address(word),
            AbsoluteX => Operand::Address(word.wrapping_add(x as u16)),
            AbsoluteY => Operand::Address(word.wrapping_add(y as u16)),
            Indirect => Operand::Address(self.memory.read_word(word)),
            IndirectX => Operand::Address(self.memory.read_zero_page_word(byte.wrapping_add(x))),
            IndirectY => {
                let base = self.memory.read_zero_page_word(byte);
                Operand::Address(base.wrapping_add(y as u16))
            }
            Relative => {
                let offset = byte as i8 as i16;
                Operand::Address(instruction.next_address().wrapping_add_signed(offset))
            }
        }
    }

    /// Executes one instruction.
    ///
    /// Returns `Ok(Some(trap))` when a hook halted execution; in that case the
    /// instruction at `trap.pc` has not run and no state has changed.
    pub fn step(&mut self) -> Result<Option<Trap>, ExecutionError> {
        let instruction = self.decode();

        if !instruction.metadata.is_documented() {
            warn!(
                "illegal opcode ${:02X} at ${:04X}",
                instruction.opcode, instruction.address
            );
            return Err(ExecutionError::IllegalOpcode {
                opcode: instruction.opcode,
                pc: instruction.address,
            });
        }

        if let Some(trap) = self.before_execute(&instruction) {
            debug!("trap: {} ({})", trap, self.regs);
            for hook in self.hooks.iter_mut() {
                hook.on_trap(&trap);
            }
            return Ok(Some(trap));
        }

        let operand = self.resolve(&instruction);
        self.regs.pc = instruction.next_address();
        instructions::execute(self, instruction.metadata, operand)?;
        self.cycles += instruction.metadata.base_cycles as u64;

        let mut hooks = std::mem::take(&mut self.hooks);
        for hook in hooks.iter_mut() {
            hook.after_execute(&self.regs, &self.memory, &instruction);
        }
        self.hooks = hooks;

        Ok(None)
    }

    fn before_execute(&mut self, instruction: &Instruction) -> Option<Trap> {
        let mut hooks = std::mem::take(&mut self.hooks);
        let (regs, memory) = (&self.regs, &self.memory);
        let trap = hooks
            .iter_mut()
            .find_map(|hook| hook.before_execute(regs, memory, instruction));
        self.hooks = hooks;
        trap
    }

    /// Steps until a hook raises a trap or an instruction fails.
    ///
    /// Without a halting hook installed this never returns on a program that
    /// loops forever.
    pub fn run(&mut self) -> Result<Trap, ExecutionError> {
        loop {
            if let Some(trap) = self.step()? {
                return Ok(trap);
            }
        }
    }

    /// Steps until at least `cycle_budget` cycles have been consumed or a
    /// trap occurs.
    ///
    /// Lets a host interleave peripheral work between slices of execution.
    pub fn run_for_cycles(&mut self, cycle_budget: u64) -> Result<Option<Trap>, ExecutionError> {
        let target = self.cycles.saturating_add(cycle_budget);

        while self.cycles < target {
            if let Some(trap) = self.step()? {
                return Ok(Some(trap));
            }
        }

        Ok(None)
    }

    // ========== Stack ==========

    /// Stores `value` at 0x0100 + S, then decrements S (wrapping).
    pub fn push(&mut self, value: u8) {
        self.memory.write(STACK_BASE | self.regs.s as u16, value);
        self.regs.s = self.regs.s.wrapping_sub(1);
    }

    /// Increments S (wrapping), then loads from 0x0100 + S.
    pub fn pop(&mut self) -> u8 {
        self.regs.s = self.regs.s.wrapping_add(1);
        self.memory.read(STACK_BASE | self.regs.s as u16)
    }

    /// Pushes the high byte, then the low byte.
    pub fn push_word(&mut self, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        self.push(hi);
        self.push(lo);
    }

    /// Pops the low byte, then the high byte.
    pub fn pop_word(&mut self) -> u16 {
        let lo = self.pop();
        let hi = self.pop();
        u16::from_le_bytes([lo, hi])
    }

    // ========== Flag helpers ==========

    /// Sets Zero iff the low byte of `result` is zero.
    pub fn affect_zero_flag(&mut self, result: impl Into<u16>) {
        let zero = result.into() & 0xFF == 0;
        self.regs.p.set(StatusFlags::ZERO, zero);
    }

    /// Sets Sign iff bit 7 of the low byte of `result` is set.
    pub fn affect_sign_flag(&mut self, result: impl Into<u16>) {
        let negative = result.into() & 0x80 != 0;
        self.regs.p.set(StatusFlags::NEGATIVE, negative);
    }

    /// Sets or clears Carry.
    pub fn affect_carry_flag(&mut self, condition: bool) {
        self.regs.p.set(StatusFlags::CARRY, condition);
    }

    /// Copies bit 6 of `value` into Overflow (BIT semantics).
    pub fn affect_overflow_flag(&mut self, value: u8) {
        self.regs.p.set(StatusFlags::OVERFLOW, value & 0x40 != 0);
    }

    // ========== Register access ==========

    /// Returns a copy of the whole register file.
    pub fn registers(&self) -> Registers {
        self.regs
    }

    /// Returns the accumulator register value.
    pub fn a(&self) -> u8 {
        self.regs.a
    }

    /// Returns the X index register value.
    pub fn x(&self) -> u8 {
        self.regs.x
    }

    /// Returns the Y index register value.
    pub fn y(&self) -> u8 {
        self.regs.y
    }

    /// Returns the program counter value.
    pub fn pc(&self) -> u16 {
        self.regs.pc
    }

    /// Returns the stack pointer value.
    ///
    /// Note: The full stack address is 0x0100 + SP. The stack grows downward from 0x01FF.
    pub fn sp(&self) -> u8 {
        self.regs.s
    }

    /// Returns the status register as a packed byte (NV-BDIZC, bit 5 set).
    pub fn status(&self) -> u8 {
        (self.regs.p | StatusFlags::UNUSED).bits()
    }

    /// Returns the status register as flags.
    pub fn flags(&self) -> StatusFlags {
        self.regs.p
    }

    /// Returns the total number of CPU cycles executed since initialization.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn set_a(&mut self, value: u8) {
        self.regs.a = value;
    }

    pub fn set_x(&mut self, value: u8) {
        self.regs.x = value;
    }

    pub fn set_y(&mut self, value: u8) {
        self.regs.y = value;
    }

    pub fn set_pc(&mut self, value: u16) {
        self.regs.pc = value;
    }

    pub fn set_sp(&mut self, value: u8) {
        self.regs.s = value;
    }

    /// Replaces the status register the way PLP does: BREAK is dropped and
    /// bit 5 always reads back as 1.
    pub fn set_status(&mut self, value: u8) {
        self.regs.p = StatusFlags::pulled(value);
    }

    /// Returns true if every flag in `flag` is set.
    pub fn flag(&self, flag: StatusFlags) -> bool {
        self.regs.p.contains(flag)
    }

    /// Sets or clears the given flag(s).
    pub fn set_flag(&mut self, flag: StatusFlags, value: bool) {
        self.regs.p.set(flag, value);
    }

    // ========== Status Flag Getters ==========

    /// Returns true if the Negative flag is set.
    pub fn flag_n(&self) -> bool {
        self.flag(StatusFlags::NEGATIVE)
    }

    /// Returns true if the Overflow flag is set.
    pub fn flag_v(&self) -> bool {
        self.flag(StatusFlags::OVERFLOW)
    }

    /// Returns true if the Break flag is set.
    pub fn flag_b(&self) -> bool {
        self.flag(StatusFlags::BREAK)
    }

    /// Returns true if the Decimal mode flag is set.
    pub fn flag_d(&self) -> bool {
        self.flag(StatusFlags::DECIMAL)
    }

    /// Returns true if the Interrupt Disable flag is set.
    pub fn flag_i(&self) -> bool {
        self.flag(StatusFlags::INTERRUPT_DISABLE)
    }

    /// Returns true if the Zero flag is set.
    pub fn flag_z(&self) -> bool {
        self.flag(StatusFlags::ZERO)
    }

    /// Returns true if the Carry flag is set.
    pub fn flag_c(&self) -> bool {
        self.flag(StatusFlags::CARRY)
    }

    pub fn set_flag_n(&mut self, value: bool) {
        self.set_flag(StatusFlags::NEGATIVE, value);
    }

    pub fn set_flag_v(&mut self, value: bool) {
        self.set_flag(StatusFlags::OVERFLOW, value);
    }

    pub fn set_flag_d(&mut self, value: bool) {
        self.set_flag(StatusFlags::DECIMAL, value);
    }

    pub fn set_flag_i(&mut self, value: bool) {
        self.set_flag(StatusFlags::INTERRUPT_DISABLE, value);
    }

    pub fn set_flag_z(&mut self, value: bool) {
        self.set_flag(StatusFlags::ZERO, value);
    }

    pub fn set_flag_c(&mut self, value: bool) {
        self.set_flag(StatusFlags::CARRY, value);
    }

    // ========== Memory access ==========

    /// Shared access to the memory bus.
    pub fn memory(&self) -> &M {
        &self.memory
    }

    /// Mutable access to the memory bus, for peripherals and test setup.
    pub fn memory_mut(&mut self) -> &mut M {
        &mut self.memory
    }

    /// Consumes the CPU and returns its memory.
    pub fn into_memory(self) -> M {
        self.memory
    }
}
