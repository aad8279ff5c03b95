//! # Execution Hooks
//!
//! Pluggable observers consulted by [`CPU::step`](crate::CPU::step) around
//! every instruction. Hooks are held in an ordered chain; the first one to
//! return a [`Trap`] from [`ExecutionHook::before_execute`] stops the step.
//!
//! | Hook            | Purpose                                        |
//! |-----------------|------------------------------------------------|
//! | [`Breakpoints`] | Halt when PC reaches a registered address      |
//! | [`SelfJumpHalt`]| Halt on `JMP *` or a taken `Bxx *`             |
//! | [`Trace`]       | Log every instruction at `trace` level         |
//! | [`Profile`]     | Count executions per mnemonic and per address  |

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use log::{info, log_enabled, trace, Level};

use crate::addressing::AddressingMode;
use crate::disassembler::{decode_at, format_listing_line, Instruction};
use crate::flags::StatusFlags;
use crate::opcodes::Mnemonic;
use crate::registers::Registers;
use crate::{MemoryBus, Trap, TrapReason};

/// Observer of the fetch-execute loop.
///
/// All methods have no-op defaults so a hook implements only what it needs.
pub trait ExecutionHook<M: MemoryBus> {
    /// Called after decode, before anything executes. Returning a trap halts
    /// the step with PC still on `instruction`.
    fn before_execute(
        &mut self,
        _regs: &Registers,
        _memory: &M,
        _instruction: &Instruction,
    ) -> Option<Trap> {
        None
    }

    /// Called once `instruction` has run; `regs` reflect its effect.
    fn after_execute(&mut self, _regs: &Registers, _memory: &M, _instruction: &Instruction) {}

    /// Called on every hook when any hook raises a trap.
    fn on_trap(&mut self, _trap: &Trap) {}
}

/// Set of addresses at which execution halts.
///
/// ```
/// use vic6502::{Breakpoints, CPU, FlatMemory, TrapReason};
///
/// let mut memory = FlatMemory::new();
/// memory.load(0x0200, &[0xEA, 0xEA, 0xEA]);
///
/// let mut cpu = CPU::with_start(memory, 0x0200);
/// cpu.add_hook(Breakpoints::from_iter([0x0202]));
///
/// let trap = cpu.run().unwrap();
/// assert_eq!(trap.pc, 0x0202);
/// assert_eq!(trap.reason, TrapReason::Breakpoint);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Breakpoints {
    addresses: HashSet<u16>,
}

impl Breakpoints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if `address` was already set.
    pub fn insert(&mut self, address: u16) -> bool {
        self.addresses.insert(address)
    }

    pub fn remove(&mut self, address: u16) -> bool {
        self.addresses.remove(&address)
    }

    pub fn contains(&self, address: u16) -> bool {
        self.addresses.contains(&address)
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }
}

impl FromIterator<u16> for Breakpoints {
    fn from_iter<I: IntoIterator<Item = u16>>(iter: I) -> Self {
        Self {
            addresses: iter.into_iter().collect(),
        }
    }
}

impl<M: MemoryBus> ExecutionHook<M> for Breakpoints {
    fn before_execute(
        &mut self,
        regs: &Registers,
        _memory: &M,
        _instruction: &Instruction,
    ) -> Option<Trap> {
        self.contains(regs.pc)
            .then(|| Trap::new(regs.pc, TrapReason::Breakpoint))
    }
}

/// Halts when the next instruction would jump to itself.
///
/// Test ROMs signal completion (and failure) with `JMP *` or a branch with
/// offset -2. A branch only traps when it would be taken, so a `BNE *`
/// guarding a failure path falls through normally.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelfJumpHalt;

impl SelfJumpHalt {
    fn is_self_jump(regs: &Registers, instruction: &Instruction) -> bool {
        let metadata = instruction.metadata;
        match metadata.addressing_mode {
            AddressingMode::Absolute => {
                metadata.mnemonic == Mnemonic::Jmp
                    && instruction.operand_word() == instruction.address
            }
            AddressingMode::Relative => {
                instruction.operand_byte() == 0xFE && branch_taken(metadata.mnemonic, regs.p)
            }
            _ => false,
        }
    }
}

fn branch_taken(mnemonic: Mnemonic, p: StatusFlags) -> bool {
    match mnemonic {
        Mnemonic::Bcc => !p.contains(StatusFlags::CARRY),
        Mnemonic::Bcs => p.contains(StatusFlags::CARRY),
        Mnemonic::Bne => !p.contains(StatusFlags::ZERO),
        Mnemonic::Beq => p.contains(StatusFlags::ZERO),
        Mnemonic::Bpl => !p.contains(StatusFlags::NEGATIVE),
        Mnemonic::Bmi => p.contains(StatusFlags::NEGATIVE),
        Mnemonic::Bvc => !p.contains(StatusFlags::OVERFLOW),
        Mnemonic::Bvs => p.contains(StatusFlags::OVERFLOW),
        _ => false,
    }
}

impl<M: MemoryBus> ExecutionHook<M> for SelfJumpHalt {
    fn before_execute(
        &mut self,
        regs: &Registers,
        _memory: &M,
        instruction: &Instruction,
    ) -> Option<Trap> {
        Self::is_self_jump(regs, instruction)
            .then(|| Trap::new(instruction.address, TrapReason::SelfJump))
    }
}

/// Logs each instruction before it runs, at `trace` level:
///
/// ```text
/// $0400  D8        CLD                PC:$0400 A:$00 X:$00 Y:$00 S:$FD P:[-----I--]
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Trace;

impl<M: MemoryBus> ExecutionHook<M> for Trace {
    fn before_execute(
        &mut self,
        regs: &Registers,
        _memory: &M,
        instruction: &Instruction,
    ) -> Option<Trap> {
        if log_enabled!(Level::Trace) {
            trace!("{:<34} {}", format_listing_line(instruction), regs);
        }
        None
    }
}

/// Execution counts gathered by [`Profile`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileCounts {
    pub by_mnemonic: HashMap<Mnemonic, u64>,
    pub by_address: HashMap<u16, u64>,
    pub total: u64,
}

impl ProfileCounts {
    /// The `n` most executed addresses, busiest first (ties by address).
    pub fn hottest_addresses(&self, n: usize) -> Vec<(u16, u64)> {
        top_n(&self.by_address, n)
    }

    /// The `n` most executed mnemonics, busiest first.
    pub fn hottest_mnemonics(&self, n: usize) -> Vec<(Mnemonic, u64)> {
        top_n(&self.by_mnemonic, n)
    }
}

fn top_n<K: Copy + Ord>(counts: &HashMap<K, u64>, n: usize) -> Vec<(K, u64)> {
    let mut entries: Vec<(K, u64)> = counts.iter().map(|(&k, &v)| (k, v)).collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    entries.truncate(n);
    entries
}

/// Counts executed instructions.
///
/// The counts live behind a shared handle so they stay readable after the
/// hook has been moved into the CPU:
///
/// ```
/// use vic6502::{CPU, FlatMemory, Mnemonic, Profile};
///
/// let mut memory = FlatMemory::new();
/// memory.load(0x0200, &[0xE8, 0xE8, 0xEA]); // INX ; INX ; NOP
///
/// let profile = Profile::new();
/// let counts = profile.counts();
///
/// let mut cpu = CPU::with_start(memory, 0x0200);
/// cpu.add_hook(profile);
/// cpu.run_for_cycles(6).unwrap();
///
/// assert_eq!(counts.borrow().by_mnemonic[&Mnemonic::Inx], 2);
/// assert_eq!(counts.borrow().total, 3);
/// ```
#[derive(Debug, Clone)]
pub struct Profile {
    counts: Rc<RefCell<ProfileCounts>>,
    report_size: usize,
}

impl Profile {
    pub fn new() -> Self {
        Self {
            counts: Rc::default(),
            report_size: 10,
        }
    }

    /// Number of entries logged in the summary when execution traps.
    pub fn with_report_size(mut self, report_size: usize) -> Self {
        self.report_size = report_size;
        self
    }

    pub fn counts(&self) -> Rc<RefCell<ProfileCounts>> {
        Rc::clone(&self.counts)
    }

    /// Hottest `n` addresses, rendered as listing lines against `memory`.
    pub fn report<M: MemoryBus + ?Sized>(&self, memory: &M, n: usize) -> Vec<String> {
        self.counts
            .borrow()
            .hottest_addresses(n)
            .into_iter()
            .map(|(address, count)| {
                let instruction = decode_at(memory, address);
                format!("{:>10}  {}", count, format_listing_line(&instruction))
            })
            .collect()
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: MemoryBus> ExecutionHook<M> for Profile {
    fn after_execute(&mut self, _regs: &Registers, _memory: &M, instruction: &Instruction) {
        let mut counts = self.counts.borrow_mut();
        let mnemonic = instruction.metadata.mnemonic;
        *counts.by_mnemonic.entry(mnemonic).or_default() += 1;
        *counts.by_address.entry(instruction.address).or_default() += 1;
        counts.total += 1;
    }

    fn on_trap(&mut self, trap: &Trap) {
        let counts = self.counts.borrow();
        info!("profile: {} instructions before {}", counts.total, trap);
        for (mnemonic, count) in counts.hottest_mnemonics(self.report_size) {
            info!("profile: {:>10}  {}", count, mnemonic);
        }
        for (address, count) in counts.hottest_addresses(self.report_size) {
            info!("profile: {:>10}  ${:04X}", count, address);
        }
    }
}
