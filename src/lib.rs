//! # vic6502
//!
//! An NMOS 6502 CPU core and the 64KB address space of a VIC home computer.
//!
//! The crate has two halves:
//!
//! - [`AddressSpace`]: a flat byte store whose 256 pages answer writes as RAM,
//!   ROM, screen RAM or colour RAM depending on the RAM expansion fitted.
//! - [`CPU`]: the processor engine. It decodes opcodes through the
//!   [`OPCODE_TABLE`], resolves addressing modes, runs instruction handlers
//!   and keeps the six registers. It is generic over any [`MemoryBus`].
//!
//! Peripherals (video, sound, keyboard) are not emulated here; they talk to
//! the machine only through byte reads and writes on the address space,
//! between calls to [`CPU::step`].
//!
//! ## Quick Start
//!
//! ```rust
//! use vic6502::{AddressSpace, CPU, SelfJumpHalt, TrapReason};
//!
//! let mut memory = AddressSpace::new(0);
//! // LDA #$41 ; STA $1E00 ; JMP $1005
//! memory.set_bytes(0x1000, &[0xA9, 0x41, 0x8D, 0x00, 0x1E, 0x4C, 0x05, 0x10]);
//!
//! let mut cpu = CPU::with_start(memory, 0x1000);
//! cpu.add_hook(SelfJumpHalt);
//!
//! let trap = cpu.run().unwrap();
//! assert_eq!(trap.pc, 0x1005);
//! assert_eq!(trap.reason, TrapReason::SelfJump);
//! assert_eq!(cpu.memory().get_byte(0x1E00), 0x41);
//! ```
//!
//! ## Stopping execution
//!
//! [`CPU::run`] only returns when an [`ExecutionHook`] raises a [`Trap`]
//! (a breakpoint, a self-jump) or when an [`ExecutionError`] occurs. A trap is
//! returned in `Ok`, so a harness can tell a deliberate halt from a fault.

pub mod address_space;
pub mod addressing;
pub mod config;
pub mod cpu;
pub mod disassembler;
pub mod flags;
pub mod hooks;
pub mod memory;
pub mod opcodes;
pub mod registers;

// Internal instruction implementations (not part of public API)
mod instructions;

use std::fmt;

use thiserror::Error;

pub use address_space::{AddressSpace, MemoryError, PageKind, RomImage};
pub use addressing::{AddressingMode, Operand};
pub use config::MachineConfig;
pub use cpu::CPU;
pub use disassembler::Instruction;
pub use flags::StatusFlags;
pub use hooks::{Breakpoints, ExecutionHook, Profile, ProfileCounts, SelfJumpHalt, Trace};
pub use memory::{FlatMemory, MemoryBus};
pub use opcodes::{Mnemonic, OpcodeMetadata, OPCODE_TABLE};
pub use registers::Registers;

/// Faults that stop the engine. None of them is recoverable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    /// A handler was dispatched with an addressing mode it cannot use.
    ///
    /// This points at a bad opcode table entry, never at program data.
    #[error("{mnemonic} does not support {mode:?} addressing")]
    UnsupportedAddressingMode {
        mnemonic: Mnemonic,
        mode: AddressingMode,
    },

    /// The fetched byte is an undocumented opcode.
    #[error("illegal opcode ${opcode:02X} at ${pc:04X}")]
    IllegalOpcode { opcode: u8, pc: u16 },
}

/// Why execution was halted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrapReason {
    /// The program counter reached a registered breakpoint.
    Breakpoint,
    /// The next instruction jumps or branches to itself.
    SelfJump,
}

/// A deliberate halt of the fetch loop.
///
/// `pc` is the address of the instruction that was about to run; it has not
/// been executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trap {
    pub pc: u16,
    pub reason: TrapReason,
}

impl Trap {
    pub fn new(pc: u16, reason: TrapReason) -> Self {
        Self { pc, reason }
    }
}

impl fmt::Display for Trap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self.reason {
            TrapReason::Breakpoint => "breakpoint",
            TrapReason::SelfJump => "self-jump",
        };
        write!(f, "{} at ${:04X}", reason, self.pc)
    }
}
