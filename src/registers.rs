//! # Register File

use std::fmt;

use crate::flags::StatusFlags;

/// Base address of the hardware stack page.
pub const STACK_BASE: u16 = 0x0100;

/// The six 6502 registers.
///
/// All arithmetic on these values is wrapping; the CPU uses `wrapping_add`
/// and `wrapping_sub` everywhere it touches them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registers {
    /// Accumulator
    pub a: u8,
    /// X index register
    pub x: u8,
    /// Y index register
    pub y: u8,
    /// Processor status
    pub p: StatusFlags,
    /// Stack pointer (offset into page 0x01)
    pub s: u8,
    /// Program counter
    pub pc: u16,
}

impl Registers {
    /// Power-on register state with the given program counter.
    pub fn reset(pc: u16) -> Self {
        Self {
            a: 0x00,
            x: 0x00,
            y: 0x00,
            p: StatusFlags::RESET,
            s: 0xFD,
            pc,
        }
    }

    /// Full address of the next free stack slot.
    pub fn stack_address(&self) -> u16 {
        STACK_BASE | self.s as u16
    }
}

impl fmt::Display for Registers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PC:${:04X} A:${:02X} X:${:02X} Y:${:02X} S:${:02X} P:[{}]",
            self.pc,
            self.a,
            self.x,
            self.y,
            self.s,
            self.p.to_letters()
        )
    }
}
