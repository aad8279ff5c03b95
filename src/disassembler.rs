//! 6502 Disassembler Module
//!
//! Decodes instructions straight off a [`MemoryBus`](crate::MemoryBus) and
//! renders them as assembly text. The CPU uses the same decoder for its fetch
//! step, so traces always agree with what was executed.

pub mod decoder;
pub mod formatter;

pub use decoder::{decode_at, disassemble_range};
pub use formatter::{format_instruction, format_listing_line};

use crate::opcodes::OpcodeMetadata;

/// A single decoded instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    /// Memory address where this instruction starts
    pub address: u16,

    /// The opcode byte value (0x00-0xFF)
    pub opcode: u8,

    /// Table entry for the opcode
    pub metadata: &'static OpcodeMetadata,

    /// Operand bytes; only the first `size() - 1` are meaningful
    pub operand_bytes: [u8; 2],
}

impl Instruction {
    /// Total length in bytes, opcode included.
    pub fn size(&self) -> u16 {
        self.metadata.size_bytes as u16
    }

    /// Address of the instruction that follows this one.
    pub fn next_address(&self) -> u16 {
        self.address.wrapping_add(self.size())
    }

    /// First operand byte (zero-page address, immediate value, branch offset).
    pub fn operand_byte(&self) -> u8 {
        self.operand_bytes[0]
    }

    /// Both operand bytes as a little-endian word.
    pub fn operand_word(&self) -> u16 {
        u16::from_le_bytes(self.operand_bytes)
    }

    /// Raw bytes of the instruction as they appear in memory.
    pub fn bytes(&self) -> Vec<u8> {
        let mut bytes = vec![self.opcode];
        bytes.extend_from_slice(&self.operand_bytes[..self.size() as usize - 1]);
        bytes
    }
}
