//! Formatting functions for decoded instructions

use crate::addressing::AddressingMode;
use crate::disassembler::Instruction;
use crate::opcodes::Mnemonic;

/// Format a single instruction as assembly text, e.g. `LDA ($40),Y`.
pub fn format_instruction(instr: &Instruction) -> String {
    let operand = format_operand(instr);

    if operand.is_empty() {
        instr.metadata.mnemonic.to_string()
    } else {
        format!("{} {}", instr.metadata.mnemonic, operand)
    }
}

/// Format a listing line: address, raw bytes, assembly text.
///
/// ```
/// use vic6502::{FlatMemory, disassembler};
///
/// let mut mem = FlatMemory::new();
/// mem.load(0x0400, &[0x4C, 0x00, 0x04]);
/// let line = disassembler::format_listing_line(&disassembler::decode_at(&mem, 0x0400));
/// assert_eq!(line, "$0400  4C 00 04  JMP $0400");
/// ```
pub fn format_listing_line(instr: &Instruction) -> String {
    let bytes: Vec<String> = instr.bytes().iter().map(|b| format!("{:02X}", b)).collect();
    format!(
        "${:04X}  {:<8}  {}",
        instr.address,
        bytes.join(" "),
        format_instruction(instr)
    )
}

/// Format the operand based on addressing mode
fn format_operand(instr: &Instruction) -> String {
    use AddressingMode::*;

    if instr.metadata.mnemonic == Mnemonic::Illegal {
        return format!("${:02X}", instr.opcode);
    }

    let byte = instr.operand_byte();
    let word = instr.operand_word();

    match instr.metadata.addressing_mode {
        Implicit => String::new(),
        Accumulator => "A".to_string(),
        Immediate => format!("#${:02X}", byte),
        ZeroPage => format!("${:02X}", byte),
        ZeroPageX => format!("${:02X},X", byte),
        ZeroPageY => format!("${:02X},Y", byte),
        Relative => {
            let target = instr.next_address().wrapping_add_signed(byte as i8 as i16);
            format!("${:04X}", target)
        }
        Absolute => format!("${:04X}", word),
        AbsoluteX => format!("${:04X},X", word),
        AbsoluteY => format!("${:04X},Y", word),
        Indirect => format!("(${:04X})", word),
        IndirectX => format!("(${:02X},X)", byte),
        IndirectY => format!("(${:02X}),Y", byte),
    }
}
