//! # Opcode Metadata Table
//!
//! The 256-entry table mapping every opcode byte to its mnemonic, addressing
//! mode, base cycle cost and length. It is the single source of truth for the
//! decoder, the disassembler and the instruction dispatcher.
//!
//! The table covers the 151 documented NMOS opcodes. The remaining 105
//! undocumented slots are [`Mnemonic::Illegal`] entries with size 1 and
//! zero cycles; fetching one is an execution error.

use std::fmt;

use crate::addressing::AddressingMode;

/// The 56 documented 6502 instructions, plus a marker for undocumented opcodes.
///
/// The dispatcher matches this enum exhaustively, so a mnemonic without a
/// handler is a compile error rather than a runtime surprise.
#[rustfmt::skip]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Mnemonic {
    Adc, And, Asl, Bcc, Bcs, Beq, Bit, Bmi, Bne, Bpl, Brk, Bvc, Bvs, Clc,
    Cld, Cli, Clv, Cmp, Cpx, Cpy, Dec, Dex, Dey, Eor, Inc, Inx, Iny, Jmp,
    Jsr, Lda, Ldx, Ldy, Lsr, Nop, Ora, Pha, Php, Pla, Plp, Rol, Ror, Rti,
    Rts, Sbc, Sec, Sed, Sei, Sta, Stx, Sty, Tax, Tay, Tsx, Txa, Txs, Tya,
    /// Undocumented opcode slot.
    Illegal,
}

impl Mnemonic {
    /// Upper-case assembler name, `"???"` for undocumented slots.
    #[rustfmt::skip]
    pub fn as_str(self) -> &'static str {
        use Mnemonic::*;

        match self {
            Adc => "ADC", And => "AND", Asl => "ASL", Bcc => "BCC", Bcs => "BCS",
            Beq => "BEQ", Bit => "BIT", Bmi => "BMI", Bne => "BNE", Bpl => "BPL",
            Brk => "BRK", Bvc => "BVC", Bvs => "BVS", Clc => "CLC", Cld => "CLD",
            Cli => "CLI", Clv => "CLV", Cmp => "CMP", Cpx => "CPX", Cpy => "CPY",
            Dec => "DEC", Dex => "DEX", Dey => "DEY", Eor => "EOR", Inc => "INC",
            Inx => "INX", Iny => "INY", Jmp => "JMP", Jsr => "JSR", Lda => "LDA",
            Ldx => "LDX", Ldy => "LDY", Lsr => "LSR", Nop => "NOP", Ora => "ORA",
            Pha => "PHA", Php => "PHP", Pla => "PLA", Plp => "PLP", Rol => "ROL",
            Ror => "ROR", Rti => "RTI", Rts => "RTS", Sbc => "SBC", Sec => "SEC",
            Sed => "SED", Sei => "SEI", Sta => "STA", Stx => "STX", Sty => "STY",
            Tax => "TAX", Tay => "TAY", Tsx => "TSX", Txa => "TXA", Txs => "TXS",
            Tya => "TYA", Illegal => "???",
        }
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata for a single 6502 opcode.
///
/// # Examples
///
/// ```
/// use vic6502::{AddressingMode, Mnemonic, OPCODE_TABLE};
///
/// let lda_imm = &OPCODE_TABLE[0xA9];
/// assert_eq!(lda_imm.mnemonic, Mnemonic::Lda);
/// assert_eq!(lda_imm.addressing_mode, AddressingMode::Immediate);
/// assert_eq!(lda_imm.base_cycles, 2);
/// assert_eq!(lda_imm.size_bytes, 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpcodeMetadata {
    /// Instruction identity; selects the handler.
    pub mnemonic: Mnemonic,

    /// Addressing mode for this instruction.
    pub addressing_mode: AddressingMode,

    /// Base cycle cost. Page-crossing penalties are not modelled.
    pub base_cycles: u8,

    /// Total instruction size in bytes (opcode + operands, 1-3).
    pub size_bytes: u8,
}

impl OpcodeMetadata {
    /// Whether this slot is a documented instruction.
    pub fn is_documented(&self) -> bool {
        self.mnemonic != Mnemonic::Illegal
    }
}

const fn op(
    mnemonic: Mnemonic,
    addressing_mode: AddressingMode,
    base_cycles: u8,
    size_bytes: u8,
) -> OpcodeMetadata {
    OpcodeMetadata {
        mnemonic,
        addressing_mode,
        base_cycles,
        size_bytes,
    }
}

const ILLEGAL: OpcodeMetadata = op(Mnemonic::Illegal, AddressingMode::Implicit, 0, 1);

use AddressingMode::*;
use Mnemonic::*;

/// Complete 256-entry opcode metadata table indexed by opcode byte value.
#[rustfmt::skip]
pub static OPCODE_TABLE: [OpcodeMetadata; 256] = [
    /* 0x00 */ op(Brk, Implicit, 7, 1),
    /* 0x01 */ op(Ora, IndirectX, 6, 2),
    /* 0x02 */ ILLEGAL,
    /* 0x03 */ ILLEGAL,
    /* 0x04 */ ILLEGAL,
    /* 0x05 */ op(Ora, ZeroPage, 3, 2),
    /* 0x06 */ op(Asl, ZeroPage, 5, 2),
    /* 0x07 */ ILLEGAL,
    /* 0x08 */ op(Php, Implicit, 3, 1),
    /* 0x09 */ op(Ora, Immediate, 2, 2),
    /* 0x0A */ op(Asl, Accumulator, 2, 1),
    /* 0x0B */ ILLEGAL,
    /* 0x0C */ ILLEGAL,
    /* 0x0D */ op(Ora, Absolute, 4, 3),
    /* 0x0E */ op(Asl, Absolute, 6, 3),
    /* 0x0F */ ILLEGAL,
    /* 0x10 */ op(Bpl, Relative, 2, 2),
    /* 0x11 */ op(Ora, IndirectY, 5, 2),
    /* 0x12 */ ILLEGAL,
    /* 0x13 */ ILLEGAL,
    /* 0x14 */ ILLEGAL,
    /* 0x15 */ op(Ora, ZeroPageX, 4, 2),
    /* 0x16 */ op(Asl, ZeroPageX, 6, 2),
    /* 0x17 */ ILLEGAL,
    /* 0x18 */ op(Clc, Implicit, 2, 1),
    /* 0x19 */ op(Ora, AbsoluteY, 4, 3),
    /* 0x1A */ ILLEGAL,
    /* 0x1B */ ILLEGAL,
    /* 0x1C */ ILLEGAL,
    /* 0x1D */ op(Ora, AbsoluteX, 4, 3),
    /* 0x1E */ op(Asl, AbsoluteX, 7, 3),
    /* 0x1F */ ILLEGAL,
    /* 0x20 */ op(Jsr, Absolute, 6, 3),
    /* 0x21 */ op(And, IndirectX, 6, 2),
    /* 0x22 */ ILLEGAL,
    /* 0x23 */ ILLEGAL,
    /* 0x24 */ op(Bit, ZeroPage, 3, 2),
    /* 0x25 */ op(And, ZeroPage, 3, 2),
    /* 0x26 */ op(Rol, ZeroPage, 5, 2),
    /* 0x27 */ ILLEGAL,
    /* 0x28 */ op(Plp, Implicit, 4, 1),
    /* 0x29 */ op(And, Immediate, 2, 2),
    /* 0x2A */ op(Rol, Accumulator, 2, 1),
    /* 0x2B */ ILLEGAL,
    /* 0x2C */ op(Bit, Absolute, 4, 3),
    /* 0x2D */ op(And, Absolute, 4, 3),
    /* 0x2E */ op(Rol, Absolute, 6, 3),
    /* 0x2F */ ILLEGAL,
    /* 0x30 */ op(Bmi, Relative, 2, 2),
    /* 0x31 */ op(And, IndirectY, 5, 2),
    /* 0x32 */ ILLEGAL,
    /* 0x33 */ ILLEGAL,
    /* 0x34 */ ILLEGAL,
    /* 0x35 */ op(And, ZeroPageX, 4, 2),
    /* 0x36 */ op(Rol, ZeroPageX, 6, 2),
    /* 0x37 */ ILLEGAL,
    /* 0x38 */ op(Sec, Implicit, 2, 1),
    /* 0x39 */ op(And, AbsoluteY, 4, 3),
    /* 0x3A */ ILLEGAL,
    /* 0x3B */ ILLEGAL,
    /* 0x3C */ ILLEGAL,
    /* 0x3D */ op(And, AbsoluteX, 4, 3),
    /* 0x3E */ op(Rol, AbsoluteX, 7, 3),
    /* 0x3F */ ILLEGAL,
    /* 0x40 */ op(Rti, Implicit, 6, 1),
    /* 0x41 */ op(Eor, IndirectX, 6, 2),
    /* 0x42 */ ILLEGAL,
    /* 0x43 */ ILLEGAL,
    /* 0x44 */ ILLEGAL,
    /* 0x45 */ op(Eor, ZeroPage, 3, 2),
    /* 0x46 */ op(Lsr, ZeroPage, 5, 2),
    /* 0x47 */ ILLEGAL,
    /* 0x48 */ op(Pha, Implicit, 3, 1),
    /* 0x49 */ op(Eor, Immediate, 2, 2),
    /* 0x4A */ op(Lsr, Accumulator, 2, 1),
    /* 0x4B */ ILLEGAL,
    /* 0x4C */ op(Jmp, Absolute, 3, 3),
    /* 0x4D */ op(Eor, Absolute, 4, 3),
    /* 0x4E */ op(Lsr, Absolute, 6, 3),
    /* 0x4F */ ILLEGAL,
    /* 0x50 */ op(Bvc, Relative, 2, 2),
    /* 0x51 */ op(Eor, IndirectY, 5, 2),
    /* 0x52 */ ILLEGAL,
    /* 0x53 */ ILLEGAL,
    /* 0x54 */ ILLEGAL,
    /* 0x55 */ op(Eor, ZeroPageX, 4, 2),
    /* 0x56 */ op(Lsr, ZeroPageX, 6, 2),
    /* 0x57 */ ILLEGAL,
    /* 0x58 */ op(Cli, Implicit, 2, 1),
    /* 0x59 */ op(Eor, AbsoluteY, 4, 3),
    /* 0x5A */ ILLEGAL,
    /* 0x5B */ ILLEGAL,
    /* 0x5C */ ILLEGAL,
    /* 0x5D */ op(Eor, AbsoluteX, 4, 3),
    /* 0x5E */ op(Lsr, AbsoluteX, 7, 3),
    /* 0x5F */ ILLEGAL,
    /* 0x60 */ op(Rts, Implicit, 6, 1),
    /* 0x61 */ op(Adc, IndirectX, 6, 2),
    /* 0x62 */ ILLEGAL,
    /* 0x63 */ ILLEGAL,
    /* 0x64 */ ILLEGAL,
    /* 0x65 */ op(Adc, ZeroPage, 3, 2),
    /* 0x66 */ op(Ror, ZeroPage, 5, 2),
    /* 0x67 */ ILLEGAL,
    /* 0x68 */ op(Pla, Implicit, 4, 1),
    /* 0x69 */ op(Adc, Immediate, 2, 2),
    /* 0x6A */ op(Ror, Accumulator, 2, 1),
    /* 0x6B */ ILLEGAL,
    /* 0x6C */ op(Jmp, Indirect, 5, 3),
    /* 0x6D */ op(Adc, Absolute, 4, 3),
    /* 0x6E */ op(Ror, Absolute, 6, 3),
    /* 0x6F */ ILLEGAL,
    /* 0x70 */ op(Bvs, Relative, 2, 2),
    /* 0x71 */ op(Adc, IndirectY, 5, 2),
    /* 0x72 */ ILLEGAL,
    /* 0x73 */ ILLEGAL,
    /* 0x74 */ ILLEGAL,
    /* 0x75 */ op(Adc, ZeroPageX, 4, 2),
    /* 0x76 */ op(Ror, ZeroPageX, 6, 2),
    /* 0x77 */ ILLEGAL,
    /* 0x78 */ op(Sei, Implicit, 2, 1),
    /* 0x79 */ op(Adc, AbsoluteY, 4, 3),
    /* 0x7A */ ILLEGAL,
    /* 0x7B */ ILLEGAL,
    /* 0x7C */ ILLEGAL,
    /* 0x7D */ op(Adc, AbsoluteX, 4, 3),
    /* 0x7E */ op(Ror, AbsoluteX, 7, 3),
    /* 0x7F */ ILLEGAL,
    /* 0x80 */ ILLEGAL,
    /* 0x81 */ op(Sta, IndirectX, 6, 2),
    /* 0x82 */ ILLEGAL,
    /* 0x83 */ ILLEGAL,
    /* 0x84 */ op(Sty, ZeroPage, 3, 2),
    /* 0x85 */ op(Sta, ZeroPage, 3, 2),
    /* 0x86 */ op(Stx, ZeroPage, 3, 2),
    /* 0x87 */ ILLEGAL,
    /* 0x88 */ op(Dey, Implicit, 2, 1),
    /* 0x89 */ ILLEGAL,
    /* 0x8A */ op(Txa, Implicit, 2, 1),
    /* 0x8B */ ILLEGAL,
    /* 0x8C */ op(Sty, Absolute, 4, 3),
    /* 0x8D */ op(Sta, Absolute, 4, 3),
    /* 0x8E */ op(Stx, Absolute, 4, 3),
    /* 0x8F */ ILLEGAL,
    /* 0x90 */ op(Bcc, Relative, 2, 2),
    /* 0x91 */ op(Sta, IndirectY, 6, 2),
    /* 0x92 */ ILLEGAL,
    /* 0x93 */ ILLEGAL,
    /* 0x94 */ op(Sty, ZeroPageX, 4, 2),
    /* 0x95 */ op(Sta, ZeroPageX, 4, 2),
    /* 0x96 */ op(Stx, ZeroPageY, 4, 2),
    /* 0x97 */ ILLEGAL,
    /* 0x98 */ op(Tya, Implicit, 2, 1),
    /* 0x99 */ op(Sta, AbsoluteY, 5, 3),
    /* 0x9A */ op(Txs, Implicit, 2, 1),
    /* 0x9B */ ILLEGAL,
    /* 0x9C */ ILLEGAL,
    /* 0x9D */ op(Sta, AbsoluteX, 5, 3),
    /* 0x9E */ ILLEGAL,
    /* 0x9F */ ILLEGAL,
    /* 0xA0 */ op(Ldy, Immediate, 2, 2),
    /* 0xA1 */ op(Lda, IndirectX, 6, 2),
    /* 0xA2 */ op(Ldx, Immediate, 2, 2),
    /* 0xA3 */ ILLEGAL,
    /* 0xA4 */ op(Ldy, ZeroPage, 3, 2),
    /* 0xA5 */ op(Lda, ZeroPage, 3, 2),
    /* 0xA6 */ op(Ldx, ZeroPage, 3, 2),
    /* 0xA7 */ ILLEGAL,
    /* 0xA8 */ op(Tay, Implicit, 2, 1),
    /* 0xA9 */ op(Lda, Immediate, 2, 2),
    /* 0xAA */ op(Tax, Implicit, 2, 1),
    /* 0xAB */ ILLEGAL,
    /* 0xAC */ op(Ldy, Absolute, 4, 3),
    /* 0xAD */ op(Lda, Absolute, 4, 3),
    /* 0xAE */ op(Ldx, Absolute, 4, 3),
    /* 0xAF */ ILLEGAL,
    /* 0xB0 */ op(Bcs, Relative, 2, 2),
    /* 0xB1 */ op(Lda, IndirectY, 5, 2),
    /* 0xB2 */ ILLEGAL,
    /* 0xB3 */ ILLEGAL,
    /* 0xB4 */ op(Ldy, ZeroPageX, 4, 2),
    /* 0xB5 */ op(Lda, ZeroPageX, 4, 2),
    /* 0xB6 */ op(Ldx, ZeroPageY, 4, 2),
    /* 0xB7 */ ILLEGAL,
    /* 0xB8 */ op(Clv, Implicit, 2, 1),
    /* 0xB9 */ op(Lda, AbsoluteY, 4, 3),
    /* 0xBA */ op(Tsx, Implicit, 2, 1),
    /* 0xBB */ ILLEGAL,
    /* 0xBC */ op(Ldy, AbsoluteX, 4, 3),
    /* 0xBD */ op(Lda, AbsoluteX, 4, 3),
    /* 0xBE */ op(Ldx, AbsoluteY, 4, 3),
    /* 0xBF */ ILLEGAL,
    /* 0xC0 */ op(Cpy, Immediate, 2, 2),
    /* 0xC1 */ op(Cmp, IndirectX, 6, 2),
    /* 0xC2 */ ILLEGAL,
    /* 0xC3 */ ILLEGAL,
    /* 0xC4 */ op(Cpy, ZeroPage, 3, 2),
    /* 0xC5 */ op(Cmp, ZeroPage, 3, 2),
    /* 0xC6 */ op(Dec, ZeroPage, 5, 2),
    /* 0xC7 */ ILLEGAL,
    /* 0xC8 */ op(Iny, Implicit, 2, 1),
    /* 0xC9 */ op(Cmp, Immediate, 2, 2),
    /* 0xCA */ op(Dex, Implicit, 2, 1),
    /* 0xCB */ ILLEGAL,
    /* 0xCC */ op(Cpy, Absolute, 4, 3),
    /* 0xCD */ op(Cmp, Absolute, 4, 3),
    /* 0xCE */ op(Dec, Absolute, 6, 3),
    /* 0xCF */ ILLEGAL,
    /* 0xD0 */ op(Bne, Relative, 2, 2),
    /* 0xD1 */ op(Cmp, IndirectY, 5, 2),
    /* 0xD2 */ ILLEGAL,
    /* 0xD3 */ ILLEGAL,
    /* 0xD4 */ ILLEGAL,
    /* 0xD5 */ op(Cmp, ZeroPageX, 4, 2),
    /* 0xD6 */ op(Dec, ZeroPageX, 6, 2),
    /* 0xD7 */ ILLEGAL,
    /* 0xD8 */ op(Cld, Implicit, 2, 1),
    /* 0xD9 */ op(Cmp, AbsoluteY, 4, 3),
    /* 0xDA */ ILLEGAL,
    /* 0xDB */ ILLEGAL,
    /* 0xDC */ ILLEGAL,
    /* 0xDD */ op(Cmp, AbsoluteX, 4, 3),
    /* 0xDE */ op(Dec, AbsoluteX, 7, 3),
    /* 0xDF */ ILLEGAL,
    /* 0xE0 */ op(Cpx, Immediate, 2, 2),
    /* 0xE1 */ op(Sbc, IndirectX, 6, 2),
    /* 0xE2 */ ILLEGAL,
    /* 0xE3 */ ILLEGAL,
    /* 0xE4 */ op(Cpx, ZeroPage, 3, 2),
    /* 0xE5 */ op(Sbc, ZeroPage, 3, 2),
    /* 0xE6 */ op(Inc, ZeroPage, 5, 2),
    /* 0xE7 */ ILLEGAL,
    /* 0xE8 */ op(Inx, Implicit, 2, 1),
    /* 0xE9 */ op(Sbc, Immediate, 2, 2),
    /* 0xEA */ op(Nop, Implicit, 2, 1),
    /* 0xEB */ ILLEGAL,
    /* 0xEC */ op(Cpx, Absolute, 4, 3),
    /* 0xED */ op(Sbc, Absolute, 4, 3),
    /* 0xEE */ op(Inc, Absolute, 6, 3),
    /* 0xEF */ ILLEGAL,
    /* 0xF0 */ op(Beq, Relative, 2, 2),
    /* 0xF1 */ op(Sbc, IndirectY, 5, 2),
    /* 0xF2 */ ILLEGAL,
    /* 0xF3 */ ILLEGAL,
    /* 0xF4 */ ILLEGAL,
    /* 0xF5 */ op(Sbc, ZeroPageX, 4, 2),
    /* 0xF6 */ op(Inc, ZeroPageX, 6, 2),
    /* 0xF7 */ ILLEGAL,
    /* 0xF8 */ op(Sed, Implicit, 2, 1),
    /* 0xF9 */ op(Sbc, AbsoluteY, 4, 3),
    /* 0xFA */ ILLEGAL,
    /* 0xFB */ ILLEGAL,
    /* 0xFC */ ILLEGAL,
    /* 0xFD */ op(Sbc, AbsoluteX, 4, 3),
    /* 0xFE */ op(Inc, AbsoluteX, 7, 3),
    /* 0xFF */ ILLEGAL,
];
