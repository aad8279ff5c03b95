//! # 6502 Instruction Implementations
//!
//! This module contains the implementations of all 56 documented 6502
//! instructions, organized by category. Each handler takes the CPU (with PC
//! already pointing past the instruction) and the resolved [`Operation`].
//!
//! ## Categories
//!
//! - **alu**: Arithmetic and logic operations (ADC, SBC, AND, ORA, EOR, CMP, CPX, CPY, BIT)
//! - **branches**: Conditional branch instructions (BCC, BCS, BEQ, BNE, BMI, BPL, BVC, BVS)
//! - **shifts**: Shift and rotate operations (ASL, LSR, ROL, ROR)
//! - **load_store**: Load and store instructions (LDA, LDX, LDY, STA, STX, STY)
//! - **inc_dec**: Increment and decrement operations (INC, DEC, INX, INY, DEX, DEY)
//! - **control**: Control flow instructions (JMP, JSR, RTS, RTI, BRK, NOP)
//! - **stack**: Stack operations (PHA, PHP, PLA, PLP)
//! - **flags**: Status flag manipulation (CLC, SEC, CLI, SEI, CLD, SED, CLV)
//! - **transfer**: Register transfer operations (TAX, TAY, TXA, TYA, TSX, TXS)

pub mod alu;
pub mod branches;
pub mod control;
pub mod flags;
pub mod inc_dec;
pub mod load_store;
pub mod shifts;
pub mod stack;
pub mod transfer;

use crate::addressing::Operand;
use crate::flags::StatusFlags;
use crate::opcodes::{Mnemonic, OpcodeMetadata};
use crate::{ExecutionError, MemoryBus, CPU};

/// One instruction execution: the table entry plus its resolved operand.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Operation {
    pub metadata: &'static OpcodeMetadata,
    pub operand: Operand,
}

impl Operation {
    pub fn unsupported(&self) -> ExecutionError {
        ExecutionError::UnsupportedAddressingMode {
            mnemonic: self.metadata.mnemonic,
            mode: self.metadata.addressing_mode,
        }
    }
}

/// Dispatches to the handler for `metadata.mnemonic`.
pub(crate) fn execute<M: MemoryBus>(
    cpu: &mut CPU<M>,
    metadata: &'static OpcodeMetadata,
    operand: Operand,
) -> Result<(), ExecutionError> {
    use Mnemonic::*;

    let op = Operation { metadata, operand };
    let p = cpu.regs.p;

    match metadata.mnemonic {
        Adc => alu::execute_adc(cpu, &op),
        Sbc => alu::execute_sbc(cpu, &op),
        And => alu::execute_and(cpu, &op),
        Ora => alu::execute_ora(cpu, &op),
        Eor => alu::execute_eor(cpu, &op),
        Cmp => alu::execute_cmp(cpu, &op),
        Cpx => alu::execute_cpx(cpu, &op),
        Cpy => alu::execute_cpy(cpu, &op),
        Bit => alu::execute_bit(cpu, &op),

        Bcc => branches::execute_branch(cpu, &op, !p.contains(StatusFlags::CARRY)),
        Bcs => branches::execute_branch(cpu, &op, p.contains(StatusFlags::CARRY)),
        Bne => branches::execute_branch(cpu, &op, !p.contains(StatusFlags::ZERO)),
        Beq => branches::execute_branch(cpu, &op, p.contains(StatusFlags::ZERO)),
        Bpl => branches::execute_branch(cpu, &op, !p.contains(StatusFlags::NEGATIVE)),
        Bmi => branches::execute_branch(cpu, &op, p.contains(StatusFlags::NEGATIVE)),
        Bvc => branches::execute_branch(cpu, &op, !p.contains(StatusFlags::OVERFLOW)),
        Bvs => branches::execute_branch(cpu, &op, p.contains(StatusFlags::OVERFLOW)),

        Asl => shifts::execute_asl(cpu, &op),
        Lsr => shifts::execute_lsr(cpu, &op),
        Rol => shifts::execute_rol(cpu, &op),
        Ror => shifts::execute_ror(cpu, &op),

        Lda => load_store::execute_lda(cpu, &op),
        Ldx => load_store::execute_ldx(cpu, &op),
        Ldy => load_store::execute_ldy(cpu, &op),
        Sta => load_store::execute_sta(cpu, &op),
        Stx => load_store::execute_stx(cpu, &op),
        Sty => load_store::execute_sty(cpu, &op),

        Inc => inc_dec::execute_inc(cpu, &op),
        Dec => inc_dec::execute_dec(cpu, &op),
        Inx => inc_dec::execute_inx(cpu),
        Iny => inc_dec::execute_iny(cpu),
        Dex => inc_dec::execute_dex(cpu),
        Dey => inc_dec::execute_dey(cpu),

        Jmp => control::execute_jmp(cpu, &op),
        Jsr => control::execute_jsr(cpu, &op),
        Rts => control::execute_rts(cpu),
        Rti => control::execute_rti(cpu),
        Brk => control::execute_brk(cpu),
        Nop => control::execute_nop(cpu),

        Pha => stack::execute_pha(cpu),
        Php => stack::execute_php(cpu),
        Pla => stack::execute_pla(cpu),
        Plp => stack::execute_plp(cpu),

        Clc => flags::execute_clc(cpu),
        Sec => flags::execute_sec(cpu),
        Cli => flags::execute_cli(cpu),
        Sei => flags::execute_sei(cpu),
        Cld => flags::execute_cld(cpu),
        Sed => flags::execute_sed(cpu),
        Clv => flags::execute_clv(cpu),

        Tax => transfer::execute_tax(cpu),
        Tay => transfer::execute_tay(cpu),
        Txa => transfer::execute_txa(cpu),
        Tya => transfer::execute_tya(cpu),
        Tsx => transfer::execute_tsx(cpu),
        Txs => transfer::execute_txs(cpu),

        Illegal => Err(op.unsupported()),
    }
}

/// Operand plumbing shared by the handlers.
impl<M: MemoryBus> CPU<M> {
    /// Value an instruction reads: the immediate byte or the byte at the
    /// effective address.
    pub(crate) fn operand_value(&self, op: &Operation) -> Result<u8, ExecutionError> {
        match op.operand {
            Operand::Immediate(value) => Ok(value),
            Operand::Address(addr) => Ok(self.memory.read(addr)),
            Operand::Accumulator | Operand::None => Err(op.unsupported()),
        }
    }

    /// Effective address an instruction writes or jumps to.
    pub(crate) fn operand_address(&self, op: &Operation) -> Result<u16, ExecutionError> {
        match op.operand {
            Operand::Address(addr) => Ok(addr),
            _ => Err(op.unsupported()),
        }
    }

    /// Read-modify-write on the accumulator or a memory byte.
    ///
    /// `f` receives the CPU (for carry in/out) and the old value, and returns
    /// the new one. The new value is returned for flag updates.
    pub(crate) fn modify(
        &mut self,
        op: &Operation,
        f: impl FnOnce(&mut Self, u8) -> u8,
    ) -> Result<u8, ExecutionError> {
        match op.operand {
            Operand::Accumulator => {
                let value = self.regs.a;
                let result = f(self, value);
                self.regs.a = result;
                Ok(result)
            }
            Operand::Address(addr) => {
                let value = self.memory.read(addr);
                let result = f(self, value);
                self.memory.write(addr, result);
                Ok(result)
            }
            Operand::Immediate(_) | Operand::None => Err(op.unsupported()),
        }
    }

    /// Updates Zero and Sign from `value`.
    pub(crate) fn set_zn(&mut self, value: u8) {
        self.affect_zero_flag(value);
        self.affect_sign_flag(value);
    }
}
