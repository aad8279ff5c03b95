//! # Control Flow Instructions
//!
//! This module implements control flow operations:
//! - JMP: Jump to address (absolute or indirect)
//! - JSR / RTS: Subroutine call and return
//! - BRK / RTI: Software interrupt and return from interrupt
//! - NOP: No operation
//!
//! Return addresses follow the 6502 convention: JSR pushes the address of its
//! own last byte (PC - 1) and RTS adds one after popping. BRK pushes the
//! address two bytes past the BRK opcode.

use super::Operation;
use crate::cpu::IRQ_VECTOR;
use crate::flags::StatusFlags;
use crate::{ExecutionError, MemoryBus, CPU};

/// Executes the JMP (Jump) instruction.
///
/// Indirect targets are read with a plain 16-bit fetch; a pointer at $xxFF
/// takes its high byte from the next page.
pub(crate) fn execute_jmp<M: MemoryBus>(
    cpu: &mut CPU<M>,
    op: &Operation,
) -> Result<(), ExecutionError> {
    cpu.regs.pc = cpu.operand_address(op)?;
    Ok(())
}

/// Executes the JSR (Jump to Subroutine) instruction.
///
/// Pushes PC - 1 (PC already points past the 3-byte instruction), then jumps.
pub(crate) fn execute_jsr<M: MemoryBus>(
    cpu: &mut CPU<M>,
    op: &Operation,
) -> Result<(), ExecutionError> {
    let target = cpu.operand_address(op)?;
    let return_address = cpu.regs.pc.wrapping_sub(1);

    cpu.push_word(return_address);
    cpu.regs.pc = target;

    Ok(())
}

/// Executes the RTS (Return from Subroutine) instruction.
pub(crate) fn execute_rts<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    cpu.regs.pc = cpu.pop_word().wrapping_add(1);
    Ok(())
}

/// Executes the BRK (Force Interrupt) instruction.
///
/// 1. Pushes PC + 1 (the BRK address + 2; the byte after BRK is a padding byte)
/// 2. Pushes the status register with B and bit 5 set
/// 3. Sets the I flag
/// 4. Loads PC from the IRQ vector at $FFFE/$FFFF
pub(crate) fn execute_brk<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    let return_address = cpu.regs.pc.wrapping_add(1);
    cpu.push_word(return_address);

    let status = cpu.regs.p.pushed();
    cpu.push(status);

    cpu.regs.p.insert(StatusFlags::INTERRUPT_DISABLE);
    cpu.regs.pc = cpu.memory.read_word(IRQ_VECTOR);

    Ok(())
}

/// Executes the RTI (Return from Interrupt) instruction.
///
/// Pops the status register (B ignored) then the program counter. Unlike
/// RTS, the popped address is used as is.
pub(crate) fn execute_rti<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    let status = cpu.pop();
    cpu.regs.p = StatusFlags::pulled(status);
    cpu.regs.pc = cpu.pop_word();
    Ok(())
}

/// Executes the NOP (No Operation) instruction.
pub(crate) fn execute_nop<M: MemoryBus>(_cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    Ok(())
}
