//! # Load and Store Instructions
//!
//! This module implements load and store operations:
//! - LDA / LDX / LDY: Load a register, updating Z and N
//! - STA / STX / STY: Store a register, no flags affected
//!
//! Stores go through the bus, so a store into a ROM page of the
//! [`AddressSpace`](crate::AddressSpace) is silently dropped.

use super::Operation;
use crate::{ExecutionError, MemoryBus, CPU};

/// Executes the LDA (Load Accumulator) instruction.
pub(crate) fn execute_lda<M: MemoryBus>(
    cpu: &mut CPU<M>,
    op: &Operation,
) -> Result<(), ExecutionError> {
    let value = cpu.operand_value(op)?;
    cpu.regs.a = value;
    cpu.set_zn(value);
    Ok(())
}

/// Executes the LDX (Load X Register) instruction.
pub(crate) fn execute_ldx<M: MemoryBus>(
    cpu: &mut CPU<M>,
    op: &Operation,
) -> Result<(), ExecutionError> {
    let value = cpu.operand_value(op)?;
    cpu.regs.x = value;
    cpu.set_zn(value);
    Ok(())
}

/// Executes the LDY (Load Y Register) instruction.
pub(crate) fn execute_ldy<M: MemoryBus>(
    cpu: &mut CPU<M>,
    op: &Operation,
) -> Result<(), ExecutionError> {
    let value = cpu.operand_value(op)?;
    cpu.regs.y = value;
    cpu.set_zn(value);
    Ok(())
}

/// Executes the STA (Store Accumulator) instruction.
pub(crate) fn execute_sta<M: MemoryBus>(
    cpu: &mut CPU<M>,
    op: &Operation,
) -> Result<(), ExecutionError> {
    let addr = cpu.operand_address(op)?;
    cpu.memory.write(addr, cpu.regs.a);
    Ok(())
}

/// Executes the STX (Store X Register) instruction.
pub(crate) fn execute_stx<M: MemoryBus>(
    cpu: &mut CPU<M>,
    op: &Operation,
) -> Result<(), ExecutionError> {
    let addr = cpu.operand_address(op)?;
    cpu.memory.write(addr, cpu.regs.x);
    Ok(())
}

/// Executes the STY (Store Y Register) instruction.
pub(crate) fn execute_sty<M: MemoryBus>(
    cpu: &mut CPU<M>,
    op: &Operation,
) -> Result<(), ExecutionError> {
    let addr = cpu.operand_address(op)?;
    cpu.memory.write(addr, cpu.regs.y);
    Ok(())
}
