//! # Increment and Decrement Instructions
//!
//! This module implements increment and decrement operations:
//! - INC / DEC: Memory (no accumulator form on the NMOS 6502)
//! - INX / INY / DEX / DEY: Index registers
//!
//! All wrap at the byte boundary and update Z and N only.

use super::Operation;
use crate::{ExecutionError, MemoryBus, CPU};

/// Executes the INC (Increment Memory) instruction.
pub(crate) fn execute_inc<M: MemoryBus>(
    cpu: &mut CPU<M>,
    op: &Operation,
) -> Result<(), ExecutionError> {
    let addr = cpu.operand_address(op)?;
    let result = cpu.memory.read(addr).wrapping_add(1);
    cpu.memory.write(addr, result);
    cpu.set_zn(result);
    Ok(())
}

/// Executes the DEC (Decrement Memory) instruction.
pub(crate) fn execute_dec<M: MemoryBus>(
    cpu: &mut CPU<M>,
    op: &Operation,
) -> Result<(), ExecutionError> {
    let addr = cpu.operand_address(op)?;
    let result = cpu.memory.read(addr).wrapping_sub(1);
    cpu.memory.write(addr, result);
    cpu.set_zn(result);
    Ok(())
}

pub(crate) fn execute_inx<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    cpu.regs.x = cpu.regs.x.wrapping_add(1);
    cpu.set_zn(cpu.regs.x);
    Ok(())
}

pub(crate) fn execute_iny<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    cpu.regs.y = cpu.regs.y.wrapping_add(1);
    cpu.set_zn(cpu.regs.y);
    Ok(())
}

pub(crate) fn execute_dex<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    cpu.regs.x = cpu.regs.x.wrapping_sub(1);
    cpu.set_zn(cpu.regs.x);
    Ok(())
}

pub(crate) fn execute_dey<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    cpu.regs.y = cpu.regs.y.wrapping_sub(1);
    cpu.set_zn(cpu.regs.y);
    Ok(())
}
