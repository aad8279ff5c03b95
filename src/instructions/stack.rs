//! # Stack Operations
//!
//! This module implements stack manipulation instructions:
//! - PHA / PLA: Accumulator
//! - PHP / PLP: Status register
//!
//! The 6502 stack is located at memory addresses 0x0100-0x01FF and grows downward.
//! The stack pointer (SP) is an 8-bit register that serves as an offset into this
//! page. The full stack address is calculated as 0x0100 | SP.

use crate::flags::StatusFlags;
use crate::{ExecutionError, MemoryBus, CPU};

/// Executes the PHA (Push Accumulator) instruction. No flags affected.
pub(crate) fn execute_pha<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    let a = cpu.regs.a;
    cpu.push(a);
    Ok(())
}

/// Executes the PHP (Push Processor Status) instruction.
///
/// The pushed copy has B and bit 5 set.
pub(crate) fn execute_php<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    let status = cpu.regs.p.pushed();
    cpu.push(status);
    Ok(())
}

/// Executes the PLA (Pull Accumulator) instruction. Updates Z and N.
pub(crate) fn execute_pla<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    let value = cpu.pop();
    cpu.regs.a = value;
    cpu.set_zn(value);
    Ok(())
}

/// Executes the PLP (Pull Processor Status) instruction.
///
/// B is not a stored latch and is dropped; bit 5 stays set.
pub(crate) fn execute_plp<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    let value = cpu.pop();
    cpu.regs.p = StatusFlags::pulled(value);
    Ok(())
}
