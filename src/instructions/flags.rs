//! # Status Flag Manipulation Instructions
//!
//! This module implements instructions that directly modify processor status flags:
//! - CLC / SEC: Carry
//! - CLI / SEI: Interrupt Disable
//! - CLD / SED: Decimal Mode
//! - CLV: Overflow
//!
//! Each touches only its named flag.

use crate::flags::StatusFlags;
use crate::{ExecutionError, MemoryBus, CPU};

pub(crate) fn execute_clc<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    cpu.regs.p.remove(StatusFlags::CARRY);
    Ok(())
}

pub(crate) fn execute_sec<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    cpu.regs.p.insert(StatusFlags::CARRY);
    Ok(())
}

pub(crate) fn execute_cli<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    cpu.regs.p.remove(StatusFlags::INTERRUPT_DISABLE);
    Ok(())
}

pub(crate) fn execute_sei<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    cpu.regs.p.insert(StatusFlags::INTERRUPT_DISABLE);
    Ok(())
}

pub(crate) fn execute_cld<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    cpu.regs.p.remove(StatusFlags::DECIMAL);
    Ok(())
}

pub(crate) fn execute_sed<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    cpu.regs.p.insert(StatusFlags::DECIMAL);
    Ok(())
}

/// There is no SEV; V is only set by ADC, SBC, BIT, PLP and RTI.
pub(crate) fn execute_clv<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    cpu.regs.p.remove(StatusFlags::OVERFLOW);
    Ok(())
}
