//! # Shift and Rotate Instructions
//!
//! This module implements bit shift and rotate operations on the accumulator
//! or a memory byte:
//! - ASL: bit 7 to carry, 0 into bit 0
//! - LSR: bit 0 to carry, 0 into bit 7
//! - ROL: bit 7 to carry, old carry into bit 0
//! - ROR: bit 0 to carry, old carry into bit 7
//!
//! Flags affected: C, Z, N

use super::Operation;
use crate::{ExecutionError, MemoryBus, CPU};

pub(crate) fn execute_asl<M: MemoryBus>(
    cpu: &mut CPU<M>,
    op: &Operation,
) -> Result<(), ExecutionError> {
    let result = cpu.modify(op, |cpu, value| {
        cpu.affect_carry_flag(value & 0x80 != 0);
        value << 1
    })?;
    cpu.set_zn(result);
    Ok(())
}

pub(crate) fn execute_lsr<M: MemoryBus>(
    cpu: &mut CPU<M>,
    op: &Operation,
) -> Result<(), ExecutionError> {
    let result = cpu.modify(op, |cpu, value| {
        cpu.affect_carry_flag(value & 0x01 != 0);
        value >> 1
    })?;
    cpu.set_zn(result);
    Ok(())
}

pub(crate) fn execute_rol<M: MemoryBus>(
    cpu: &mut CPU<M>,
    op: &Operation,
) -> Result<(), ExecutionError> {
    let result = cpu.modify(op, |cpu, value| {
        let carry_in = cpu.flag_c() as u8;
        cpu.affect_carry_flag(value & 0x80 != 0);
        (value << 1) | carry_in
    })?;
    cpu.set_zn(result);
    Ok(())
}

pub(crate) fn execute_ror<M: MemoryBus>(
    cpu: &mut CPU<M>,
    op: &Operation,
) -> Result<(), ExecutionError> {
    let result = cpu.modify(op, |cpu, value| {
        let carry_in = (cpu.flag_c() as u8) << 7;
        cpu.affect_carry_flag(value & 0x01 != 0);
        (value >> 1) | carry_in
    })?;
    cpu.set_zn(result);
    Ok(())
}
