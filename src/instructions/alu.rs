//! # ALU (Arithmetic Logic Unit) Instructions
//!
//! This module implements arithmetic and logical operations:
//! - ADC / SBC: Add / Subtract with Carry, binary or packed BCD
//! - AND / ORA / EOR: Bitwise logic into the accumulator
//! - CMP / CPX / CPY: Register comparison
//! - BIT: Bit test
//!
//! ## Decimal mode
//!
//! With the D flag set, ADC and SBC treat both operands as two packed BCD
//! digits and apply the decimal correction nibble by nibble. Flags follow the
//! NMOS part: for ADC, Z comes from the binary sum while N and V come from the
//! intermediate result after the low-digit correction; for SBC, N, V and Z all
//! come from the binary difference. C is the decimal carry (ADC) or the
//! binary borrow (SBC), which coincide for valid BCD input.

use super::Operation;
use crate::flags::StatusFlags;
use crate::{ExecutionError, MemoryBus, CPU};

/// Executes the ADC (Add with Carry) instruction.
///
/// Flags affected: C, Z, V, N
pub(crate) fn execute_adc<M: MemoryBus>(
    cpu: &mut CPU<M>,
    op: &Operation,
) -> Result<(), ExecutionError> {
    let value = cpu.operand_value(op)?;

    if cpu.flag_d() {
        add_decimal(cpu, value);
    } else {
        add_binary(cpu, value);
    }

    Ok(())
}

/// Executes the SBC (Subtract with Carry) instruction.
///
/// Carry set on entry means "no borrow".
///
/// Flags affected: C, Z, V, N
pub(crate) fn execute_sbc<M: MemoryBus>(
    cpu: &mut CPU<M>,
    op: &Operation,
) -> Result<(), ExecutionError> {
    let value = cpu.operand_value(op)?;

    if cpu.flag_d() {
        subtract_decimal(cpu, value);
    } else {
        // A - M - !C == A + !M + C
        add_binary(cpu, !value);
    }

    Ok(())
}

fn add_binary<M: MemoryBus>(cpu: &mut CPU<M>, value: u8) {
    let a = cpu.regs.a;
    let carry_in = cpu.flag_c() as u16;

    let sum = a as u16 + value as u16 + carry_in;
    let result = sum as u8;

    cpu.affect_carry_flag(sum > 0xFF);
    cpu.set_zn(result);
    // Both operands share a sign that the result does not
    let overflow = (a ^ result) & (value ^ result) & 0x80 != 0;
    cpu.regs.p.set(StatusFlags::OVERFLOW, overflow);

    cpu.regs.a = result;
}

fn add_decimal<M: MemoryBus>(cpu: &mut CPU<M>, value: u8) {
    let a = cpu.regs.a as u16;
    let m = value as u16;
    let carry_in = cpu.flag_c() as u16;

    let mut lo = (a & 0x0F) + (m & 0x0F) + carry_in;
    let mut hi = (a >> 4) + (m >> 4);
    if lo > 0x09 {
        lo += 0x06;
    }
    if lo > 0x0F {
        hi += 1;
    }

    let intermediate = ((hi << 4) | (lo & 0x0F)) as u8;
    cpu.affect_zero_flag((a + m + carry_in) as u8);
    cpu.affect_sign_flag(intermediate);
    cpu.regs.p.set(
        StatusFlags::OVERFLOW,
        (a as u8 ^ intermediate) & !(a as u8 ^ value) & 0x80 != 0,
    );

    if hi > 0x09 {
        hi += 0x06;
    }
    cpu.affect_carry_flag(hi > 0x0F);

    cpu.regs.a = (((hi & 0x0F) << 4) | (lo & 0x0F)) as u8;
}

fn subtract_decimal<M: MemoryBus>(cpu: &mut CPU<M>, value: u8) {
    let a = cpu.regs.a;
    let borrow = (!cpu.flag_c()) as i16;

    // Flags come from the binary subtraction
    let binary = a as i16 - value as i16 - borrow;
    let binary_result = binary as u8;
    cpu.affect_carry_flag(binary >= 0);
    cpu.set_zn(binary_result);
    cpu.regs.p.set(
        StatusFlags::OVERFLOW,
        (a ^ value) & (a ^ binary_result) & 0x80 != 0,
    );

    let mut lo = (a & 0x0F) as i16 - (value & 0x0F) as i16 - borrow;
    let mut hi = (a >> 4) as i16 - (value >> 4) as i16;
    if lo < 0 {
        lo -= 0x06;
        hi -= 1;
    }
    if hi < 0 {
        hi -= 0x06;
    }

    cpu.regs.a = (((hi & 0x0F) << 4) | (lo & 0x0F)) as u8;
}

/// Executes the AND (Logical AND) instruction.
///
/// Flags affected: Z, N
pub(crate) fn execute_and<M: MemoryBus>(
    cpu: &mut CPU<M>,
    op: &Operation,
) -> Result<(), ExecutionError> {
    let value = cpu.operand_value(op)?;
    cpu.regs.a &= value;
    cpu.set_zn(cpu.regs.a);
    Ok(())
}

/// Executes the ORA (Logical Inclusive OR) instruction.
///
/// Flags affected: Z, N
pub(crate) fn execute_ora<M: MemoryBus>(
    cpu: &mut CPU<M>,
    op: &Operation,
) -> Result<(), ExecutionError> {
    let value = cpu.operand_value(op)?;
    cpu.regs.a |= value;
    cpu.set_zn(cpu.regs.a);
    Ok(())
}

/// Executes the EOR (Exclusive OR) instruction.
///
/// Flags affected: Z, N
pub(crate) fn execute_eor<M: MemoryBus>(
    cpu: &mut CPU<M>,
    op: &Operation,
) -> Result<(), ExecutionError> {
    let value = cpu.operand_value(op)?;
    cpu.regs.a ^= value;
    cpu.set_zn(cpu.regs.a);
    Ok(())
}

/// Computes `register - value` and sets flags without storing the result.
///
/// C is set when `register >= value` (no borrow).
fn compare<M: MemoryBus>(cpu: &mut CPU<M>, register: u8, value: u8) {
    let result = register.wrapping_sub(value);
    cpu.affect_carry_flag(register >= value);
    cpu.set_zn(result);
}

/// Executes the CMP (Compare Accumulator) instruction.
///
/// Flags affected: C, Z, N
pub(crate) fn execute_cmp<M: MemoryBus>(
    cpu: &mut CPU<M>,
    op: &Operation,
) -> Result<(), ExecutionError> {
    let value = cpu.operand_value(op)?;
    let register = cpu.regs.a;
    compare(cpu, register, value);
    Ok(())
}

/// Executes the CPX (Compare X Register) instruction.
///
/// Flags affected: C, Z, N
pub(crate) fn execute_cpx<M: MemoryBus>(
    cpu: &mut CPU<M>,
    op: &Operation,
) -> Result<(), ExecutionError> {
    let value = cpu.operand_value(op)?;
    let register = cpu.regs.x;
    compare(cpu, register, value);
    Ok(())
}

/// Executes the CPY (Compare Y Register) instruction.
///
/// Flags affected: C, Z, N
pub(crate) fn execute_cpy<M: MemoryBus>(
    cpu: &mut CPU<M>,
    op: &Operation,
) -> Result<(), ExecutionError> {
    let value = cpu.operand_value(op)?;
    let register = cpu.regs.y;
    compare(cpu, register, value);
    Ok(())
}

/// Executes the BIT (Bit Test) instruction.
///
/// Z from `A & M`; N and V are copied from bits 7 and 6 of M.
pub(crate) fn execute_bit<M: MemoryBus>(
    cpu: &mut CPU<M>,
    op: &Operation,
) -> Result<(), ExecutionError> {
    let value = cpu.operand_value(op)?;
    cpu.affect_zero_flag(cpu.regs.a & value);
    cpu.affect_sign_flag(value);
    cpu.affect_overflow_flag(value);
    Ok(())
}
