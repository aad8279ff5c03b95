//! # Register Transfer Instructions
//!
//! TAX, TAY, TXA, TYA and TSX update Z and N from the copied value.
//! TXS affects no flags.

use crate::{ExecutionError, MemoryBus, CPU};

pub(crate) fn execute_tax<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    cpu.regs.x = cpu.regs.a;
    cpu.set_zn(cpu.regs.x);
    Ok(())
}

pub(crate) fn execute_tay<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    cpu.regs.y = cpu.regs.a;
    cpu.set_zn(cpu.regs.y);
    Ok(())
}

pub(crate) fn execute_txa<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    cpu.regs.a = cpu.regs.x;
    cpu.set_zn(cpu.regs.a);
    Ok(())
}

pub(crate) fn execute_tya<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    cpu.regs.a = cpu.regs.y;
    cpu.set_zn(cpu.regs.a);
    Ok(())
}

pub(crate) fn execute_tsx<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    cpu.regs.x = cpu.regs.s;
    cpu.set_zn(cpu.regs.x);
    Ok(())
}

pub(crate) fn execute_txs<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<(), ExecutionError> {
    cpu.regs.s = cpu.regs.x;
    Ok(())
}
