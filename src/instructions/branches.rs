//! # Branch Instructions
//!
//! This module implements conditional branch operations:
//! BCC, BCS, BEQ, BNE, BMI, BPL, BVC, BVS.
//!
//! All branches use relative addressing. The resolved operand is already the
//! target address; when the condition fails PC simply stays on the following
//! instruction. No flags are affected.

use super::Operation;
use crate::{ExecutionError, MemoryBus, CPU};

/// Executes a conditional branch.
///
/// The dispatcher evaluates the flag condition for the specific mnemonic.
pub(crate) fn execute_branch<M: MemoryBus>(
    cpu: &mut CPU<M>,
    op: &Operation,
    taken: bool,
) -> Result<(), ExecutionError> {
    let target = cpu.operand_address(op)?;

    if taken {
        cpu.regs.pc = target;
    }

    Ok(())
}
