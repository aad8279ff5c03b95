//! Instruction decoder for the 6502 disassembler

use crate::disassembler::Instruction;
use crate::opcodes::OPCODE_TABLE;
use crate::MemoryBus;

/// Decode the instruction at `address`.
///
/// Undocumented opcodes decode to a one-byte [`Mnemonic::Illegal`](crate::Mnemonic::Illegal)
/// instruction. Operand bytes past 0xFFFF wrap to 0x0000.
pub fn decode_at<M: MemoryBus + ?Sized>(bus: &M, address: u16) -> Instruction {
    let opcode = bus.read(address);
    let metadata = &OPCODE_TABLE[opcode as usize];

    let mut operand_bytes = [0u8; 2];
    for (i, byte) in operand_bytes
        .iter_mut()
        .take(metadata.size_bytes as usize - 1)
        .enumerate()
    {
        *byte = bus.read(address.wrapping_add(1 + i as u16));
    }

    Instruction {
        address,
        opcode,
        metadata,
        operand_bytes,
    }
}

/// Decode `count` consecutive instructions starting at `address`.
pub fn disassemble_range<M: MemoryBus + ?Sized>(
    bus: &M,
    address: u16,
    count: usize,
) -> Vec<Instruction> {
    let mut instructions = Vec::with_capacity(count);
    let mut address = address;

    for _ in 0..count {
        let instruction = decode_at(bus, address);
        address = instruction.next_address();
        instructions.push(instruction);
    }

    instructions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::addressing::AddressingMode;
    use crate::opcodes::Mnemonic;
    use crate::FlatMemory;

    #[test]
    fn test_decode_lda_immediate() {
        let mut mem = FlatMemory::new();
        mem.load(0x8000, &[0xA9, 0x42]);
        let instr = decode_at(&mem, 0x8000);

        assert_eq!(instr.address, 0x8000);
        assert_eq!(instr.opcode, 0xA9);
        assert_eq!(instr.metadata.mnemonic, Mnemonic::Lda);
        assert_eq!(instr.metadata.addressing_mode, AddressingMode::Immediate);
        assert_eq!(instr.operand_byte(), 0x42);
        assert_eq!(instr.bytes(), vec![0xA9, 0x42]);
        assert_eq!(instr.next_address(), 0x8002);
    }

    #[test]
    fn test_decode_sta_absolute() {
        let mut mem = FlatMemory::new();
        mem.load(0x0000, &[0x8D, 0x00, 0x80]);
        let instr = decode_at(&mem, 0x0000);

        assert_eq!(instr.metadata.mnemonic, Mnemonic::Sta);
        assert_eq!(instr.operand_word(), 0x8000);
        assert_eq!(instr.size(), 3);
    }

    #[test]
    fn test_decode_illegal_is_one_byte() {
        let mut mem = FlatMemory::new();
        mem.load(0x1000, &[0x02, 0xEA]);
        let instr = decode_at(&mem, 0x1000);

        assert_eq!(instr.metadata.mnemonic, Mnemonic::Illegal);
        assert_eq!(instr.next_address(), 0x1001);
    }

    #[test]
    fn test_operands_wrap_at_top_of_memory() {
        let mut mem = FlatMemory::new();
        mem.load(0xFFFE, &[0x4C, 0x34, 0x12]);
        let instr = decode_at(&mem, 0xFFFE);

        assert_eq!(instr.operand_word(), 0x1234);
        assert_eq!(instr.next_address(), 0x0001);
    }

    #[test]
    fn test_disassemble_range() {
        let mut mem = FlatMemory::new();
        mem.load(0x0400, &[0xD8, 0xA2, 0xFF, 0x9A, 0x4C, 0x00, 0x04]);
        let listing = disassemble_range(&mem, 0x0400, 4);

        let addresses: Vec<u16> = listing.iter().map(|i| i.address).collect();
        assert_eq!(addresses, vec![0x0400, 0x0401, 0x0403, 0x0404]);
    }
}
