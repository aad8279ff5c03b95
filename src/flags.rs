//! # Status Register
//!
//! The P register packed as a bitflags set (layout NV-BDIZC).

use bitflags::bitflags;

bitflags! {
    /// # CPU Status Register (P) Flags
    ///
    /// | Bit | Mask | Name              | Description                               |
    /// |-----|------|-------------------|-------------------------------------------|
    /// | 7   | 0x80 | NEGATIVE          | Bit 7 of the last result                  |
    /// | 6   | 0x40 | OVERFLOW          | Signed overflow, or bit 6 of a BIT operand|
    /// | 5   | 0x20 | UNUSED            | Always reads as 1                         |
    /// | 4   | 0x10 | BREAK             | Set in the copy pushed by BRK/PHP         |
    /// | 3   | 0x08 | DECIMAL           | ADC/SBC operate on packed BCD             |
    /// | 2   | 0x04 | INTERRUPT_DISABLE | Set by BRK and SEI                        |
    /// | 1   | 0x02 | ZERO              | Last result was zero                      |
    /// | 0   | 0x01 | CARRY             | Carry out / no borrow                     |
    #[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct StatusFlags: u8 {
        /// Carry Flag
        const CARRY = 0b0000_0001;
        /// Zero Flag
        const ZERO = 0b0000_0010;
        /// Interrupt Disable
        const INTERRUPT_DISABLE = 0b0000_0100;
        /// Decimal Mode
        const DECIMAL = 0b0000_1000;
        /// Break Command
        const BREAK = 0b0001_0000;
        /// Unused (always 1)
        const UNUSED = 0b0010_0000;
        /// Overflow Flag
        const OVERFLOW = 0b0100_0000;
        /// Negative (sign) Flag
        const NEGATIVE = 0b1000_0000;
    }
}

impl StatusFlags {
    /// Power-on value: interrupts disabled, bit 5 held high.
    pub const RESET: StatusFlags = StatusFlags::UNUSED.union(StatusFlags::INTERRUPT_DISABLE);

    /// Value as it is pushed by BRK and PHP.
    pub fn pushed(self) -> u8 {
        (self | StatusFlags::BREAK | StatusFlags::UNUSED).bits()
    }

    /// Value restored by PLP and RTI: BREAK is not a real latch, bit 5 stays set.
    pub fn pulled(value: u8) -> Self {
        (StatusFlags::from_bits_truncate(value) - StatusFlags::BREAK) | StatusFlags::UNUSED
    }

    /// NV-BDIZC rendering with `-` for clear bits.
    pub fn to_letters(self) -> String {
        const LETTERS: [(StatusFlags, char); 8] = [
            (StatusFlags::NEGATIVE, 'N'),
            (StatusFlags::OVERFLOW, 'V'),
            (StatusFlags::UNUSED, '-'),
            (StatusFlags::BREAK, 'B'),
            (StatusFlags::DECIMAL, 'D'),
            (StatusFlags::INTERRUPT_DISABLE, 'I'),
            (StatusFlags::ZERO, 'Z'),
            (StatusFlags::CARRY, 'C'),
        ];

        LETTERS
            .iter()
            .map(|&(flag, c)| if self.contains(flag) { c } else { '-' })
            .collect()
    }
}
