//! Tests for the machine address space: page map, ROM protection,
//! wraparound of ranged operations and image loading.

use std::fs;
use std::path::PathBuf;

use proptest::prelude::*;
use vic6502::address_space::{ADDRESS_SPACE_SIZE, CHARACTER_ROM_ADDR};
use vic6502::{AddressSpace, MemoryBus, MemoryError, PageKind, SelfJumpHalt, CPU};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("vic6502-{}-{}", name, std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

// ========== ROM protection ==========

#[test]
fn test_character_rom_write_is_no_op() {
    let mut memory = AddressSpace::new(32);
    memory.set_bytes(CHARACTER_ROM_ADDR, &[0x3C]);

    memory.set_byte(CHARACTER_ROM_ADDR, 0xFF);

    assert_eq!(memory.get_byte(CHARACTER_ROM_ADDR), 0x3C);
}

#[test]
fn test_cpu_store_into_rom_is_dropped() {
    let mut memory = AddressSpace::new(0);
    // LDA #$55 ; STA $2000 ; STA $1000
    memory.set_bytes(0x1100, &[0xA9, 0x55, 0x8D, 0x00, 0x20, 0x8D, 0x00, 0x10]);
    // JMP $1108
    memory.set_bytes(0x1108, &[0x4C, 0x08, 0x11]);
    let mut cpu = CPU::with_start(memory, 0x1100);
    cpu.add_hook(SelfJumpHalt);

    let trap = cpu.run().unwrap();

    assert_eq!(trap.pc, 0x1108);
    assert_eq!(cpu.memory().get_byte(0x2000), 0x00);
    assert_eq!(cpu.memory().get_byte(0x1000), 0x55);
}

#[test]
fn test_expansion_opens_ram() {
    let mut memory = AddressSpace::new(8);
    memory.write(0x2000, 0x42);
    memory.write(0x0400, 0x43);

    assert_eq!(memory.read(0x2000), 0x42);
    assert_eq!(memory.read(0x0400), 0x43);
    assert_eq!(memory.page_kind(0x80), PageKind::Rom);
}

#[test]
fn test_screen_write_through_cpu_marks_video_dirty() {
    let mut memory = AddressSpace::new(0);
    // LDA #$41 ; STA $1E00
    memory.set_bytes(0x1000, &[0xA9, 0x41, 0x8D, 0x00, 0x1E]);
    let mut cpu = CPU::with_start(memory, 0x1000);

    cpu.step().unwrap();
    assert!(!cpu.memory_mut().take_video_dirty());

    cpu.step().unwrap();
    assert!(cpu.memory_mut().take_video_dirty());
    assert_eq!(cpu.memory().get_byte(0x1E00), 0x41);
}

// ========== Wraparound ==========

#[test]
fn test_set_bytes_wraps() {
    let mut memory = AddressSpace::new(0);
    memory.set_bytes(0xFFFE, &[1, 2, 3]);

    assert_eq!(memory.get_byte(0xFFFE), 1);
    assert_eq!(memory.get_byte(0xFFFF), 2);
    assert_eq!(memory.get_byte(0x0000), 3);
    assert_eq!(memory.get_bytes(0xFFFF, 2), vec![2, 3]);
}

#[test]
fn test_get_word_wraps() {
    let mut memory = AddressSpace::new(0);
    memory.set_bytes(0xFFFF, &[0x34, 0x12]);

    assert_eq!(memory.get_word(0xFFFF), 0x1234);
}

#[test]
fn test_load_wraps_and_reports_length() {
    let mut memory = AddressSpace::new(0);

    assert_eq!(memory.load(&[0xAA, 0xBB, 0xCC], 0xFFFF).unwrap(), 3);
    assert_eq!(memory.get_bytes(0xFFFF, 3), vec![0xAA, 0xBB, 0xCC]);
}

#[test]
fn test_full_image_fits_exactly() {
    let mut memory = AddressSpace::new(0);
    let image: Vec<u8> = (0..ADDRESS_SPACE_SIZE).map(|i| i as u8).collect();

    assert_eq!(memory.load(&image, 0).unwrap(), ADDRESS_SPACE_SIZE);
    assert_eq!(memory.get_byte(0x1234), 0x34);
}

#[test]
fn test_oversized_image_is_rejected() {
    let mut memory = AddressSpace::new(0);
    let image = vec![0xEA; ADDRESS_SPACE_SIZE + 1];

    let err = memory.load(&image, 0x1000).unwrap_err();
    assert!(matches!(err, MemoryError::ImageTooLarge { at: 0x1000, .. }));
    // Nothing was written
    assert_eq!(memory.get_byte(0x1000), 0x00);
}

// ========== Files ==========

#[test]
fn test_load_from_file() {
    let dir = scratch_dir("load");
    let path = dir.join("image.bin");
    fs::write(&path, [0xA9, 0x01, 0x60]).unwrap();

    let mut memory = AddressSpace::new(0);
    assert_eq!(memory.load(&path, 0x1000).unwrap(), 3);
    assert_eq!(memory.get_bytes(0x1000, 3), vec![0xA9, 0x01, 0x60]);

    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn test_system_rom_size_checked() {
    let dir = scratch_dir("romsize");
    fs::write(dir.join("chargen"), vec![0; 0x0800]).unwrap();
    fs::write(dir.join("basic"), vec![0; 0x2000]).unwrap();
    fs::write(dir.join("kernal"), vec![0; 0x2000]).unwrap();

    let mut memory = AddressSpace::new(0);
    let err = memory.load_system_roms(&dir).unwrap_err();

    assert!(matches!(
        err,
        MemoryError::RomSize {
            expected: 0x1000,
            actual: 0x0800,
            ..
        }
    ));

    fs::remove_dir_all(dir).unwrap();
}

// ========== Properties ==========

proptest! {
    #[test]
    fn prop_rom_pages_ignore_writes(
        address in 0xA000u16..=0xFFFF,
        old in any::<u8>(),
        new in any::<u8>(),
    ) {
        let mut memory = AddressSpace::new(32);
        memory.set_bytes(address, &[old]);

        memory.set_byte(address, new);

        prop_assert_eq!(memory.get_byte(address), old);
    }

    #[test]
    fn prop_ram_pages_store_writes(address in 0x1000u16..0x1E00, value in any::<u8>()) {
        let mut memory = AddressSpace::new(0);
        memory.set_byte(address, value);
        prop_assert_eq!(memory.get_byte(address), value);
    }

    #[test]
    fn prop_ranged_ops_wrap(
        address in any::<u16>(),
        bytes in prop::collection::vec(any::<u8>(), 1..64),
    ) {
        let mut memory = AddressSpace::new(0);
        memory.set_bytes(address, &bytes);

        prop_assert_eq!(memory.get_bytes(address, bytes.len()), bytes.clone());
        let last = address.wrapping_add(bytes.len() as u16 - 1);
        prop_assert_eq!(memory.get_byte(last), bytes[bytes.len() - 1]);
    }
}
