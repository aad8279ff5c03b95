//! Machine configuration
//!
//! [`MachineConfig`] gathers everything needed to assemble a runnable
//! machine: how much expansion RAM is fitted, where the system ROMs live,
//! which extra images to load and where execution starts.

use std::path::PathBuf;

use log::debug;

use crate::address_space::{AddressSpace, MemoryError};
use crate::cpu::CPU;

/// Description of a machine to build.
///
/// ```
/// use vic6502::{MachineConfig, PageKind};
///
/// let config = MachineConfig {
///     expansion: 8,
///     start: Some(0x1000),
///     ..MachineConfig::default()
/// };
///
/// let cpu = config.build().unwrap();
/// assert_eq!(cpu.pc(), 0x1000);
/// assert_eq!(cpu.memory().page_kind(0x20), PageKind::Ram);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MachineConfig {
    /// Expansion RAM in KB (0, 3, 8, 16, 24 or 32).
    pub expansion: u16,
    /// Directory holding `chargen`, `basic` and `kernal`. No system ROMs are
    /// loaded when unset.
    pub rom_dir: Option<PathBuf>,
    /// Raw images loaded after the system ROMs, each at its address.
    pub images: Vec<(PathBuf, u16)>,
    /// PC override; the reset vector is used when unset.
    pub start: Option<u16>,
}

impl MachineConfig {
    pub fn new(expansion: u16) -> Self {
        Self {
            expansion,
            ..Self::default()
        }
    }

    /// Builds the address space, loads every image and resets the CPU.
    pub fn build(&self) -> Result<CPU<AddressSpace>, MemoryError> {
        let mut memory = AddressSpace::new(self.expansion);
        debug!("machine with {}K expansion", self.expansion);

        if let Some(dir) = &self.rom_dir {
            memory.load_system_roms(dir)?;
        }

        for (path, at) in &self.images {
            memory.load(path, *at)?;
        }

        Ok(match self.start {
            Some(pc) => CPU::with_start(memory, pc),
            None => CPU::new(memory),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PageKind;
    use std::fs;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "vic6502-config-{}-{}",
            name,
            std::process::id()
        ));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_default_is_unexpanded() {
        let cpu = MachineConfig::default().build().unwrap();
        assert_eq!(cpu.memory().expansion(), 0);
        assert_eq!(cpu.memory().page_kind(0x04), PageKind::Rom);
        // Zero-filled memory, so the reset vector points at $0000
        assert_eq!(cpu.pc(), 0x0000);
    }

    #[test]
    fn test_images_and_vector() {
        let dir = scratch_dir("images");
        let program = dir.join("program.bin");
        let vectors = dir.join("vectors.bin");
        fs::write(&program, [0xA9, 0x01]).unwrap();
        fs::write(&vectors, [0x00, 0x10]).unwrap();

        let config = MachineConfig {
            images: vec![(program, 0x1000), (vectors, 0xFFFC)],
            ..MachineConfig::new(3)
        };
        let cpu = config.build().unwrap();

        assert_eq!(cpu.pc(), 0x1000);
        assert_eq!(cpu.memory().get_bytes(0x1000, 2), vec![0xA9, 0x01]);

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_missing_rom_dir_is_io_error() {
        let config = MachineConfig {
            rom_dir: Some(PathBuf::from("/nonexistent/vic6502/roms")),
            ..MachineConfig::default()
        };

        assert!(matches!(config.build(), Err(MemoryError::Io { .. })));
    }

    #[test]
    fn test_system_roms_loaded_from_dir() {
        let dir = scratch_dir("roms");
        fs::write(dir.join("chargen"), vec![0x11; 0x1000]).unwrap();
        fs::write(dir.join("basic"), vec![0x22; 0x2000]).unwrap();
        let mut kernal = vec![0x33; 0x2000];
        // Reset vector -> $FD22
        kernal[0x1FFC] = 0x22;
        kernal[0x1FFD] = 0xFD;
        fs::write(dir.join("kernal"), kernal).unwrap();

        let config = MachineConfig {
            rom_dir: Some(dir.clone()),
            ..MachineConfig::default()
        };
        let cpu = config.build().unwrap();

        assert_eq!(cpu.pc(), 0xFD22);
        assert_eq!(cpu.memory().get_byte(0x8000), 0x11);
        assert_eq!(cpu.memory().get_byte(0xC000), 0x22);
        assert_eq!(cpu.memory().get_byte(0xE000), 0x33);

        fs::remove_dir_all(dir).unwrap();
    }
}
