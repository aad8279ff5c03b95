//! # Machine Address Space
//!
//! The 64KB memory of the VIC home computer, with page-granular write
//! behaviour chosen by how much expansion RAM is plugged in.
//!
//! Every one of the 256 pages is classified once, at construction, as
//! [`PageKind::Ram`], [`PageKind::Rom`], [`PageKind::ScreenRam`] or
//! [`PageKind::ColorRam`]. Reads never consult the classification: ROM and
//! RAM read identically from the backing store. Writes are routed by page:
//!
//! | Pages     | Kind                                          |
//! |-----------|-----------------------------------------------|
//! | 0x00-0x03 | RAM (zero page, stack, work area)             |
//! | 0x04-0x0F | RAM with a 3K (or larger) expansion, else ROM |
//! | 0x10-0x1D | RAM                                           |
//! | 0x1E-0x1F | screen RAM                                    |
//! | 0x20-0x7F | RAM with an 8K (or larger) expansion, else ROM|
//! | 0x80-0x8F | ROM (character generator)                     |
//! | 0x90-0x93 | RAM (VIC/VIA register placeholder)            |
//! | 0x94-0x97 | colour RAM                                    |
//! | 0x98-0x9F | RAM (expansion I/O placeholder)               |
//! | 0xA0-0xFF | ROM (cartridge, BASIC, KERNAL)                |
//!
//! ## Wraparound
//!
//! Ranged operations (`get_bytes`, `set_bytes`, `load`) wrap modulo 0x10000:
//! a range starting at 0xFFFE with three bytes touches 0xFFFE, 0xFFFF and
//! 0x0000. Only an image longer than the whole address space is rejected.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, trace, warn};
use thiserror::Error;

use crate::MemoryBus;

/// Size of the address space in bytes.
pub const ADDRESS_SPACE_SIZE: usize = 0x10000;

/// Character generator ROM load address.
pub const CHARACTER_ROM_ADDR: u16 = 0x8000;
/// BASIC ROM load address.
pub const BASIC_ROM_ADDR: u16 = 0xC000;
/// KERNAL ROM load address.
pub const KERNAL_ROM_ADDR: u16 = 0xE000;

/// The firmware images making up the default memory map:
/// (display name, file name, load address, size).
pub const SYSTEM_ROMS: [(&str, &str, u16, usize); 3] = [
    ("character", "chargen", CHARACTER_ROM_ADDR, 0x1000),
    ("BASIC", "basic", BASIC_ROM_ADDR, 0x2000),
    ("KERNAL", "kernal", KERNAL_ROM_ADDR, 0x2000),
];

/// Errors raised while loading images into the address space.
#[derive(Debug, Error)]
pub enum MemoryError {
    #[error("failed to read image {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("image of {len} bytes at ${at:04X} exceeds the 64KB address space")]
    ImageTooLarge { len: usize, at: u16 },

    #[error("{name} ROM must be {expected} bytes, got {actual}")]
    RomSize {
        name: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// How writes to a page behave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    /// Writes are stored.
    Ram,
    /// Writes are silently discarded.
    Rom,
    /// Writes are stored and flag the video latch (colour nybbles).
    ColorRam,
    /// Writes are stored and flag the video latch (character codes).
    ScreenRam,
}

/// One row of the page map.
#[derive(Debug, Clone, Copy)]
enum PageRule {
    Always(PageKind),
    /// RAM once the expansion reaches the given size in KB, ROM below it.
    RamWithExpansion(u16),
}

const PAGE_RULES: [(u8, u8, PageRule); 10] = [
    (0x00, 0x03, PageRule::Always(PageKind::Ram)),
    (0x04, 0x0F, PageRule::RamWithExpansion(3)),
    (0x10, 0x1D, PageRule::Always(PageKind::Ram)),
    (0x1E, 0x1F, PageRule::Always(PageKind::ScreenRam)),
    (0x20, 0x7F, PageRule::RamWithExpansion(8)),
    (0x80, 0x8F, PageRule::Always(PageKind::Rom)),
    (0x90, 0x93, PageRule::Always(PageKind::Ram)),
    (0x94, 0x97, PageRule::Always(PageKind::ColorRam)),
    (0x98, 0x9F, PageRule::Always(PageKind::Ram)),
    (0xA0, 0xFF, PageRule::Always(PageKind::Rom)),
];

fn build_page_map(expansion: u16) -> [PageKind; 256] {
    let mut pages = [PageKind::Rom; 256];

    for &(first, last, rule) in PAGE_RULES.iter() {
        let kind = match rule {
            PageRule::Always(kind) => kind,
            PageRule::RamWithExpansion(threshold) if expansion >= threshold => PageKind::Ram,
            PageRule::RamWithExpansion(_) => PageKind::Rom,
        };
        for page in first..=last {
            pages[page as usize] = kind;
        }
    }

    pages
}

/// Source of an image for [`AddressSpace::load`].
#[derive(Debug, Clone, Copy)]
pub enum RomImage<'a> {
    /// Raw bytes already in memory.
    Bytes(&'a [u8]),
    /// A headerless binary dump on disk.
    File(&'a Path),
}

impl<'a> From<&'a [u8]> for RomImage<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        RomImage::Bytes(bytes)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for RomImage<'a> {
    fn from(bytes: &'a [u8; N]) -> Self {
        RomImage::Bytes(bytes)
    }
}

impl<'a> From<&'a Vec<u8>> for RomImage<'a> {
    fn from(bytes: &'a Vec<u8>) -> Self {
        RomImage::Bytes(bytes)
    }
}

impl<'a> From<&'a Path> for RomImage<'a> {
    fn from(path: &'a Path) -> Self {
        RomImage::File(path)
    }
}

impl<'a> From<&'a PathBuf> for RomImage<'a> {
    fn from(path: &'a PathBuf) -> Self {
        RomImage::File(path)
    }
}

/// The machine's 64KB address space.
///
/// # Examples
///
/// ```
/// use vic6502::{AddressSpace, PageKind};
///
/// let mut memory = AddressSpace::new(0);
///
/// // Unexpanded machine: $2000 is not backed by RAM
/// assert_eq!(memory.page_kind(0x20), PageKind::Rom);
/// memory.set_byte(0x2000, 0x42);
/// assert_eq!(memory.get_byte(0x2000), 0x00);
///
/// // User RAM always answers
/// memory.set_byte(0x1000, 0x42);
/// assert_eq!(memory.get_byte(0x1000), 0x42);
///
/// // Firmware is written "through" the hardware
/// memory.set_bytes(0x8000, &[0x3C, 0x66]);
/// assert_eq!(memory.get_word(0x8000), 0x663C);
/// ```
pub struct AddressSpace {
    bytes: Box<[u8; ADDRESS_SPACE_SIZE]>,
    pages: [PageKind; 256],
    expansion: u16,
    video_dirty: bool,
}

impl AddressSpace {
    /// Creates a zero-filled address space for a machine with `expansion`
    /// kilobytes of expansion RAM (0, 3, 8, 16, 24 or 32 on real boards).
    pub fn new(expansion: u16) -> Self {
        Self {
            bytes: Box::new([0; ADDRESS_SPACE_SIZE]),
            pages: build_page_map(expansion),
            expansion,
            video_dirty: false,
        }
    }

    /// Expansion size this map was built for, in KB.
    pub fn expansion(&self) -> u16 {
        self.expansion
    }

    /// Write behaviour of `page` (the high byte of an address).
    pub fn page_kind(&self, page: u8) -> PageKind {
        self.pages[page as usize]
    }

    /// Reads one byte. Never fails and has no side effect.
    pub fn get_byte(&self, address: u16) -> u8 {
        self.bytes[address as usize]
    }

    /// Reads `count` consecutive bytes, wrapping past 0xFFFF.
    pub fn get_bytes(&self, address: u16, count: usize) -> Vec<u8> {
        (0..count)
            .map(|offset| self.get_byte(address.wrapping_add(offset as u16)))
            .collect()
    }

    /// Reads a little-endian word from `address` and `address + 1`.
    pub fn get_word(&self, address: u16) -> u16 {
        let lo = self.get_byte(address);
        let hi = self.get_byte(address.wrapping_add(1));
        u16::from_le_bytes([lo, hi])
    }

    /// Writes one byte through the page map.
    ///
    /// A write to a ROM page is a silent no-op.
    pub fn set_byte(&mut self, address: u16, value: u8) {
        match self.page_kind((address >> 8) as u8) {
            PageKind::Ram => self.bytes[address as usize] = value,
            PageKind::Rom => {}
            PageKind::ScreenRam => {
                trace!("screen ${:04X} <- ${:02X}", address, value);
                self.bytes[address as usize] = value;
                self.video_dirty = true;
            }
            PageKind::ColorRam => {
                trace!("colour ${:04X} <- ${:02X}", address, value);
                self.bytes[address as usize] = value;
                self.video_dirty = true;
            }
        }
    }

    /// Stores `values` starting at `address`, bypassing the page map.
    ///
    /// Used for firmware and fixture setup. Wraps past 0xFFFF.
    pub fn set_bytes(&mut self, address: u16, values: &[u8]) {
        for (offset, &value) in values.iter().enumerate() {
            self.bytes[address.wrapping_add(offset as u16) as usize] = value;
        }
    }

    /// Loads an image at `at`, returning the number of bytes written.
    ///
    /// File images are read as raw bytes. The image is written with
    /// [`set_bytes`](Self::set_bytes), so ROM pages receive it too.
    pub fn load<'a>(
        &mut self,
        image: impl Into<RomImage<'a>>,
        at: u16,
    ) -> Result<usize, MemoryError> {
        match image.into() {
            RomImage::Bytes(bytes) => self.load_bytes(bytes, at),
            RomImage::File(path) => {
                let bytes = read_image(path)?;
                debug!("loading {} at ${:04X}", path.display(), at);
                self.load_bytes(&bytes, at)
            }
        }
    }

    fn load_bytes(&mut self, bytes: &[u8], at: u16) -> Result<usize, MemoryError> {
        if bytes.len() > ADDRESS_SPACE_SIZE {
            return Err(MemoryError::ImageTooLarge {
                len: bytes.len(),
                at,
            });
        }
        if at as usize + bytes.len() > ADDRESS_SPACE_SIZE {
            warn!(
                "image of {} bytes at ${:04X} wraps past $FFFF",
                bytes.len(),
                at
            );
        }

        self.set_bytes(at, bytes);
        Ok(bytes.len())
    }

    /// Loads the character, BASIC and KERNAL images from `dir`.
    ///
    /// Expects files named `chargen`, `basic` and `kernal` of exactly 4KB,
    /// 8KB and 8KB.
    pub fn load_system_roms(&mut self, dir: &Path) -> Result<(), MemoryError> {
        for &(name, file, at, expected) in SYSTEM_ROMS.iter() {
            let bytes = read_image(&dir.join(file))?;
            if bytes.len() != expected {
                return Err(MemoryError::RomSize {
                    name,
                    expected,
                    actual: bytes.len(),
                });
            }
            debug!("{} ROM: {} bytes at ${:04X}", name, bytes.len(), at);
            self.set_bytes(at, &bytes);
        }
        Ok(())
    }

    /// Returns whether screen or colour RAM was written since the last call,
    /// and clears the latch.
    pub fn take_video_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.video_dirty, false)
    }
}

fn read_image(path: &Path) -> Result<Vec<u8>, MemoryError> {
    fs::read(path).map_err(|source| MemoryError::Io {
        path: path.to_path_buf(),
        source,
    })
}

impl MemoryBus for AddressSpace {
    fn read(&self, addr: u16) -> u8 {
        self.get_byte(addr)
    }

    fn write(&mut self, addr: u16, value: u8) {
        self.set_byte(addr, value);
    }
}

impl fmt::Debug for AddressSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AddressSpace")
            .field("expansion", &self.expansion)
            .field("video_dirty", &self.video_dirty)
            .finish_non_exhaustive()
    }
}
