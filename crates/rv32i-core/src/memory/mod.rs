//! Flat byte-addressable simulated memory with little-endian accessors.

/// Bounds policy and out-of-range diagnostics.
pub mod access;

use thiserror::Error;

use crate::hex::{to_hex32, to_hex8};
pub use access::{byte_address, checked_index, is_out_of_range, AccessKind};

/// Fill value for every byte of a freshly constructed memory.
///
/// Non-zero so that reads of never-written locations stand out in dumps.
pub const MEMORY_FILL: u8 = 0xA5;

/// Memory size used when the host does not request one (256 bytes).
pub const DEFAULT_MEMORY_SIZE: u32 = 0x100;

/// Number of bytes rendered on each memory dump row.
pub const DUMP_ROW_BYTES: usize = 16;

/// Errors reported by bulk memory operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MemoryError {
    /// The image does not fit; bytes before `capacity` were already written.
    #[error("program too big: {image_len} byte image exceeds {capacity} byte memory")]
    ProgramTooLarge {
        /// Length of the rejected image.
        image_len: usize,
        /// Capacity of the target memory.
        capacity: u32,
    },
}

/// Simulated memory. Its size is fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Memory {
    bytes: Box<[u8]>,
}

impl Memory {
    /// Allocates `size` bytes, rounded up to a multiple of 16, filled with
    /// [`MEMORY_FILL`].
    #[must_use]
    pub fn new(size: u32) -> Self {
        let rounded = size.saturating_add(15) & !15;
        let len = usize::try_from(rounded).unwrap_or(usize::MAX & !15);
        Self {
            bytes: vec![MEMORY_FILL; len].into_boxed_slice(),
        }
    }

    /// Total capacity in bytes.
    #[must_use]
    pub fn size(&self) -> u32 {
        u32::try_from(self.bytes.len()).unwrap_or(u32::MAX)
    }

    /// Raw view of the backing store.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Reads one byte. Out-of-range reads log a warning and return 0.
    #[must_use]
    pub fn read8(&self, addr: u32) -> u8 {
        checked_index(addr, self.size(), AccessKind::Read)
            .and_then(|index| self.bytes.get(index).copied())
            .unwrap_or(0)
    }

    /// Reads a little-endian halfword, one byte at a time.
    #[must_use]
    pub fn read16(&self, addr: u32) -> u16 {
        u16::from_le_bytes(self.read_bytes(addr))
    }

    /// Reads a little-endian word, one byte at a time.
    #[must_use]
    pub fn read32(&self, addr: u32) -> u32 {
        u32::from_le_bytes(self.read_bytes(addr))
    }

    fn read_bytes<const N: usize>(&self, addr: u32) -> [u8; N] {
        let mut bytes = [0; N];
        for (offset, byte) in (0_u32..).zip(bytes.iter_mut()) {
            *byte = byte_address(addr, offset, AccessKind::Read).map_or(0, |at| self.read8(at));
        }
        bytes
    }

    /// Reads one byte and sign-extends it to 32 bits.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn read8_sign_extended(&self, addr: u32) -> i32 {
        i32::from(self.read8(addr) as i8)
    }

    /// Reads a halfword and sign-extends it to 32 bits.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn read16_sign_extended(&self, addr: u32) -> i32 {
        i32::from(self.read16(addr) as i16)
    }

    /// Reads a word reinterpreted as signed.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn read32_sign_extended(&self, addr: u32) -> i32 {
        self.read32(addr) as i32
    }

    /// Writes one byte. Out-of-range writes log a warning and are dropped.
    pub fn write8(&mut self, addr: u32, value: u8) {
        let size = self.size();
        if let Some(slot) =
            checked_index(addr, size, AccessKind::Write).and_then(|index| self.bytes.get_mut(index))
        {
            *slot = value;
        }
    }

    /// Writes a little-endian halfword, one byte at a time.
    pub fn write16(&mut self, addr: u32, value: u16) {
        self.write_bytes(addr, value.to_le_bytes());
    }

    /// Writes a little-endian word, one byte at a time.
    pub fn write32(&mut self, addr: u32, value: u32) {
        self.write_bytes(addr, value.to_le_bytes());
    }

    fn write_bytes<const N: usize>(&mut self, addr: u32, bytes: [u8; N]) {
        for (offset, byte) in (0_u32..).zip(bytes) {
            if let Some(at) = byte_address(addr, offset, AccessKind::Write) {
                self.write8(at, byte);
            }
        }
    }

    /// Copies `image` into memory starting at address 0.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::ProgramTooLarge`] when the image is longer than
    /// the memory. Bytes that fit are written before the error is reported.
    pub fn load_image(&mut self, image: &[u8]) -> Result<(), MemoryError> {
        for (index, byte) in image.iter().copied().enumerate() {
            let Some(slot) = self.bytes.get_mut(index) else {
                return Err(MemoryError::ProgramTooLarge {
                    image_len: image.len(),
                    capacity: self.size(),
                });
            };
            *slot = byte;
        }
        log::info!("loaded {} byte image", image.len());
        Ok(())
    }

    /// Renders the whole memory as a hex + ASCII listing, 16 bytes per row.
    #[must_use]
    pub fn dump(&self) -> String {
        let rows = self.bytes.len() / DUMP_ROW_BYTES;
        let mut out = String::with_capacity(rows * 78);

        for (base, row) in (0_u32..)
            .step_by(DUMP_ROW_BYTES)
            .zip(self.bytes.chunks(DUMP_ROW_BYTES))
        {
            out.push_str(&to_hex32(base));
            out.push_str(": ");
            for (column, byte) in row.iter().enumerate() {
                out.push_str(&to_hex8(*byte));
                out.push(' ');
                if column == 7 {
                    out.push(' ');
                }
            }
            out.push('*');
            out.extend(row.iter().map(|byte| printable(*byte)));
            out.push_str("*\n");
        }

        out
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new(DEFAULT_MEMORY_SIZE)
    }
}

const fn printable(byte: u8) -> char {
    if byte.is_ascii_graphic() || byte == b' ' {
        byte as char
    } else {
        '.'
    }
}
