//! Bounds policy for single-byte memory accesses.

use crate::hex::to_hex0x32;

/// Direction of a byte access, used only for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessKind {
    /// Load from memory.
    Read,
    /// Store to memory.
    Write,
}

impl AccessKind {
    const fn label(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
        }
    }
}

/// Returns `true` when `addr` lies outside `[0, size)`.
#[must_use]
pub const fn is_out_of_range(addr: u32, size: u32) -> bool {
    addr >= size
}

/// Maps `addr` to a buffer index, or logs a warning and returns `None`.
///
/// Out-of-range accesses are recoverable: the caller substitutes zero for a
/// read and drops a write.
pub fn checked_index(addr: u32, size: u32, kind: AccessKind) -> Option<usize> {
    if is_out_of_range(addr, size) {
        log::warn!(
            "address out of range on {}: {}",
            kind.label(),
            to_hex0x32(addr)
        );
        return None;
    }
    usize::try_from(addr).ok()
}

/// Address of byte `offset` within a multi-byte access starting at `addr`.
///
/// Accesses do not wrap: a byte past `u32::MAX` is out of range, so this
/// logs a warning and returns `None`.
pub fn byte_address(addr: u32, offset: u32, kind: AccessKind) -> Option<u32> {
    let byte = addr.checked_add(offset);
    if byte.is_none() {
        log::warn!(
            "address out of range on {}: {} + {offset}",
            kind.label(),
            to_hex0x32(addr)
        );
    }
    byte
}
