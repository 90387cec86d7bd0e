//! Zero-padded lowercase hexadecimal rendering used by traces and dumps.
//!
//! Every helper is a plain function so the register file, memory and hart
//! format values by composition rather than sharing a base type.

/// Renders a byte as exactly two hex digits (`a5`).
#[must_use]
pub fn to_hex8(value: u8) -> String {
    format!("{value:02x}")
}

/// Renders a word as exactly eight hex digits (`0000f0f0`).
#[must_use]
pub fn to_hex32(value: u32) -> String {
    format!("{value:08x}")
}

/// Renders a word as `0x` followed by eight hex digits.
#[must_use]
pub fn to_hex0x32(value: u32) -> String {
    format!("0x{value:08x}")
}

/// Renders the low 20 bits of `value` as `0x` followed by five hex digits.
///
/// Used for the upper-immediate field of `lui`/`auipc`.
#[must_use]
pub fn to_hex0x20(value: u32) -> String {
    format!("0x{:05x}", value & 0x000f_ffff)
}

/// Renders the low 12 bits of `value` as `0x` followed by three hex digits.
///
/// Used for CSR numbers.
#[must_use]
pub fn to_hex0x12(value: u32) -> String {
    format!("0x{:03x}", value & 0x0fff)
}
