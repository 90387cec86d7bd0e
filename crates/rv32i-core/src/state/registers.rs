use std::fmt;

use crate::hex::to_hex32;

/// Number of architecturally visible integer registers (`x0..x31`).
pub const GENERAL_REGISTER_COUNT: usize = 32;

/// Value every register except `x0` holds after reset.
///
/// Programs that read a register before writing it see this pattern rather
/// than a plausible zero.
#[allow(clippy::cast_possible_wrap)]
pub const REGISTER_RESET_PATTERN: i32 = 0xF0F0_F0F0_u32 as i32;

/// Integer register identifier, always in `0..=31`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Register(u8);

impl Register {
    /// Hardwired zero register.
    pub const ZERO: Self = Self(0);
    /// Return address register (`ra`).
    pub const RA: Self = Self(1);
    /// Stack pointer register (`sp`).
    pub const SP: Self = Self(2);

    /// Returns the register with the given index, if it is in `0..=31`.
    #[must_use]
    pub const fn new(index: u8) -> Option<Self> {
        if (index as usize) < GENERAL_REGISTER_COUNT {
            Some(Self(index))
        } else {
            None
        }
    }

    /// Builds a register from a 5-bit instruction field, ignoring higher bits.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn from_field(bits: u32) -> Self {
        Self((bits & 0x1F) as u8)
    }

    /// Returns the array index of this register.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterates `x0` through `x31` in order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..32_u8).map(Self)
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}

/// The 32-entry integer register file.
///
/// `x0` is not storage-backed: it always reads 0 and writes to it are
/// discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct RegisterFile {
    regs: [i32; GENERAL_REGISTER_COUNT],
}

impl Default for RegisterFile {
    fn default() -> Self {
        let mut file = Self {
            regs: [0; GENERAL_REGISTER_COUNT],
        };
        file.reset();
        file
    }
}

impl RegisterFile {
    /// Creates a register file in its reset state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears `x0` and fills every other register with
    /// [`REGISTER_RESET_PATTERN`].
    pub fn reset(&mut self) {
        self.regs = [REGISTER_RESET_PATTERN; GENERAL_REGISTER_COUNT];
        self.regs[0] = 0;
    }

    /// Reads a register.
    #[must_use]
    pub const fn get(&self, reg: Register) -> i32 {
        if reg.index() == 0 {
            0
        } else {
            self.regs[reg.index()]
        }
    }

    /// Writes a register. Writes to `x0` are no-ops.
    pub fn set(&mut self, reg: Register, value: i32) {
        if reg.index() != 0 {
            self.regs[reg.index()] = value;
        }
    }

    /// Renders the register file as four rows of eight registers.
    ///
    /// Each row is prefixed by `hdr` (when non-empty) and the name of its
    /// first register right-justified to three columns.
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub fn dump(&self, hdr: &str) -> String {
        let mut out = String::new();
        for (row, values) in self.regs.chunks(8).enumerate() {
            if !hdr.is_empty() {
                out.push_str(hdr);
                out.push(' ');
            }
            out.push_str(&format!("{:>3} ", format!("x{}", row * 8)));
            for (column, value) in values.iter().enumerate() {
                out.push_str(&to_hex32(*value as u32));
                out.push(' ');
                if column == 3 {
                    out.push(' ');
                }
            }
            out.push('\n');
        }
        out
    }
}
