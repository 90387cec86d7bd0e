//! Instruction field extraction and the decode pipeline.
//!
//! Field helpers are pure functions of the 32-bit instruction word. Immediates
//! come back sign-extended (except [`imm_u`], which is already positioned in
//! bits 31:12).

use crate::encoding::{classify, InstructionFormat, Mnemonic};
use crate::state::Register;

/// Bits 6:0.
#[must_use]
pub const fn opcode(word: u32) -> u32 {
    word & 0x7F
}

/// Destination register, bits 11:7.
#[must_use]
pub const fn rd(word: u32) -> Register {
    Register::from_field(word >> 7)
}

/// Bits 14:12.
#[must_use]
pub const fn funct3(word: u32) -> u32 {
    (word >> 12) & 0x7
}

/// First source register, bits 19:15.
#[must_use]
pub const fn rs1(word: u32) -> Register {
    Register::from_field(word >> 15)
}

/// Second source register, bits 24:20.
#[must_use]
pub const fn rs2(word: u32) -> Register {
    Register::from_field(word >> 20)
}

/// Bits 31:25.
#[must_use]
pub const fn funct7(word: u32) -> u32 {
    (word >> 25) & 0x7F
}

/// Sign-extends the low `bits` bits of `value`.
#[must_use]
#[allow(clippy::cast_possible_wrap)]
pub const fn sign_extend(value: u32, bits: u32) -> i32 {
    let shift = 32 - bits;
    ((value << shift) as i32) >> shift
}

/// I-type immediate: bits 31:20, sign-extended.
#[must_use]
#[allow(clippy::cast_possible_wrap)]
pub const fn imm_i(word: u32) -> i32 {
    (word as i32) >> 20
}

/// U-type immediate: bits 31:12 in place, low 12 bits zero.
#[must_use]
pub const fn imm_u(word: u32) -> u32 {
    word & 0xFFFF_F000
}

/// S-type immediate: bits 31:25 and 11:7, sign-extended.
#[must_use]
pub const fn imm_s(word: u32) -> i32 {
    let value = ((word >> 25) << 5) | ((word >> 7) & 0x1F);
    sign_extend(value, 12)
}

/// B-type immediate: a sign-extended, even, 13-bit byte offset.
#[must_use]
pub const fn imm_b(word: u32) -> i32 {
    let value = ((word >> 31) << 12)
        | (((word >> 7) & 0x1) << 11)
        | (((word >> 25) & 0x3F) << 5)
        | (((word >> 8) & 0xF) << 1);
    sign_extend(value, 13)
}

/// J-type immediate: a sign-extended, even, 21-bit byte offset.
#[must_use]
pub const fn imm_j(word: u32) -> i32 {
    let value = ((word >> 31) << 20)
        | (((word >> 12) & 0xFF) << 12)
        | (((word >> 20) & 0x1) << 11)
        | (((word >> 21) & 0x3FF) << 1);
    sign_extend(value, 21)
}

/// Shift amount of an immediate shift, bits 24:20.
#[must_use]
pub const fn shamt(word: u32) -> u32 {
    (word >> 20) & 0x1F
}

/// CSR number, bits 31:20 unsigned.
#[must_use]
pub const fn csr(word: u32) -> u32 {
    word >> 20
}

/// A legal instruction with every operand field extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct DecodedInstruction {
    /// Raw instruction word.
    pub word: u32,
    /// Instruction selected by opcode, `funct3` and `funct7`.
    pub mnemonic: Mnemonic,
    /// Destination register field.
    pub rd: Register,
    /// First source register field (the `zimm` operand for CSR immediates).
    pub rs1: Register,
    /// Second source register field.
    pub rs2: Register,
    /// Format-specific immediate: the sign-extended offset or immediate,
    /// the shift amount, the in-place U immediate, or the CSR number.
    pub imm: i32,
}

impl DecodedInstruction {
    /// Operand layout of the decoded instruction.
    #[must_use]
    pub const fn format(&self) -> InstructionFormat {
        self.mnemonic.format()
    }
}

/// Result of decoding a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodedOrIllegal {
    /// Successfully decoded instruction.
    Instruction(DecodedInstruction),
    /// The word matches no legal RV32I encoding.
    Illegal(u32),
}

impl DecodedOrIllegal {
    /// Returns the decoded instruction if present.
    #[must_use]
    pub const fn instruction(self) -> Option<DecodedInstruction> {
        match self {
            Self::Instruction(insn) => Some(insn),
            Self::Illegal(_) => None,
        }
    }

    /// Returns `true` when the word is not a legal instruction.
    #[must_use]
    pub const fn is_illegal(&self) -> bool {
        matches!(self, Self::Illegal(_))
    }
}

/// Stateless RV32I decoder.
pub struct Decoder;

impl Decoder {
    /// Decodes a 32-bit instruction word.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub const fn decode(word: u32) -> DecodedOrIllegal {
        let Some(mnemonic) = classify(word) else {
            return DecodedOrIllegal::Illegal(word);
        };

        let imm = match mnemonic.format() {
            InstructionFormat::Register => 0,
            InstructionFormat::Immediate | InstructionFormat::Offset | InstructionFormat::System => {
                imm_i(word)
            }
            InstructionFormat::Shift => shamt(word) as i32,
            InstructionFormat::Store => imm_s(word),
            InstructionFormat::Branch => imm_b(word),
            InstructionFormat::Upper => imm_u(word) as i32,
            InstructionFormat::Jump => imm_j(word),
            InstructionFormat::Csr | InstructionFormat::CsrImmediate => csr(word) as i32,
        };

        DecodedOrIllegal::Instruction(DecodedInstruction {
            word,
            mnemonic,
            rd: rd(word),
            rs1: rs1(word),
            rs2: rs2(word),
            imm,
        })
    }
}
