//! Instruction disassembly.
//!
//! Renders instructions as `mnemonic operands`, with the mnemonic
//! left-justified to [`MNEMONIC_WIDTH`] columns and operands separated by
//! commas without spaces. Branch and jump targets are printed as absolute
//! addresses, so rendering needs the instruction's own address.

use std::fmt;

use crate::decoder::{DecodedInstruction, DecodedOrIllegal, Decoder};
use crate::encoding::InstructionFormat;
use crate::hex::{to_hex0x12, to_hex0x20, to_hex0x32, to_hex32};
use crate::memory::Memory;

/// Column width of the mnemonic field.
pub const MNEMONIC_WIDTH: usize = 8;

/// Rendering of any word that is not a legal instruction.
pub const ILLEGAL_RENDERING: &str = "ERROR: UNIMPLEMENTED INSTRUCTION";

/// A single disassembled memory word.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct DisassemblyRow {
    /// Address of the word.
    pub addr: u32,
    /// Raw instruction word.
    pub word: u32,
    /// Rendered instruction text.
    pub text: String,
}

impl fmt::Display for DisassemblyRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}  {}", to_hex32(self.addr), to_hex32(self.word), self.text)
    }
}

/// Renders the word found at `addr`.
#[must_use]
pub fn render(addr: u32, word: u32) -> String {
    match Decoder::decode(word) {
        DecodedOrIllegal::Instruction(insn) => render_decoded(addr, &insn),
        DecodedOrIllegal::Illegal(_) => ILLEGAL_RENDERING.to_owned(),
    }
}

/// Renders an already decoded instruction located at `addr`.
#[must_use]
#[allow(clippy::cast_sign_loss)]
pub fn render_decoded(addr: u32, insn: &DecodedInstruction) -> String {
    let name = insn.mnemonic.name();
    let (rd, rs1, rs2, imm) = (insn.rd, insn.rs1, insn.rs2, insn.imm);

    match insn.format() {
        InstructionFormat::System => name.to_owned(),
        InstructionFormat::Upper => {
            format!("{name:<MNEMONIC_WIDTH$}{rd},{}", to_hex0x20((imm as u32) >> 12))
        }
        InstructionFormat::Jump => format!(
            "{name:<MNEMONIC_WIDTH$}{rd},{}",
            to_hex0x32(addr.wrapping_add_signed(imm))
        ),
        InstructionFormat::Offset => format!("{name:<MNEMONIC_WIDTH$}{rd},{imm}({rs1})"),
        InstructionFormat::Store => format!("{name:<MNEMONIC_WIDTH$}{rs2},{imm}({rs1})"),
        InstructionFormat::Branch => format!(
            "{name:<MNEMONIC_WIDTH$}{rs1},{rs2},{}",
            to_hex0x32(addr.wrapping_add_signed(imm))
        ),
        InstructionFormat::Immediate | InstructionFormat::Shift => {
            format!("{name:<MNEMONIC_WIDTH$}{rd},{rs1},{imm}")
        }
        InstructionFormat::Register => format!("{name:<MNEMONIC_WIDTH$}{rd},{rs1},{rs2}"),
        InstructionFormat::Csr => {
            format!("{name:<MNEMONIC_WIDTH$}{rd},{},{rs1}", to_hex0x12(imm as u32))
        }
        InstructionFormat::CsrImmediate => format!(
            "{name:<MNEMONIC_WIDTH$}{rd},{},{}",
            to_hex0x12(imm as u32),
            rs1.index()
        ),
    }
}

/// Disassembles every aligned word of `memory`, in address order.
#[must_use]
pub fn disassemble(memory: &Memory) -> Vec<DisassemblyRow> {
    (0..memory.size())
        .step_by(4)
        .map(|addr| {
            let word = memory.read32(addr);
            DisassemblyRow {
                addr,
                word,
                text: render(addr, word),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{disassemble, render, ILLEGAL_RENDERING};
    use crate::memory::Memory;

    #[test]
    fn upper_immediates() {
        assert_eq!(render(0, 0x1234_50B7), "lui     x1,0x12345");
        assert_eq!(render(0, 0xFFFF_F117), "auipc   x2,0xfffff");
    }

    #[test]
    fn jumps_render_absolute_targets() {
        assert_eq!(render(0x20, 0x0100_00EF), "jal     x1,0x00000030");
        assert_eq!(render(0x20, 0xFF9F_F06F), "jal     x0,0x00000018");
        assert_eq!(render(0, 0xFFC0_8067), "jalr    x0,-4(x1)");
    }

    #[test]
    fn branches_render_absolute_targets() {
        assert_eq!(render(0x10, 0x0020_8463), "beq     x1,x2,0x00000018");
        assert_eq!(render(0x10, 0xFE20_9EE3), "bne     x1,x2,0x0000000c");
    }

    #[test]
    fn loads_and_stores_use_offset_syntax() {
        assert_eq!(render(0, 0xFFC0_A183), "lw      x3,-4(x1)");
        assert_eq!(render(0, 0x0020_A423), "sw      x2,8(x1)");
        assert_eq!(render(0, 0x0000_C183), "lbu     x3,0(x1)");
    }

    #[test]
    fn alu_forms() {
        assert_eq!(render(0, 0x0050_0093), "addi    x1,x0,5");
        assert_eq!(render(0, 0xFFF0_3093), "sltiu   x1,x0,-1");
        assert_eq!(render(0, 0x41F0_D093), "srai    x1,x1,31");
        assert_eq!(render(0, 0x0031_00B3), "add     x1,x2,x3");
        assert_eq!(render(0, 0x4031_00B3), "sub     x1,x2,x3");
    }

    #[test]
    fn system_forms() {
        assert_eq!(render(0, 0x0000_0073), "ecall");
        assert_eq!(render(0, 0x0010_0073), "ebreak");
        assert_eq!(render(0, 0xF140_22F3), "csrrs   x5,0xf14,x0");
        assert_eq!(render(0, 0xF143_D2F3), "csrrwi  x5,0xf14,7");
    }

    #[test]
    fn illegal_words() {
        assert_eq!(render(0, 0), ILLEGAL_RENDERING);
        assert_eq!(render(0, 0x0200_0033), ILLEGAL_RENDERING);
    }

    #[test]
    fn listing_covers_every_word() {
        let mut memory = Memory::new(16);
        memory.write32(0, 0x0050_0093);
        memory.write32(4, 0x0010_0073);
        let rows = disassemble(&memory);
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].to_string(), "00000000: 00500093  addi    x1,x0,5");
        assert_eq!(rows[1].to_string(), "00000004: 00100073  ebreak");
        assert_eq!(
            rows[2].to_string(),
            "00000008: a5a5a5a5  ERROR: UNIMPLEMENTED INSTRUCTION"
        );
    }
}
