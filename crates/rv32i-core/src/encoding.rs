//! RV32I opcode/funct3/funct7 constants and mnemonic classification.
//!
//! [`classify`] is the single source of truth for which encodings are legal.
//! Any word it rejects is an illegal instruction.

#![allow(clippy::unreadable_literal)]

/// `lui rd, imm`
pub const OPCODE_LUI: u32 = 0b0110111;
/// `auipc rd, imm`
pub const OPCODE_AUIPC: u32 = 0b0010111;
/// `jal rd, offset`
pub const OPCODE_JAL: u32 = 0b1101111;
/// `jalr rd, offset(rs1)`
pub const OPCODE_JALR: u32 = 0b1100111;
/// Conditional branches.
pub const OPCODE_BRANCH: u32 = 0b1100011;
/// Loads.
pub const OPCODE_LOAD: u32 = 0b0000011;
/// Stores.
pub const OPCODE_STORE: u32 = 0b0100011;
/// Register-immediate ALU operations.
pub const OPCODE_ALU_IMM: u32 = 0b0010011;
/// Register-register ALU operations.
pub const OPCODE_ALU_REG: u32 = 0b0110011;
/// `ecall`, `ebreak` and the CSR instructions.
pub const OPCODE_SYSTEM: u32 = 0b1110011;

#[allow(missing_docs)]
pub mod funct3 {
    pub const BEQ: u32 = 0b000;
    pub const BNE: u32 = 0b001;
    pub const BLT: u32 = 0b100;
    pub const BGE: u32 = 0b101;
    pub const BLTU: u32 = 0b110;
    pub const BGEU: u32 = 0b111;

    pub const LB: u32 = 0b000;
    pub const LH: u32 = 0b001;
    pub const LW: u32 = 0b010;
    pub const LBU: u32 = 0b100;
    pub const LHU: u32 = 0b101;

    pub const SB: u32 = 0b000;
    pub const SH: u32 = 0b001;
    pub const SW: u32 = 0b010;

    pub const ADD: u32 = 0b000;
    pub const SLL: u32 = 0b001;
    pub const SLT: u32 = 0b010;
    pub const SLTU: u32 = 0b011;
    pub const XOR: u32 = 0b100;
    pub const SRX: u32 = 0b101;
    pub const OR: u32 = 0b110;
    pub const AND: u32 = 0b111;

    pub const PRIV: u32 = 0b000;
    pub const CSRRW: u32 = 0b001;
    pub const CSRRS: u32 = 0b010;
    pub const CSRRC: u32 = 0b011;
    pub const CSRRWI: u32 = 0b101;
    pub const CSRRSI: u32 = 0b110;
    pub const CSRRCI: u32 = 0b111;
}

/// `funct7` for the base form of an operation (`add`, `srl`, `slli`, ...).
pub const FUNCT7_BASE: u32 = 0b0000000;
/// `funct7` selecting `sub`, `sra` and `srai`.
pub const FUNCT7_ALT: u32 = 0b0100000;

/// `imm_i` value selecting `ecall` under `funct3 == PRIV`.
pub const PRIV_ECALL: i32 = 0;
/// `imm_i` value selecting `ebreak` under `funct3 == PRIV`.
pub const PRIV_EBREAK: i32 = 1;

/// CSR number of `mhartid`, the only CSR this hart implements.
pub const CSR_MHARTID: u32 = 0xF14;
/// Value read from `mhartid` on this single-hart core.
pub const MHARTID_VALUE: i32 = 0;

/// Every RV32I instruction the decoder recognises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[allow(missing_docs)]
pub enum Mnemonic {
    Lui,
    Auipc,
    Jal,
    Jalr,
    Beq,
    Bne,
    Blt,
    Bge,
    Bltu,
    Bgeu,
    Lb,
    Lh,
    Lw,
    Lbu,
    Lhu,
    Sb,
    Sh,
    Sw,
    Addi,
    Slti,
    Sltiu,
    Xori,
    Ori,
    Andi,
    Slli,
    Srli,
    Srai,
    Add,
    Sub,
    Sll,
    Slt,
    Sltu,
    Xor,
    Srl,
    Sra,
    Or,
    And,
    Ecall,
    Ebreak,
    Csrrw,
    Csrrs,
    Csrrc,
    Csrrwi,
    Csrrsi,
    Csrrci,
}

/// Operand layout of an instruction, which decides both the immediate
/// extraction and the disassembly rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstructionFormat {
    /// `rd, rs1, rs2`
    Register,
    /// `rd, rs1, imm` with a sign-extended 12-bit immediate.
    Immediate,
    /// `rd, rs1, shamt` with the shift amount in bits 24:20.
    Shift,
    /// `rd, imm(rs1)` (loads and `jalr`).
    Offset,
    /// `rs2, imm(rs1)`
    Store,
    /// `rs1, rs2, target`
    Branch,
    /// `rd, imm[31:12]`
    Upper,
    /// `rd, target`
    Jump,
    /// `rd, csr, rs1`
    Csr,
    /// `rd, csr, zimm`
    CsrImmediate,
    /// No operands (`ecall`, `ebreak`).
    System,
}

impl Mnemonic {
    /// Assembly name of the instruction.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Lui => "lui",
            Self::Auipc => "auipc",
            Self::Jal => "jal",
            Self::Jalr => "jalr",
            Self::Beq => "beq",
            Self::Bne => "bne",
            Self::Blt => "blt",
            Self::Bge => "bge",
            Self::Bltu => "bltu",
            Self::Bgeu => "bgeu",
            Self::Lb => "lb",
            Self::Lh => "lh",
            Self::Lw => "lw",
            Self::Lbu => "lbu",
            Self::Lhu => "lhu",
            Self::Sb => "sb",
            Self::Sh => "sh",
            Self::Sw => "sw",
            Self::Addi => "addi",
            Self::Slti => "slti",
            Self::Sltiu => "sltiu",
            Self::Xori => "xori",
            Self::Ori => "ori",
            Self::Andi => "andi",
            Self::Slli => "slli",
            Self::Srli => "srli",
            Self::Srai => "srai",
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Sll => "sll",
            Self::Slt => "slt",
            Self::Sltu => "sltu",
            Self::Xor => "xor",
            Self::Srl => "srl",
            Self::Sra => "sra",
            Self::Or => "or",
            Self::And => "and",
            Self::Ecall => "ecall",
            Self::Ebreak => "ebreak",
            Self::Csrrw => "csrrw",
            Self::Csrrs => "csrrs",
            Self::Csrrc => "csrrc",
            Self::Csrrwi => "csrrwi",
            Self::Csrrsi => "csrrsi",
            Self::Csrrci => "csrrci",
        }
    }

    /// Operand layout of the instruction.
    #[must_use]
    pub const fn format(self) -> InstructionFormat {
        match self {
            Self::Lui | Self::Auipc => InstructionFormat::Upper,
            Self::Jal => InstructionFormat::Jump,
            Self::Jalr | Self::Lb | Self::Lh | Self::Lw | Self::Lbu | Self::Lhu => {
                InstructionFormat::Offset
            }
            Self::Beq | Self::Bne | Self::Blt | Self::Bge | Self::Bltu | Self::Bgeu => {
                InstructionFormat::Branch
            }
            Self::Sb | Self::Sh | Self::Sw => InstructionFormat::Store,
            Self::Addi | Self::Slti | Self::Sltiu | Self::Xori | Self::Ori | Self::Andi => {
                InstructionFormat::Immediate
            }
            Self::Slli | Self::Srli | Self::Srai => InstructionFormat::Shift,
            Self::Add
            | Self::Sub
            | Self::Sll
            | Self::Slt
            | Self::Sltu
            | Self::Xor
            | Self::Srl
            | Self::Sra
            | Self::Or
            | Self::And => InstructionFormat::Register,
            Self::Ecall | Self::Ebreak => InstructionFormat::System,
            Self::Csrrw | Self::Csrrs | Self::Csrrc => InstructionFormat::Csr,
            Self::Csrrwi | Self::Csrrsi | Self::Csrrci => InstructionFormat::CsrImmediate,
        }
    }
}

/// Selects the mnemonic for `word` by opcode, then `funct3`, then (where the
/// encoding needs it) `funct7` or the privileged immediate.
///
/// Returns `None` for any encoding not defined at some level.
#[must_use]
pub const fn classify(word: u32) -> Option<Mnemonic> {
    let funct3 = (word >> 12) & 0x7;
    let funct7 = (word >> 25) & 0x7F;

    let mnemonic = match word & 0x7F {
        OPCODE_LUI => Mnemonic::Lui,
        OPCODE_AUIPC => Mnemonic::Auipc,
        OPCODE_JAL => Mnemonic::Jal,
        OPCODE_JALR => match funct3 {
            0b000 => Mnemonic::Jalr,
            _ => return None,
        },
        OPCODE_BRANCH => match funct3 {
            funct3::BEQ => Mnemonic::Beq,
            funct3::BNE => Mnemonic::Bne,
            funct3::BLT => Mnemonic::Blt,
            funct3::BGE => Mnemonic::Bge,
            funct3::BLTU => Mnemonic::Bltu,
            funct3::BGEU => Mnemonic::Bgeu,
            _ => return None,
        },
        OPCODE_LOAD => match funct3 {
            funct3::LB => Mnemonic::Lb,
            funct3::LH => Mnemonic::Lh,
            funct3::LW => Mnemonic::Lw,
            funct3::LBU => Mnemonic::Lbu,
            funct3::LHU => Mnemonic::Lhu,
            _ => return None,
        },
        OPCODE_STORE => match funct3 {
            funct3::SB => Mnemonic::Sb,
            funct3::SH => Mnemonic::Sh,
            funct3::SW => Mnemonic::Sw,
            _ => return None,
        },
        OPCODE_ALU_IMM => match (funct3, funct7) {
            (funct3::ADD, _) => Mnemonic::Addi,
            (funct3::SLT, _) => Mnemonic::Slti,
            (funct3::SLTU, _) => Mnemonic::Sltiu,
            (funct3::XOR, _) => Mnemonic::Xori,
            (funct3::OR, _) => Mnemonic::Ori,
            (funct3::AND, _) => Mnemonic::Andi,
            (funct3::SLL, FUNCT7_BASE) => Mnemonic::Slli,
            (funct3::SRX, FUNCT7_BASE) => Mnemonic::Srli,
            (funct3::SRX, FUNCT7_ALT) => Mnemonic::Srai,
            _ => return None,
        },
        OPCODE_ALU_REG => match (funct3, funct7) {
            (funct3::ADD, FUNCT7_BASE) => Mnemonic::Add,
            (funct3::ADD, FUNCT7_ALT) => Mnemonic::Sub,
            (funct3::SLL, FUNCT7_BASE) => Mnemonic::Sll,
            (funct3::SLT, FUNCT7_BASE) => Mnemonic::Slt,
            (funct3::SLTU, FUNCT7_BASE) => Mnemonic::Sltu,
            (funct3::XOR, FUNCT7_BASE) => Mnemonic::Xor,
            (funct3::SRX, FUNCT7_BASE) => Mnemonic::Srl,
            (funct3::SRX, FUNCT7_ALT) => Mnemonic::Sra,
            (funct3::OR, FUNCT7_BASE) => Mnemonic::Or,
            (funct3::AND, FUNCT7_BASE) => Mnemonic::And,
            _ => return None,
        },
        OPCODE_SYSTEM => match funct3 {
            funct3::PRIV => match (word as i32) >> 20 {
                PRIV_ECALL => Mnemonic::Ecall,
                PRIV_EBREAK => Mnemonic::Ebreak,
                _ => return None,
            },
            funct3::CSRRW => Mnemonic::Csrrw,
            funct3::CSRRS => Mnemonic::Csrrs,
            funct3::CSRRC => Mnemonic::Csrrc,
            funct3::CSRRWI => Mnemonic::Csrrwi,
            funct3::CSRRSI => Mnemonic::Csrrsi,
            funct3::CSRRCI => Mnemonic::Csrrci,
            _ => return None,
        },
        _ => return None,
    };

    Some(mnemonic)
}
