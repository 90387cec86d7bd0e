//! Instruction execution for the RV32I base integer set.
//!
//! Execution is a flat match over [`Mnemonic`]; related instructions share a
//! handler parameterised by a small operation enum. Each handler reads its
//! operands, computes, writes the result and advances `pc`, appending to the
//! trace line when one is supplied.

#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss
)]

mod trace;

pub use trace::{TraceLine, INSTRUCTION_WIDTH};

use crate::decoder::{DecodedInstruction, DecodedOrIllegal, Decoder};
use crate::disasm::{render_decoded, ILLEGAL_RENDERING};
use crate::encoding::{Mnemonic, CSR_MHARTID, MHARTID_VALUE};
use crate::hex::to_hex0x32;
use crate::{HaltReason, Hart, Register};

/// Outcome of executing one instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecuteOutcome {
    /// The instruction completed.
    Retired,
    /// The instruction stopped the hart.
    Halted(HaltReason),
}

/// Decodes and executes `word` as the instruction at the hart's `pc`.
pub fn execute_word(
    hart: &mut Hart<'_>,
    word: u32,
    trace: Option<&mut TraceLine>,
) -> ExecuteOutcome {
    match Decoder::decode(word) {
        DecodedOrIllegal::Instruction(insn) => execute_instruction(hart, &insn, trace),
        DecodedOrIllegal::Illegal(_) => execute_illegal(trace),
    }
}

/// Executes an already decoded instruction at the hart's `pc`.
pub fn execute_instruction(
    hart: &mut Hart<'_>,
    insn: &DecodedInstruction,
    trace: Option<&mut TraceLine>,
) -> ExecuteOutcome {
    match insn.mnemonic {
        Mnemonic::Lui => execute_lui(hart, insn, trace),
        Mnemonic::Auipc => execute_auipc(hart, insn, trace),
        Mnemonic::Jal => execute_jal(hart, insn, trace),
        Mnemonic::Jalr => execute_jalr(hart, insn, trace),
        Mnemonic::Beq => execute_branch(hart, insn, trace, BranchOp::Eq),
        Mnemonic::Bne => execute_branch(hart, insn, trace, BranchOp::Ne),
        Mnemonic::Blt => execute_branch(hart, insn, trace, BranchOp::Lt),
        Mnemonic::Bge => execute_branch(hart, insn, trace, BranchOp::Ge),
        Mnemonic::Bltu => execute_branch(hart, insn, trace, BranchOp::Ltu),
        Mnemonic::Bgeu => execute_branch(hart, insn, trace, BranchOp::Geu),
        Mnemonic::Lb => execute_load(hart, insn, trace, LoadOp::Byte),
        Mnemonic::Lh => execute_load(hart, insn, trace, LoadOp::Half),
        Mnemonic::Lw => execute_load(hart, insn, trace, LoadOp::Word),
        Mnemonic::Lbu => execute_load(hart, insn, trace, LoadOp::ByteUnsigned),
        Mnemonic::Lhu => execute_load(hart, insn, trace, LoadOp::HalfUnsigned),
        Mnemonic::Sb => execute_store(hart, insn, trace, StoreOp::Byte),
        Mnemonic::Sh => execute_store(hart, insn, trace, StoreOp::Half),
        Mnemonic::Sw => execute_store(hart, insn, trace, StoreOp::Word),
        Mnemonic::Addi => execute_alu(hart, insn, trace, AluOp::Add, Operand::Immediate),
        Mnemonic::Slti => execute_alu(hart, insn, trace, AluOp::Slt, Operand::Immediate),
        Mnemonic::Sltiu => execute_alu(hart, insn, trace, AluOp::Sltu, Operand::Immediate),
        Mnemonic::Xori => execute_alu(hart, insn, trace, AluOp::Xor, Operand::Immediate),
        Mnemonic::Ori => execute_alu(hart, insn, trace, AluOp::Or, Operand::Immediate),
        Mnemonic::Andi => execute_alu(hart, insn, trace, AluOp::And, Operand::Immediate),
        Mnemonic::Slli => execute_alu(hart, insn, trace, AluOp::Sll, Operand::Immediate),
        Mnemonic::Srli => execute_alu(hart, insn, trace, AluOp::Srl, Operand::Immediate),
        Mnemonic::Srai => execute_alu(hart, insn, trace, AluOp::Sra, Operand::Immediate),
        Mnemonic::Add => execute_alu(hart, insn, trace, AluOp::Add, Operand::Register),
        Mnemonic::Sub => execute_alu(hart, insn, trace, AluOp::Sub, Operand::Register),
        Mnemonic::Sll => execute_alu(hart, insn, trace, AluOp::Sll, Operand::Register),
        Mnemonic::Slt => execute_alu(hart, insn, trace, AluOp::Slt, Operand::Register),
        Mnemonic::Sltu => execute_alu(hart, insn, trace, AluOp::Sltu, Operand::Register),
        Mnemonic::Xor => execute_alu(hart, insn, trace, AluOp::Xor, Operand::Register),
        Mnemonic::Srl => execute_alu(hart, insn, trace, AluOp::Srl, Operand::Register),
        Mnemonic::Sra => execute_alu(hart, insn, trace, AluOp::Sra, Operand::Register),
        Mnemonic::Or => execute_alu(hart, insn, trace, AluOp::Or, Operand::Register),
        Mnemonic::And => execute_alu(hart, insn, trace, AluOp::And, Operand::Register),
        Mnemonic::Ebreak => execute_ebreak(hart, insn, trace),
        Mnemonic::Csrrs => execute_csrrs(hart, insn, trace),
        // Decoded and disassembled, but not implemented by this hart.
        Mnemonic::Ecall
        | Mnemonic::Csrrw
        | Mnemonic::Csrrc
        | Mnemonic::Csrrwi
        | Mnemonic::Csrrsi
        | Mnemonic::Csrrci => execute_illegal(trace),
    }
}

fn hex(value: i32) -> String {
    to_hex0x32(value as u32)
}

fn advance(hart: &mut Hart<'_>) -> ExecuteOutcome {
    hart.pc = hart.pc.wrapping_add(4);
    ExecuteOutcome::Retired
}

fn execute_illegal(trace: Option<&mut TraceLine>) -> ExecuteOutcome {
    if let Some(line) = trace {
        line.record_bare(ILLEGAL_RENDERING);
    }
    ExecuteOutcome::Halted(HaltReason::IllegalInstruction)
}

fn execute_ebreak(
    hart: &Hart<'_>,
    insn: &DecodedInstruction,
    trace: Option<&mut TraceLine>,
) -> ExecuteOutcome {
    if let Some(line) = trace {
        line.record(&render_decoded(hart.pc, insn), format_args!("HALT"));
    }
    ExecuteOutcome::Halted(HaltReason::Ebreak)
}

fn execute_lui(
    hart: &mut Hart<'_>,
    insn: &DecodedInstruction,
    trace: Option<&mut TraceLine>,
) -> ExecuteOutcome {
    let value = insn.imm;
    if let Some(line) = trace {
        line.record(
            &render_decoded(hart.pc, insn),
            format_args!("{} = {}", insn.rd, hex(value)),
        );
    }
    hart.regs.set(insn.rd, value);
    advance(hart)
}

fn execute_auipc(
    hart: &mut Hart<'_>,
    insn: &DecodedInstruction,
    trace: Option<&mut TraceLine>,
) -> ExecuteOutcome {
    let pc = hart.pc;
    let value = pc.wrapping_add(insn.imm as u32);
    if let Some(line) = trace {
        line.record(
            &render_decoded(pc, insn),
            format_args!(
                "{} = {} + {} = {}",
                insn.rd,
                to_hex0x32(pc),
                hex(insn.imm),
                to_hex0x32(value)
            ),
        );
    }
    hart.regs.set(insn.rd, value as i32);
    advance(hart)
}

fn execute_jal(
    hart: &mut Hart<'_>,
    insn: &DecodedInstruction,
    trace: Option<&mut TraceLine>,
) -> ExecuteOutcome {
    let pc = hart.pc;
    let link = pc.wrapping_add(4);
    let target = pc.wrapping_add_signed(insn.imm);
    if let Some(line) = trace {
        line.record(
            &render_decoded(pc, insn),
            format_args!(
                "{} = {}, pc = {} + {} = {}",
                insn.rd,
                to_hex0x32(link),
                to_hex0x32(pc),
                hex(insn.imm),
                to_hex0x32(target)
            ),
        );
    }
    hart.regs.set(insn.rd, link as i32);
    hart.pc = target;
    ExecuteOutcome::Retired
}

fn execute_jalr(
    hart: &mut Hart<'_>,
    insn: &DecodedInstruction,
    trace: Option<&mut TraceLine>,
) -> ExecuteOutcome {
    let pc = hart.pc;
    let link = pc.wrapping_add(4);
    // rs1 is read before rd is written; they may be the same register.
    let base = hart.regs.get(insn.rs1);
    let target = (base.wrapping_add(insn.imm) as u32) & !1;
    if let Some(line) = trace {
        line.record(
            &render_decoded(pc, insn),
            format_args!(
                "{} = {}, pc = ({} + {}) & 0xfffffffe = {}",
                insn.rd,
                to_hex0x32(link),
                hex(insn.imm),
                hex(base),
                to_hex0x32(target)
            ),
        );
    }
    hart.regs.set(insn.rd, link as i32);
    hart.pc = target;
    ExecuteOutcome::Retired
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BranchOp {
    Eq,
    Ne,
    Lt,
    Ge,
    Ltu,
    Geu,
}

impl BranchOp {
    const fn taken(self, a: i32, b: i32) -> bool {
        match self {
            Self::Eq => a == b,
            Self::Ne => a != b,
            Self::Lt => a < b,
            Self::Ge => a >= b,
            Self::Ltu => (a as u32) < (b as u32),
            Self::Geu => (a as u32) >= (b as u32),
        }
    }

    const fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Ge => ">=",
            Self::Ltu => "<U",
            Self::Geu => ">=U",
        }
    }
}

fn execute_branch(
    hart: &mut Hart<'_>,
    insn: &DecodedInstruction,
    trace: Option<&mut TraceLine>,
    op: BranchOp,
) -> ExecuteOutcome {
    let pc = hart.pc;
    let a = hart.regs.get(insn.rs1);
    let b = hart.regs.get(insn.rs2);
    let next = if op.taken(a, b) {
        pc.wrapping_add_signed(insn.imm)
    } else {
        pc.wrapping_add(4)
    };
    if let Some(line) = trace {
        line.record(
            &render_decoded(pc, insn),
            format_args!(
                "pc += ({} {} {} ? {} : 4) = {}",
                hex(a),
                op.symbol(),
                hex(b),
                hex(insn.imm),
                to_hex0x32(next)
            ),
        );
    }
    hart.pc = next;
    ExecuteOutcome::Retired
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadOp {
    Byte,
    Half,
    Word,
    ByteUnsigned,
    HalfUnsigned,
}

impl LoadOp {
    const fn width(self) -> &'static str {
        match self {
            Self::Byte | Self::ByteUnsigned => "m8",
            Self::Half | Self::HalfUnsigned => "m16",
            Self::Word => "m32",
        }
    }

    const fn extension(self) -> &'static str {
        match self {
            Self::Byte | Self::Half | Self::Word => "sx",
            Self::ByteUnsigned | Self::HalfUnsigned => "zx",
        }
    }
}

fn execute_load(
    hart: &mut Hart<'_>,
    insn: &DecodedInstruction,
    trace: Option<&mut TraceLine>,
    op: LoadOp,
) -> ExecuteOutcome {
    let base = hart.regs.get(insn.rs1);
    let addr = base.wrapping_add(insn.imm) as u32;
    let value = match op {
        LoadOp::Byte => hart.mem.read8_sign_extended(addr),
        LoadOp::Half => hart.mem.read16_sign_extended(addr),
        LoadOp::Word => hart.mem.read32_sign_extended(addr),
        LoadOp::ByteUnsigned => i32::from(hart.mem.read8(addr)),
        LoadOp::HalfUnsigned => i32::from(hart.mem.read16(addr)),
    };
    if let Some(line) = trace {
        line.record(
            &render_decoded(hart.pc, insn),
            format_args!(
                "{} = {}({}({} + {})) = {}",
                insn.rd,
                op.extension(),
                op.width(),
                hex(base),
                hex(insn.imm),
                hex(value)
            ),
        );
    }
    hart.regs.set(insn.rd, value);
    advance(hart)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StoreOp {
    Byte,
    Half,
    Word,
}

fn execute_store(
    hart: &mut Hart<'_>,
    insn: &DecodedInstruction,
    trace: Option<&mut TraceLine>,
    op: StoreOp,
) -> ExecuteOutcome {
    let base = hart.regs.get(insn.rs1);
    let addr = base.wrapping_add(insn.imm) as u32;
    let source = hart.regs.get(insn.rs2) as u32;
    let (width, stored) = match op {
        StoreOp::Byte => ("m8", source & 0xFF),
        StoreOp::Half => ("m16", source & 0xFFFF),
        StoreOp::Word => ("m32", source),
    };
    if let Some(line) = trace {
        line.record(
            &render_decoded(hart.pc, insn),
            format_args!(
                "{width}({} + {}) = {}",
                hex(base),
                hex(insn.imm),
                to_hex0x32(stored)
            ),
        );
    }
    match op {
        StoreOp::Byte => hart.mem.write8(addr, stored as u8),
        StoreOp::Half => hart.mem.write16(addr, stored as u16),
        StoreOp::Word => hart.mem.write32(addr, stored),
    }
    advance(hart)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AluOp {
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
}

/// Source of an ALU instruction's second operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operand {
    Register,
    Immediate,
}

impl AluOp {
    fn apply(self, a: i32, b: i32) -> i32 {
        let shamt = (b as u32) & 0x1F;
        match self {
            Self::Add => a.wrapping_add(b),
            Self::Sub => a.wrapping_sub(b),
            Self::Sll => ((a as u32) << shamt) as i32,
            Self::Slt => i32::from(a < b),
            Self::Sltu => i32::from((a as u32) < (b as u32)),
            Self::Xor => a ^ b,
            Self::Srl => ((a as u32) >> shamt) as i32,
            Self::Sra => a >> shamt,
            Self::Or => a | b,
            Self::And => a & b,
        }
    }

    const fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Sll => "<<",
            Self::Slt => "<",
            Self::Sltu => "<U",
            Self::Xor => "^",
            Self::Srl | Self::Sra => ">>",
            Self::Or => "|",
            Self::And => "&",
        }
    }
}

fn execute_alu(
    hart: &mut Hart<'_>,
    insn: &DecodedInstruction,
    trace: Option<&mut TraceLine>,
    op: AluOp,
    operand: Operand,
) -> ExecuteOutcome {
    let a = hart.regs.get(insn.rs1);
    let b = match operand {
        Operand::Register => hart.regs.get(insn.rs2),
        Operand::Immediate => insn.imm,
    };
    let result = op.apply(a, b);

    if let Some(line) = trace {
        let rendering = render_decoded(hart.pc, insn);
        let rd = insn.rd;
        let sym = op.symbol();
        match (op, operand) {
            (AluOp::Sll | AluOp::Srl | AluOp::Sra, _) => line.record(
                &rendering,
                format_args!("{rd} = {} {sym} {} = {}", hex(a), (b as u32) & 0x1F, hex(result)),
            ),
            (AluOp::Slt, Operand::Immediate) => line.record(
                &rendering,
                format_args!("{rd} = ({} {sym} {b}) ? 1 : 0 = {}", hex(a), hex(result)),
            ),
            (AluOp::Sltu, Operand::Immediate) => line.record(
                &rendering,
                format_args!(
                    "{rd} = ({} {sym} {}) ? 1 : 0 = {}",
                    hex(a),
                    b as u32,
                    hex(result)
                ),
            ),
            (AluOp::Slt | AluOp::Sltu, Operand::Register) => line.record(
                &rendering,
                format_args!("{rd} = ({} {sym} {}) ? 1 : 0 = {}", hex(a), hex(b), hex(result)),
            ),
            _ => line.record(
                &rendering,
                format_args!("{rd} = {} {sym} {} = {}", hex(a), hex(b), hex(result)),
            ),
        }
    }

    hart.regs.set(insn.rd, result);
    advance(hart)
}

fn execute_csrrs(
    hart: &mut Hart<'_>,
    insn: &DecodedInstruction,
    trace: Option<&mut TraceLine>,
) -> ExecuteOutcome {
    let legal = insn.imm as u32 == CSR_MHARTID && insn.rs1 == Register::ZERO;
    if let Some(line) = trace {
        line.record(
            &render_decoded(hart.pc, insn),
            format_args!("{} = {MHARTID_VALUE}", insn.rd),
        );
    }
    if !legal {
        return ExecuteOutcome::Halted(HaltReason::IllegalCsr);
    }
    hart.regs.set(insn.rd, MHARTID_VALUE);
    advance(hart)
}
