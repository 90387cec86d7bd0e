//! Core of an RV32I functional simulator: memory, register file, decoder,
//! disassembler and a single hart that executes one instruction per tick.

/// Zero-padded hex rendering helpers.
pub mod hex;

/// Flat little-endian simulated memory.
pub mod memory;
pub use memory::{AccessKind, Memory, MemoryError, DEFAULT_MEMORY_SIZE, MEMORY_FILL};

/// Register file and run-state model.
pub mod state;
pub use state::{
    Register, RegisterFile, RunState, GENERAL_REGISTER_COUNT, REGISTER_RESET_PATTERN,
};

/// Halt reasons.
pub mod fault;
pub use fault::HaltReason;

/// Opcode constants and mnemonic classification.
pub mod encoding;
pub use encoding::{classify, InstructionFormat, Mnemonic, CSR_MHARTID, MHARTID_VALUE};

/// Field extraction and instruction decoding.
pub mod decoder;
pub use decoder::{DecodedInstruction, DecodedOrIllegal, Decoder};

/// Instruction rendering and memory listings.
pub mod disasm;
pub use disasm::{disassemble, render, DisassemblyRow, ILLEGAL_RENDERING, MNEMONIC_WIDTH};

/// Host-facing configuration and result types.
pub mod api;
pub use api::{HartConfig, HartSnapshot, RunOutcome, StepOutcome};

/// Instruction execution handlers and trace lines.
pub mod execute;
pub use execute::{ExecuteOutcome, TraceLine, INSTRUCTION_WIDTH};

/// The hart: fetch, execute and trace loop.
pub mod hart;
pub use hart::Hart;

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;
