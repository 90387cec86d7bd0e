//! Host-facing configuration and result types for driving a [`crate::Hart`].

use std::fmt;

use crate::{HaltReason, RegisterFile, RunState};

/// Tracing switches for a hart. Both are off by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct HartConfig {
    /// Emit one trace line per executed instruction.
    pub show_instructions: bool,
    /// Emit a hart dump before each instruction.
    pub show_registers: bool,
}

/// Result of a single [`crate::Hart::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum StepOutcome {
    /// The instruction completed and the hart is still running.
    Retired,
    /// The instruction halted the hart.
    Halted(HaltReason),
    /// The hart was already halted; nothing happened.
    AlreadyHalted,
}

/// Summary of a [`crate::Hart::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct RunOutcome {
    /// Value of the instruction counter when the run stopped.
    pub instructions: u64,
    /// Why the hart halted, or `None` when the instruction limit stopped it.
    pub halt: Option<HaltReason>,
}

impl RunOutcome {
    /// Halt reason text, `none` when the hart is still running.
    #[must_use]
    pub fn reason_label(&self) -> String {
        self.halt
            .map_or_else(|| "none".to_owned(), |reason| reason.to_string())
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Execution terminated. Reason: {}", self.reason_label())?;
        write!(f, "{} instructions executed", self.instructions)
    }
}

/// Point-in-time copy of a hart's architectural state.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct HartSnapshot {
    /// Program counter.
    pub pc: u32,
    /// Integer registers.
    pub registers: RegisterFile,
    /// Instructions fetched since reset, including the one that halted.
    pub insn_counter: u64,
    /// Current run state.
    pub run_state: RunState,
}
