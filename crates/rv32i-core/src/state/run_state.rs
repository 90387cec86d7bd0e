use crate::HaltReason;

/// Execution state machine of a hart.
///
/// `Halted` is terminal: only an explicit reset returns to `Running`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum RunState {
    /// Ready to fetch the next instruction.
    #[default]
    Running,
    /// Stopped; no further instruction is fetched until reset.
    Halted(HaltReason),
}

impl RunState {
    /// Returns the halt reason, if halted.
    #[must_use]
    pub const fn halt_reason(self) -> Option<HaltReason> {
        match self {
            Self::Halted(reason) => Some(reason),
            Self::Running => None,
        }
    }

    /// Returns `true` once the hart has halted.
    #[must_use]
    pub const fn is_halted(self) -> bool {
        matches!(self, Self::Halted(_))
    }
}
