use thiserror::Error;

/// Why the hart stopped executing.
///
/// Every fatal condition is reported through this type together with the
/// halted run state; nothing in the execution path panics or unwinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum HaltReason {
    /// An `ebreak` was executed. This is the normal way test programs end.
    #[error("EBREAK instruction")]
    Ebreak,
    /// The fetched word is not a supported encoding at some dispatch level.
    #[error("Illegal instruction")]
    IllegalInstruction,
    /// `csrrs` named a CSR other than `mhartid` or a non-zero source register.
    #[error("Illegal CSR in CSRRS instruction")]
    IllegalCsr,
}
