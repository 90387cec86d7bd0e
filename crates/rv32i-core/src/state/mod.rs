//! Architectural state: register file and run state.

/// Integer register identifiers and the register file.
pub mod registers;
/// Running/halted state machine.
pub mod run_state;

pub use registers::{
    Register, RegisterFile, GENERAL_REGISTER_COUNT, REGISTER_RESET_PATTERN,
};
pub use run_state::RunState;
