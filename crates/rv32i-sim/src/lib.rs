//! Command-line driver for the RV32I functional simulator.
//!
//! The `rv32i` binary is a thin wrapper: it parses [`options::SimOptions`]
//! and hands them to [`runner::run`] with standard output as the sink.

use env_logger as _;

/// Raw binary image loading.
pub mod loader;
/// Argument parsing and usage text.
pub mod options;
/// One simulation from load to summary.
pub mod runner;

pub use loader::{load_file, LoadError};
pub use options::{parse_args, ParseResult, SimOptions, USAGE_TEXT};
pub use runner::{run, SimError};
