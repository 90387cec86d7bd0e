//! Drives one simulation from parsed options to the final summary.

use std::io::{self, Write};

use rv32i_core::{disassemble, Hart, HartConfig, Memory, RunOutcome};
use thiserror::Error;

use crate::loader::{load_file, LoadError};
use crate::options::SimOptions;

/// Failure of a simulator run.
#[derive(Debug, Error)]
pub enum SimError {
    /// The program image could not be loaded.
    #[error(transparent)]
    Load(#[from] LoadError),
    /// Writing trace or report output failed.
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

/// Loads the image, executes it and writes all requested output to `out`.
///
/// Output order: disassembly (`-d`), per-instruction traces (`-r`, `-i`),
/// hart and memory dump (`-z`), then the termination summary.
///
/// # Errors
///
/// Returns [`SimError::Load`] before anything is written when the image
/// cannot be loaded, and [`SimError::Output`] when `out` fails.
pub fn run<W: Write + ?Sized>(options: &SimOptions, out: &mut W) -> Result<RunOutcome, SimError> {
    let mut memory = Memory::new(options.memory_size);
    load_file(&options.infile, &mut memory)?;

    if options.disassemble {
        for row in disassemble(&memory) {
            writeln!(out, "{row}")?;
        }
    }

    let config = HartConfig {
        show_instructions: options.show_instructions,
        show_registers: options.show_registers,
    };
    let mut hart = Hart::with_config(&mut memory, config);
    let outcome = hart.run(options.exec_limit, out)?;

    if options.dump_after {
        out.write_all(hart.dump("").as_bytes())?;
        out.write_all(hart.memory().dump().as_bytes())?;
    }

    writeln!(out, "{outcome}")?;
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rv32i_core::HaltReason;
    use std::fs;
    use std::path::{Path, PathBuf};

    fn write_program(dir: &Path, words: &[u32]) -> PathBuf {
        let path = dir.join("prog.bin");
        let bytes: Vec<u8> = words.iter().flat_map(|word| word.to_le_bytes()).collect();
        fs::write(&path, bytes).expect("write program");
        path
    }

    fn run_to_string(options: &SimOptions) -> (RunOutcome, String) {
        let mut out = Vec::new();
        let outcome = run(options, &mut out).expect("run succeeds");
        (outcome, String::from_utf8(out).expect("utf8 output"))
    }

    #[test]
    fn plain_run_prints_only_summary() {
        let dir = tempfile::tempdir().expect("tempdir");
        // addi x1, x0, 5; ebreak
        let options = SimOptions::new(write_program(dir.path(), &[0x0050_0093, 0x0010_0073]));

        let (outcome, text) = run_to_string(&options);
        assert_eq!(outcome.halt, Some(HaltReason::Ebreak));
        assert_eq!(
            text,
            "Execution terminated. Reason: EBREAK instruction\n2 instructions executed\n"
        );
    }

    #[test]
    fn instruction_trace_precedes_summary() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut options = SimOptions::new(write_program(dir.path(), &[0x0050_0093, 0x0010_0073]));
        options.show_instructions = true;

        let (_, text) = run_to_string(&options);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("00000000: 00500093  addi    x1,x0,5"));
        assert!(lines[0].ends_with("// x1 = 0x00000000 + 0x00000005 = 0x00000005"));
        assert!(lines[1].ends_with("// HALT"));
    }

    #[test]
    fn disassembly_covers_all_memory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut options = SimOptions::new(write_program(dir.path(), &[0x0010_0073]));
        options.disassemble = true;
        options.memory_size = 0x20;

        let (_, text) = run_to_string(&options);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 8 + 2);
        assert_eq!(lines[0], "00000000: 00100073  ebreak");
        assert_eq!(lines[1], "00000004: a5a5a5a5  ERROR: UNIMPLEMENTED INSTRUCTION");
    }

    #[test]
    fn limit_stops_without_reason() {
        let dir = tempfile::tempdir().expect("tempdir");
        // jal x0, 0
        let mut options = SimOptions::new(write_program(dir.path(), &[0x0000_006F]));
        options.exec_limit = Some(3);

        let (outcome, text) = run_to_string(&options);
        assert_eq!(outcome.halt, None);
        assert_eq!(
            text,
            "Execution terminated. Reason: none\n3 instructions executed\n"
        );
    }

    #[test]
    fn dump_after_run_shows_hart_and_memory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut options = SimOptions::new(write_program(dir.path(), &[0x0010_0073]));
        options.dump_after = true;
        options.memory_size = 0x20;

        let (_, text) = run_to_string(&options);
        let lines: Vec<&str> = text.lines().collect();
        // 4 register rows, pc row, 2 memory rows, 2 summary lines
        assert_eq!(lines.len(), 9);
        assert_eq!(lines[4], " pc 00000000");
        assert!(lines[5].starts_with("00000000: 73 00 10 00 a5 a5 a5 a5  a5"));
    }

    #[test]
    fn load_failure_writes_nothing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("big.bin");
        fs::write(&path, [0_u8; 0x40]).expect("write image");
        let mut options = SimOptions::new(path);
        options.memory_size = 0x10;

        let mut out = Vec::new();
        let error = run(&options, &mut out).expect_err("image too large");
        assert!(matches!(error, SimError::Load(LoadError::TooLarge(_))));
        assert!(out.is_empty());
    }
}
