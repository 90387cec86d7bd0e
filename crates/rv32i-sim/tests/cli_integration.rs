//! Integration tests for the rv32i CLI.

use env_logger as _;
use log as _;
use rv32i_core as _;
use rv32i_sim as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use thiserror as _;

fn binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_rv32i"))
}

fn create_program(dir: &Path, name: &str, words: &[u32]) -> PathBuf {
    let path = dir.join(name);
    let bytes: Vec<u8> = words.iter().flat_map(|word| word.to_le_bytes()).collect();
    fs::write(&path, bytes).unwrap();
    path
}

fn run_cli(args: &[&str]) -> Output {
    Command::new(binary_path())
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to run rv32i")
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

// addi x1,x0,0x10; addi x2,x0,0x2a; sw x2,0(x1); lw x3,0(x1); ebreak
const STORE_LOAD: [u32; 5] = [
    0x0100_0093,
    0x02A0_0113,
    0x0020_A023,
    0x0000_A183,
    0x0010_0073,
];

#[test]
fn runs_program_to_ebreak() {
    let temp_dir = tempfile::tempdir().unwrap();
    let program = create_program(temp_dir.path(), "prog.bin", &[0x0050_0093, 0x0010_0073]);

    let output = run_cli(&[program.to_str().unwrap()]);

    assert!(output.status.success());
    assert_eq!(
        stdout_of(&output),
        "Execution terminated. Reason: EBREAK instruction\n2 instructions executed\n"
    );
}

#[test]
fn store_overwriting_ebreak_halts_illegal() {
    let temp_dir = tempfile::tempdir().unwrap();
    let program = create_program(temp_dir.path(), "prog.bin", &STORE_LOAD);

    let output = run_cli(&["-i", program.to_str().unwrap()]);

    assert!(output.status.success());
    let stdout = stdout_of(&output);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 7);
    assert_eq!(
        lines[2],
        "00000008: 0020a023  sw      x2,0(x1)                   // m32(0x00000010 + 0x00000000) = 0x0000002a"
    );
    assert_eq!(lines[4], "00000010: 0000002a  ERROR: UNIMPLEMENTED INSTRUCTION");
    assert_eq!(lines[5], "Execution terminated. Reason: Illegal instruction");
    assert_eq!(lines[6], "5 instructions executed");
}

#[test]
fn exec_limit_is_decimal() {
    let temp_dir = tempfile::tempdir().unwrap();
    // jal x0, 0
    let program = create_program(temp_dir.path(), "loop.bin", &[0x0000_006F]);

    let output = run_cli(&["-l", "10", program.to_str().unwrap()]);

    assert!(output.status.success());
    assert_eq!(
        stdout_of(&output),
        "Execution terminated. Reason: none\n10 instructions executed\n"
    );
}

#[test]
fn disassembly_and_dump_use_requested_memory_size() {
    let temp_dir = tempfile::tempdir().unwrap();
    let program = create_program(temp_dir.path(), "prog.bin", &[0x0010_0073]);

    let output = run_cli(&["-dz", "-m", "0x20", program.to_str().unwrap()]);

    assert!(output.status.success());
    let stdout = stdout_of(&output);
    let lines: Vec<&str> = stdout.lines().collect();
    // 8 disassembly rows, 5 hart rows, 2 memory rows, 2 summary lines
    assert_eq!(lines.len(), 17);
    assert_eq!(lines[0], "00000000: 00100073  ebreak");
    assert!(lines[8].starts_with(" x0 00000000 f0f0f0f0 00000020 "));
    assert_eq!(lines[12], " pc 00000000");
    assert!(lines[13].starts_with("00000000: 73 00 10 00"));
}

#[test]
fn register_trace_precedes_each_instruction() {
    let temp_dir = tempfile::tempdir().unwrap();
    let program = create_program(temp_dir.path(), "prog.bin", &[0x0050_0093, 0x0010_0073]);

    let output = run_cli(&["-r", program.to_str().unwrap()]);

    assert!(output.status.success());
    let stdout = stdout_of(&output);
    let pc_rows: Vec<&str> = stdout.lines().filter(|line| line.starts_with(" pc ")).collect();
    assert_eq!(pc_rows, [" pc 00000000", " pc 00000004"]);
}

#[test]
fn oversize_image_fails() {
    let temp_dir = tempfile::tempdir().unwrap();
    let program = create_program(temp_dir.path(), "big.bin", &[0; 0x80]);

    let output = run_cli(&[program.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("program too big"));
}

#[test]
fn missing_file_fails() {
    let temp_dir = tempfile::tempdir().unwrap();
    let missing = temp_dir.path().join("missing.bin");

    let output = run_cli(&[missing.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("missing.bin"));
}

#[test]
fn help_prints_usage() {
    let output = run_cli(&["--help"]);

    assert!(output.status.success());
    assert!(stdout_of(&output).starts_with("Usage: rv32i"));
}

#[test]
fn missing_input_is_usage_error() {
    let output = run_cli(&["-i"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("missing input path"));
    assert!(stderr.contains("Usage: rv32i"));
}
