//! Command-line option parsing for the `rv32i` binary.

use std::ffi::OsString;
use std::path::PathBuf;

use rv32i_core::DEFAULT_MEMORY_SIZE;

/// Usage text printed for `-h` and after argument errors.
pub const USAGE_TEXT: &str = "\
Usage: rv32i [-d] [-i] [-r] [-z] [-l exec-limit] [-m hex-mem-size] infile

Options:
  -d             Show disassembly before program execution
  -i             Show instruction printing during execution
  -r             Show register printing during execution
  -z             Show a dump of the regs & memory after simulation
  -l <limit>     Maximum number of instructions to execute (0 = no limit)
  -m <size>      Memory size in hex (default = 0x100)
  -h, --help     Show this help message

Examples:
  rv32i -i program.bin
  rv32i -dirz -m 0x200 -l 1000 program.bin
";

/// Everything a simulator run is configured by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimOptions {
    /// Print a disassembly of all memory before execution (`-d`).
    pub disassemble: bool,
    /// Per-instruction trace lines (`-i`).
    pub show_instructions: bool,
    /// Hart dump before each instruction (`-r`).
    pub show_registers: bool,
    /// Hart and memory dump after the run (`-z`).
    pub dump_after: bool,
    /// Instruction limit; `None` runs until the hart halts.
    pub exec_limit: Option<u64>,
    /// Size of the simulated memory in bytes.
    pub memory_size: u32,
    /// Binary image loaded at address 0.
    pub infile: PathBuf,
}

impl SimOptions {
    /// Options for `infile` with every flag off, no limit and the default
    /// memory size.
    #[must_use]
    pub const fn new(infile: PathBuf) -> Self {
        Self {
            disassemble: false,
            show_instructions: false,
            show_registers: false,
            dump_after: false,
            exec_limit: None,
            memory_size: DEFAULT_MEMORY_SIZE,
            infile,
        }
    }
}

/// Outcome of argument parsing.
#[derive(Debug, PartialEq, Eq)]
pub enum ParseResult {
    /// Run the simulator.
    Run(SimOptions),
    /// Print usage and exit successfully.
    Help,
}

/// Parses the arguments that follow the program name.
///
/// Single-letter flags may be bundled (`-dir`). Option values may be
/// attached (`-l100`) or given as the next argument (`-l 100`).
///
/// # Errors
///
/// Returns a message describing the first malformed, unknown or missing
/// argument.
#[allow(clippy::while_let_on_iterator)]
pub fn parse_args(mut args: impl Iterator<Item = OsString>) -> Result<ParseResult, String> {
    let mut disassemble = false;
    let mut show_instructions = false;
    let mut show_registers = false;
    let mut dump_after = false;
    let mut exec_limit = None;
    let mut memory_size = DEFAULT_MEMORY_SIZE;
    let mut infile: Option<PathBuf> = None;

    while let Some(arg) = args.next() {
        if arg == "--help" || arg == "-h" {
            return Ok(ParseResult::Help);
        }

        let text = arg.to_string_lossy().to_string();
        let Some(flags) = text.strip_prefix('-').filter(|rest| !rest.is_empty()) else {
            if infile.is_some() {
                return Err("multiple input paths provided".to_string());
            }
            infile = Some(PathBuf::from(arg));
            continue;
        };

        for (offset, flag) in flags.char_indices() {
            match flag {
                'd' => disassemble = true,
                'i' => show_instructions = true,
                'r' => show_registers = true,
                'z' => dump_after = true,
                'h' => return Ok(ParseResult::Help),
                'l' | 'm' => {
                    let attached = &flags[offset + flag.len_utf8()..];
                    let value = if attached.is_empty() {
                        args.next()
                            .map(|value| value.to_string_lossy().to_string())
                            .ok_or_else(|| format!("missing value for -{flag}"))?
                    } else {
                        attached.to_string()
                    };
                    if flag == 'l' {
                        exec_limit = parse_exec_limit(&value)?;
                    } else {
                        memory_size = parse_memory_size(&value)?;
                    }
                    break;
                }
                other => return Err(format!("unknown option: -{other}")),
            }
        }
    }

    let infile = infile.ok_or_else(|| "missing input path".to_string())?;
    Ok(ParseResult::Run(SimOptions {
        disassemble,
        show_instructions,
        show_registers,
        dump_after,
        exec_limit,
        memory_size,
        infile,
    }))
}

/// Parses a decimal instruction limit. Zero means no limit.
///
/// # Errors
///
/// Returns a message when `value` is not a decimal `u64`.
pub fn parse_exec_limit(value: &str) -> Result<Option<u64>, String> {
    let limit = value
        .trim()
        .parse::<u64>()
        .map_err(|_| format!("invalid exec limit: {value}"))?;
    Ok((limit != 0).then_some(limit))
}

/// Parses a hexadecimal memory size, with or without a `0x` prefix.
///
/// # Errors
///
/// Returns a message when `value` is not a hex `u32`.
pub fn parse_memory_size(value: &str) -> Result<u32, String> {
    let trimmed = value.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    u32::from_str_radix(digits, 16).map_err(|_| format!("invalid memory size: {value}"))
}
