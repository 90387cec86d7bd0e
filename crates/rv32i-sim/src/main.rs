//! CLI entry point for the `rv32i` simulator binary.

use std::env;
use std::io::{self, Write};

use log as _;
use rv32i_core as _;
use rv32i_sim::{parse_args, run, ParseResult, SimError, SimOptions, USAGE_TEXT};
#[cfg(test)]
use tempfile as _;
use thiserror as _;

fn simulate(options: &SimOptions) -> i32 {
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let result = run(options, &mut out);
    let flushed = out.flush();

    match (result, flushed) {
        (Ok(_), Ok(())) => 0,
        (Err(SimError::Load(error)), _) => {
            eprintln!("error: {error}");
            eprintln!("{USAGE_TEXT}");
            1
        }
        (Err(error), _) => {
            eprintln!("error: {error}");
            1
        }
        (Ok(_), Err(error)) => {
            eprintln!("error: failed to write output: {error}");
            1
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let exit_code = match parse_args(env::args_os().skip(1)) {
        Ok(ParseResult::Help) => {
            println!("{USAGE_TEXT}");
            0
        }
        Ok(ParseResult::Run(options)) => simulate(&options),
        Err(error) => {
            eprintln!("error: {error}");
            eprintln!("{USAGE_TEXT}");
            1
        }
    };

    std::process::exit(exit_code);
}
