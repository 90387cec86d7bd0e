//! A single RV32I hardware thread bound to a simulated memory.

use std::io;

use crate::execute::{execute_word, ExecuteOutcome, TraceLine};
use crate::hex::to_hex32;
use crate::{
    HaltReason, HartConfig, HartSnapshot, Memory, Register, RegisterFile, RunOutcome, RunState,
    StepOutcome,
};

/// Program counter, register file and run state of one hart.
///
/// The hart borrows its memory mutably for its whole lifetime; every state
/// change during execution happens inside [`Hart::tick`].
#[derive(Debug)]
pub struct Hart<'m> {
    pub(crate) mem: &'m mut Memory,
    pub(crate) regs: RegisterFile,
    pub(crate) pc: u32,
    insn_counter: u64,
    run_state: RunState,
    config: HartConfig,
}

impl<'m> Hart<'m> {
    /// Creates a hart in its reset state with tracing disabled.
    #[must_use]
    pub fn new(mem: &'m mut Memory) -> Self {
        Self::with_config(mem, HartConfig::default())
    }

    /// Creates a hart in its reset state with the given tracing switches.
    #[must_use]
    pub fn with_config(mem: &'m mut Memory, config: HartConfig) -> Self {
        let mut hart = Self {
            mem,
            regs: RegisterFile::new(),
            pc: 0,
            insn_counter: 0,
            run_state: RunState::Running,
            config,
        };
        hart.reset();
        hart
    }

    /// Returns to the initial state: `pc = 0`, registers reset, `sp` set to
    /// the memory size, counter cleared, running.
    pub fn reset(&mut self) {
        self.reset_to(0);
    }

    /// Like [`Hart::reset`], but starts execution at `entry`.
    #[allow(clippy::cast_possible_wrap)]
    pub fn reset_to(&mut self, entry: u32) {
        self.pc = entry;
        self.regs.reset();
        self.regs.set(Register::SP, self.mem.size() as i32);
        self.insn_counter = 0;
        self.run_state = RunState::Running;
    }

    /// Enables or disables the per-instruction trace line.
    pub const fn set_show_instructions(&mut self, enabled: bool) {
        self.config.show_instructions = enabled;
    }

    /// Enables or disables the hart dump before each instruction.
    pub const fn set_show_registers(&mut self, enabled: bool) {
        self.config.show_registers = enabled;
    }

    /// Current tracing switches.
    #[must_use]
    pub const fn config(&self) -> HartConfig {
        self.config
    }

    /// Executes one instruction, writing any enabled trace output to `out`.
    ///
    /// A halted hart does nothing. Otherwise the counter is incremented
    /// before fetch, so the instruction that halts the hart is counted.
    ///
    /// # Errors
    ///
    /// Returns any error from writing trace output. A failed register dump
    /// leaves the hart untouched; a failed trace line is reported after the
    /// instruction has executed.
    pub fn tick<W: io::Write + ?Sized>(&mut self, out: &mut W) -> io::Result<StepOutcome> {
        if self.run_state.is_halted() {
            return Ok(StepOutcome::AlreadyHalted);
        }

        if self.config.show_registers {
            out.write_all(self.dump("").as_bytes())?;
        }

        self.insn_counter = self.insn_counter.saturating_add(1);

        let pc = self.pc;
        let word = self.mem.read32(pc);

        let mut line = self
            .config
            .show_instructions
            .then(|| TraceLine::new(pc, word));
        let outcome = execute_word(self, word, line.as_mut());

        let step = match outcome {
            ExecuteOutcome::Retired => StepOutcome::Retired,
            ExecuteOutcome::Halted(reason) => {
                self.run_state = RunState::Halted(reason);
                log::debug!(
                    "hart halted at pc {} after {} instructions: {reason}",
                    to_hex32(pc),
                    self.insn_counter
                );
                StepOutcome::Halted(reason)
            }
        };

        if let Some(line) = line {
            writeln!(out, "{line}")?;
        }

        Ok(step)
    }

    /// Executes one instruction with all trace output discarded.
    pub fn step(&mut self) -> StepOutcome {
        self.tick(&mut io::sink())
            .unwrap_or(StepOutcome::AlreadyHalted)
    }

    /// Ticks until the hart halts or the instruction counter reaches
    /// `limit`. `None` runs without a limit.
    ///
    /// # Errors
    ///
    /// Returns the first error from writing trace output.
    pub fn run<W: io::Write + ?Sized>(
        &mut self,
        limit: Option<u64>,
        out: &mut W,
    ) -> io::Result<RunOutcome> {
        while !self.is_halted() && !matches!(limit, Some(max) if self.insn_counter >= max) {
            self.tick(out)?;
        }
        log::info!(
            "run stopped after {} instructions ({})",
            self.insn_counter,
            self.halt_reason()
                .map_or_else(|| "limit reached".to_owned(), |reason| reason.to_string())
        );
        Ok(RunOutcome {
            instructions: self.insn_counter,
            halt: self.halt_reason(),
        })
    }

    /// Program counter.
    #[must_use]
    pub const fn pc(&self) -> u32 {
        self.pc
    }

    /// Moves the program counter. Intended for host-side setup before a run.
    pub const fn set_pc(&mut self, pc: u32) {
        self.pc = pc;
    }

    /// Register file.
    #[must_use]
    pub const fn registers(&self) -> &RegisterFile {
        &self.regs
    }

    /// Mutable register file, for host-side setup before a run.
    pub const fn registers_mut(&mut self) -> &mut RegisterFile {
        &mut self.regs
    }

    /// Memory the hart executes from.
    #[must_use]
    pub const fn memory(&self) -> &Memory {
        &*self.mem
    }

    /// Returns `true` once an instruction has halted the hart.
    #[must_use]
    pub const fn is_halted(&self) -> bool {
        self.run_state.is_halted()
    }

    /// Why the hart halted, or `None` while running.
    #[must_use]
    pub const fn halt_reason(&self) -> Option<HaltReason> {
        self.run_state.halt_reason()
    }

    /// Current run state.
    #[must_use]
    pub const fn run_state(&self) -> RunState {
        self.run_state
    }

    /// Instructions fetched since reset.
    #[must_use]
    pub const fn insn_counter(&self) -> u64 {
        self.insn_counter
    }

    /// Register rows followed by `[hdr ] pc aaaaaaaa`.
    #[must_use]
    pub fn dump(&self, hdr: &str) -> String {
        let mut out = self.regs.dump(hdr);
        if !hdr.is_empty() {
            out.push_str(hdr);
            out.push(' ');
        }
        out.push_str(" pc ");
        out.push_str(&to_hex32(self.pc));
        out.push('\n');
        out
    }

    /// Copies out the architectural state.
    #[must_use]
    pub fn snapshot(&self) -> HartSnapshot {
        HartSnapshot {
            pc: self.pc,
            registers: self.regs.clone(),
            insn_counter: self.insn_counter,
            run_state: self.run_state,
        }
    }
}
