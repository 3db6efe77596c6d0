use crate::config::Config;
use crate::errors::{Fault, Malformed, StepError};
use crate::input::Input;
use crate::instruction::Mnemonic;
use crate::labels::Labels;
use crate::loader::Program;
use crate::operand::{resolve, Effect};
use crate::registers::Registers;
use mips_types::constants::REG_RA;
use std::io;
use std::io::{BufRead, StdinLock, Stdout, Write};

/// Whether the interpreter can keep going
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Status {
    Running,
    Terminated(Termination),
}

/// Why the interpreter stopped
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Termination {
    /// Ran past the last line
    EndOfProgram,
    /// The exit syscall
    Exit,
    /// A malformed instruction stopped the program before it ran
    Halted { line: usize, reason: Malformed },
    /// A fault was returned from `step`
    Faulted { line: usize },
}

/// Executes program text line by line
#[derive(Debug)]
pub struct Interpreter<I, O> {
    pub(crate) registers: Registers,
    pub(crate) labels: Labels,
    lines: Vec<String>,
    program_counter: usize,
    next_program_counter: usize,
    pub(crate) status: Status,
    pub(crate) input: Input<I>,
    pub(crate) output: O,
}

impl Interpreter<StdinLock<'static>, Stdout> {
    /// Create an interpreter which uses stdin and stdout for syscalls
    pub fn new(program: Program, config: Config) -> Self {
        Self::with_io(program, config, io::stdin().lock(), io::stdout())
    }
}

impl<I: BufRead, O: Write> Interpreter<I, O> {
    pub fn with_io(program: Program, config: Config, input: I, output: O) -> Self {
        Interpreter {
            registers: Registers::new(config.coerce_references),
            labels: program.labels,
            lines: program.lines,
            program_counter: program.entry,
            next_program_counter: program.entry + 1,
            status: Status::Running,
            input: Input::new(input),
            output,
        }
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == Status::Running
    }

    pub fn registers(&self) -> &Registers {
        &self.registers
    }

    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    pub fn program_counter(&self) -> usize {
        self.program_counter
    }

    /// Get the line which will run next
    pub fn current_line(&self) -> Option<&str> {
        self.lines.get(self.program_counter).map(String::as_str)
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn into_output(self) -> O {
        self.output
    }

    /// Run until the program terminates
    pub fn run(&mut self) -> Result<Termination, Fault> {
        while self.is_running() {
            self.step()?;
        }

        match &self.status {
            Status::Terminated(termination) => Ok(termination.clone()),
            Status::Running => unreachable!(),
        }
    }

    /// Execute the current line. A fault terminates the program and is
    /// returned.
    pub fn step(&mut self) -> Result<(), Fault> {
        if !self.is_running() {
            return Ok(());
        }

        if self.program_counter >= self.lines.len() {
            self.status = Status::Terminated(Termination::EndOfProgram);
            return Ok(());
        }

        let line = self.program_counter;
        self.next_program_counter = line + 1;

        match self.execute_line() {
            Ok(()) => {}
            Err(StepError::Malformed(reason)) => {
                debug!("Halted at line {}: {}", line, reason);
                self.status = Status::Terminated(Termination::Halted { line, reason });
                return Ok(());
            }
            Err(StepError::Fault(fault)) => {
                debug!("Fault at line {}: {}", line, fault);
                self.status = Status::Terminated(Termination::Faulted { line });
                return Err(fault);
            }
        }

        if self.is_running() {
            self.advance_program_counter();

            if self.program_counter >= self.lines.len() {
                self.status = Status::Terminated(Termination::EndOfProgram);
            }
        }

        Ok(())
    }

    fn advance_program_counter(&mut self) {
        self.program_counter = self.next_program_counter;
        self.next_program_counter += 1;
    }

    /// Continue at the target line after this step
    pub(crate) fn jump_to(&mut self, target: usize) {
        debug!("Jump from line {} to {}", self.program_counter, target);
        self.next_program_counter = target;
    }

    fn execute_line(&mut self) -> Result<(), StepError> {
        let line = self.lines[self.program_counter].trim().to_string();
        trace!("{:>4}: {}", self.program_counter, line);

        if line.is_empty() {
            return Ok(());
        }

        if line.starts_with("syscall") || line.starts_with(".syscall") {
            return self.op_syscall().map_err(StepError::from);
        }

        let (name, operands) = line
            .split_once(char::is_whitespace)
            .ok_or(Malformed::MissingOperands)?;
        let tokens = tokenize(operands);

        if !(1..=3).contains(&tokens.len()) {
            return Err(Malformed::OperandCount(tokens.len()).into());
        }

        let mnemonic = Mnemonic::parse(name)
            .ok_or_else(|| Malformed::UnknownMnemonic(name.to_string()))?;

        match resolve(mnemonic, &tokens, &self.registers, &self.labels)? {
            Effect::Execute(operands) => mnemonic.execute(&operands, &mut self.registers)?,
            Effect::Jump { target, link } => {
                if link {
                    self.registers
                        .set_int(REG_RA, self.program_counter as i32);
                }
                self.jump_to(target);
            }
            Effect::Return => self.op_return()?,
            Effect::Load {
                register,
                label,
                offset,
            } => self.op_load(register, &label, offset)?,
            Effect::Store {
                register,
                label,
                offset,
            } => self.op_store(register, &label, offset)?,
            Effect::Nothing => {}
        }

        Ok(())
    }
}

/// Split the operand list on commas, dropping trailing empty operands
fn tokenize(operands: &str) -> Vec<&str> {
    let mut tokens: Vec<&str> = operands.split(',').map(str::trim).collect();

    while tokens.last() == Some(&"") {
        tokens.pop();
    }

    tokens
}
