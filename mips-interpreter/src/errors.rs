use std::io;
use thiserror::Error;

/// Reasons an instruction line is rejected. Any of these stops the program
/// silently at the offending line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Malformed {
    #[error("no operands after the mnemonic")]
    MissingOperands,

    #[error("unknown mnemonic `{0}`")]
    UnknownMnemonic(String),

    #[error("expected 1 to 3 operands, found {0}")]
    OperandCount(usize),

    #[error("invalid register `{0}`")]
    InvalidRegister(String),

    #[error("invalid immediate `{0}`")]
    InvalidImmediate(String),

    #[error("unknown label `{0}`")]
    UnknownLabel(String),

    #[error("invalid memory operand `{0}`")]
    InvalidMemoryOperand(String),

    #[error("base register {0} does not hold a reference")]
    BaseNotReference(String),

    #[error("missing {0} operand")]
    MissingOperand(&'static str),
}

/// Runtime faults. Unlike `Malformed`, these are reported to the caller.
#[derive(Error, Debug)]
pub enum Fault {
    #[error("out-of-bounds access: {label}[{index}] (length {length})")]
    OutOfBounds {
        label: String,
        index: i32,
        length: usize,
    },

    #[error("no storage named `{0}`")]
    UnknownStorage(String),

    #[error("register {0} holds a reference where an integer is required")]
    ReferenceNotInteger(&'static str),

    #[error("register {0} does not hold a reference")]
    NotReference(&'static str),

    #[error("division by zero")]
    DivisionByZero,

    #[error("invalid return address {0}")]
    InvalidJumpTarget(i32),

    #[error("invalid character code {0}")]
    InvalidCharacter(i32),

    #[error("input `{0}` is not an integer")]
    InvalidInput(String),

    #[error("unexpected end of input")]
    EndOfInput,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Errors from reading a program
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("couldn't read {path}: {source}")]
    Open { path: String, source: io::Error },

    #[error("couldn't read line {line}: {source}")]
    Read { line: usize, source: io::Error },
}

/// Everything that can stop a single step
#[derive(Error, Debug)]
pub(crate) enum StepError {
    #[error(transparent)]
    Malformed(#[from] Malformed),

    #[error(transparent)]
    Fault(#[from] Fault),
}
