#[macro_use]
extern crate log;

pub mod config;
pub mod errors;
mod input;
pub mod instruction;
mod interpreter;
pub mod labels;
pub mod loader;
pub mod operand;
mod operations;
pub mod registers;
mod string_unescape;
pub mod value;

pub use interpreter::{Interpreter, Status, Termination};
pub use loader::Program;
