use crate::errors::Fault;
use crate::value::Value;
use mips_types::constants::*;

/// Holds the interpreter's registers
#[derive(Debug)]
pub struct Registers {
    /// General purpose registers followed by HI and LO
    registers: Vec<Value>,
    coerce_references: bool,
}

impl Default for Registers {
    fn default() -> Self {
        Self::new(false)
    }
}

impl Registers {
    pub fn new(coerce_references: bool) -> Self {
        Registers {
            registers: vec![Value::default(); REGISTER_COUNT],
            coerce_references,
        }
    }

    /// Get the value of a register. `$zero` is not special.
    pub fn get(&self, register: usize) -> &Value {
        &self.registers[register]
    }

    /// Set the value of a register
    pub fn set(&mut self, register: usize, value: Value) {
        self.registers[register] = value
    }

    /// Set an integer, dropping any reference the register held
    pub fn set_int(&mut self, register: usize, value: i32) {
        self.set(register, Value::Integer(value))
    }

    /// Get the integer value of a register
    pub fn get_int(&self, register: usize) -> Result<i32, Fault> {
        match self.get(register) {
            Value::Integer(value) => Ok(*value),
            Value::Reference(_) if self.coerce_references => Ok(0),
            Value::Reference(_) => Err(Fault::ReferenceNotInteger(REGISTER_NAMES[register])),
        }
    }

    /// Get the label a register refers to
    pub fn get_reference(&self, register: usize) -> Result<&str, Fault> {
        self.get(register)
            .as_reference()
            .ok_or(Fault::NotReference(REGISTER_NAMES[register]))
    }

    /// Iterate over `(name, value)` for every register
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        REGISTER_NAMES.iter().copied().zip(self.registers.iter())
    }
}

/// Get the register index from a name like `$t0`, `$ra` or `$12`.
/// Returns None if the name is not a valid register.
pub fn register_index(name: &str) -> Option<usize> {
    let name = name.strip_prefix('$')?;

    match name {
        "zero" => return Some(REG_ZERO),
        "at" => return Some(REG_AT),
        "gp" => return Some(REG_GP),
        "sp" => return Some(REG_SP),
        "fp" => return Some(30),
        "ra" => return Some(REG_RA),
        _ => {}
    }

    if name.bytes().all(|b| b.is_ascii_digit()) {
        return name.parse::<usize>().ok().filter(|index| *index < 32);
    }

    let mut chars = name.chars();
    let family = chars.next()?;
    let number = chars.next()?.to_digit(10)? as usize;
    if chars.next().is_some() {
        return None;
    }

    match (family, number) {
        ('v', 0..=1) => Some(REG_V0 + number),
        ('a', 0..=3) => Some(REG_A0 + number),
        ('t', 0..=7) => Some(8 + number),
        ('t', 8..=9) => Some(24 + number - 8),
        ('s', 0..=7) => Some(16 + number),
        ('k', 0..=1) => Some(26 + number),
        _ => None,
    }
}
