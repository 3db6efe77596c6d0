use crate::errors::Fault;
use crate::Interpreter;
use std::io::{BufRead, Write};

impl<I: BufRead, O: Write> Interpreter<I, O> {
    /// Load word
    pub(crate) fn op_load(&mut self, register: usize, label: &str, offset: i32) -> Result<(), Fault> {
        let value = self.labels.load_word(label, offset)?;
        trace!("Load {}[{}] = {}", label, offset, value);
        self.registers.set_int(register, value);
        Ok(())
    }

    /// Store word
    pub(crate) fn op_store(&mut self, register: usize, label: &str, offset: i32) -> Result<(), Fault> {
        let value = self.registers.get_int(register)?;
        trace!("Store {}[{}] = {}", label, offset, value);
        self.labels.store_word(label, offset, value)
    }
}
