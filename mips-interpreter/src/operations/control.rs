use crate::errors::Fault;
use crate::Interpreter;
use mips_types::constants::REG_RA;
use std::convert::TryFrom;
use std::io::{BufRead, Write};

impl<I: BufRead, O: Write> Interpreter<I, O> {
    /// Return to the line after the one saved in `$ra` by `jal`
    pub(crate) fn op_return(&mut self) -> Result<(), Fault> {
        let saved_line = self.registers.get_int(REG_RA)?;
        let target = saved_line
            .checked_add(1)
            .and_then(|line| usize::try_from(line).ok())
            .ok_or(Fault::InvalidJumpTarget(saved_line))?;

        self.jump_to(target);
        Ok(())
    }
}
