use crate::errors::Fault;
use crate::interpreter::{Status, Termination};
use crate::Interpreter;
use mips_types::constants::*;
use std::convert::TryFrom;
use std::io::{BufRead, Write};

impl<I: BufRead, O: Write> Interpreter<I, O> {
    /// Handle a syscall operation
    pub(crate) fn op_syscall(&mut self) -> Result<(), Fault> {
        match self.registers.get_int(REG_V0)? {
            SYSCALL_PRINT_INT => self.syscall_print_int(),
            SYSCALL_PRINT_STR => self.syscall_print_str(),
            SYSCALL_READ_INT => self.syscall_read_int(),
            SYSCALL_READ_STRING => self.syscall_read_str(),
            SYSCALL_EXIT => self.syscall_exit(),
            SYSCALL_PRINT_CHAR => self.syscall_print_char(),
            operation => {
                warn!("Unknown syscall operation {}", operation);
                Ok(())
            }
        }
    }

    /// Print an integer, or whatever `$a0` refers to
    fn syscall_print_int(&mut self) -> Result<(), Fault> {
        trace!("PRINT_INT");
        let text = self.labels.display(self.registers.get(REG_A0))?;
        self.print(&text)
    }

    /// Print a string
    fn syscall_print_str(&mut self) -> Result<(), Fault> {
        trace!("PRINT_STR");
        let text = self.labels.display(self.registers.get(REG_A0))?;
        self.print(&text)
    }

    /// Read an integer from the input
    fn syscall_read_int(&mut self) -> Result<(), Fault> {
        trace!("READ_INT");
        let value = self.input.read_int()?;
        self.registers.set_int(REG_V0, value);
        Ok(())
    }

    /// Read a line into the storage `$a0` refers to, keeping at most `$a1`
    /// characters. The storage becomes a string.
    fn syscall_read_str(&mut self) -> Result<(), Fault> {
        trace!("READ_STR");
        let label = self.registers.get_reference(REG_A0)?.to_string();
        let max_length = usize::try_from(self.registers.get_int(REG_A1)?).unwrap_or(0);
        let line = self.input.read_line()?;

        self.labels
            .replace_with_string(&label, line.chars().take(max_length).collect());
        Ok(())
    }

    /// Stop the program
    fn syscall_exit(&mut self) -> Result<(), Fault> {
        trace!("EXIT");
        self.status = Status::Terminated(Termination::Exit);
        Ok(())
    }

    /// Print the character with the code in `$a0`
    fn syscall_print_char(&mut self) -> Result<(), Fault> {
        trace!("PRINT_CHAR");
        let code = self.registers.get_int(REG_A0)?;
        let character = u32::try_from(code)
            .ok()
            .and_then(char::from_u32)
            .ok_or(Fault::InvalidCharacter(code))?;

        self.print(character.encode_utf8(&mut [0; 4]))
    }

    /// Print text to the output
    fn print(&mut self, text: &str) -> Result<(), Fault> {
        self.output.write_all(text.as_bytes())?;
        self.output.flush()?;
        Ok(())
    }
}
