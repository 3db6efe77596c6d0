use crate::errors::Fault;
use std::io::BufRead;

/// Reads integers and lines from the program's input.
///
/// Reading an integer leaves the rest of its line pending, so a following
/// line read returns that remainder (often just an empty string) rather than
/// the next line.
#[derive(Debug)]
pub struct Input<R> {
    reader: R,
    /// Unread part of the current line, including its newline
    pending: String,
}

impl<R: BufRead> Input<R> {
    pub fn new(reader: R) -> Self {
        Input {
            reader,
            pending: String::new(),
        }
    }

    /// Read the next whitespace separated integer
    pub fn read_int(&mut self) -> Result<i32, Fault> {
        loop {
            let trimmed = self.pending.trim_start();

            if !trimmed.is_empty() {
                self.pending = trimmed.to_string();
                break;
            }

            self.pending.clear();
            if self.reader.read_line(&mut self.pending)? == 0 {
                return Err(Fault::EndOfInput);
            }
        }

        let end = self
            .pending
            .find(char::is_whitespace)
            .unwrap_or_else(|| self.pending.len());
        let token = &self.pending[..end];
        let value = token
            .parse::<i32>()
            .map_err(|_| Fault::InvalidInput(token.to_string()))?;
        self.pending.drain(..end);

        Ok(value)
    }

    /// Read the rest of the current line, without its line ending
    pub fn read_line(&mut self) -> Result<String, Fault> {
        if self.pending.is_empty() && self.reader.read_line(&mut self.pending)? == 0 {
            return Err(Fault::EndOfInput);
        }

        let line = self
            .pending
            .trim_end_matches(|c| c == '\n' || c == '\r')
            .to_string();
        self.pending.clear();

        Ok(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn integers_across_lines() {
        let mut input = Input::new(Cursor::new("  12 -3\n\n  7\n"));
        assert_eq!(input.read_int().unwrap(), 12);
        assert_eq!(input.read_int().unwrap(), -3);
        assert_eq!(input.read_int().unwrap(), 7);
        assert!(matches!(input.read_int(), Err(Fault::EndOfInput)));
    }

    #[test]
    fn line_after_integer_is_the_remainder() {
        let mut input = Input::new(Cursor::new("5\nhello world\r\n"));
        assert_eq!(input.read_int().unwrap(), 5);
        assert_eq!(input.read_line().unwrap(), "");
        assert_eq!(input.read_line().unwrap(), "hello world");
        assert!(matches!(input.read_line(), Err(Fault::EndOfInput)));
    }

    #[test]
    fn bad_integer() {
        let mut input = Input::new(Cursor::new("abc\n"));
        assert!(matches!(input.read_int(), Err(Fault::InvalidInput(token)) if token == "abc"));
    }
}
