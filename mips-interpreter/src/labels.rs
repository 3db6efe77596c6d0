use crate::errors::Fault;
use crate::value::Value;
use mips_types::constants::WORD_SIZE;
use std::collections::HashMap;
use std::convert::TryFrom;

/// Every named location in a program
#[derive(Debug, Default, Clone)]
pub struct Labels {
    /// Text labels, mapped to the line they point at
    pub text: HashMap<String, usize>,
    /// Word storage reserved with `.space` or `.word`
    pub words: HashMap<String, Vec<i32>>,
    /// Strings from `.asciiz` or the read-string syscall
    pub strings: HashMap<String, String>,
}

impl Labels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the line a text label points at
    pub fn text_label(&self, name: &str) -> Option<usize> {
        self.text.get(name).copied()
    }

    /// Load the word at a byte offset into the label's storage
    pub fn load_word(&self, label: &str, byte_offset: i32) -> Result<i32, Fault> {
        let words = self.word_storage(label)?;
        let index = byte_offset / WORD_SIZE;

        usize::try_from(index)
            .ok()
            .and_then(|i| words.get(i))
            .copied()
            .ok_or_else(|| Fault::OutOfBounds {
                label: label.to_string(),
                index,
                length: words.len(),
            })
    }

    /// Store a word at a byte offset into the label's storage. Storing one
    /// word past the end grows the storage.
    pub fn store_word(&mut self, label: &str, byte_offset: i32, value: i32) -> Result<(), Fault> {
        let index = byte_offset / WORD_SIZE;
        let words = self
            .words
            .get_mut(label)
            .ok_or_else(|| Fault::UnknownStorage(label.to_string()))?;
        let length = words.len();

        match usize::try_from(index) {
            Ok(i) if i < length => words[i] = value,
            Ok(i) if i == length => words.push(value),
            _ => {
                return Err(Fault::OutOfBounds {
                    label: label.to_string(),
                    index,
                    length,
                })
            }
        }

        Ok(())
    }

    /// Replace a label's word storage with a string
    pub fn replace_with_string(&mut self, label: &str, string: String) {
        self.words.remove(label);
        self.strings.insert(label.to_string(), string);
    }

    /// Format a value for printing. References show the storage they name.
    pub fn display(&self, value: &Value) -> Result<String, Fault> {
        let label = match value {
            Value::Integer(value) => return Ok(value.to_string()),
            Value::Reference(label) => label,
        };

        if let Some(line) = self.text.get(label) {
            Ok(line.to_string())
        } else if let Some(words) = self.words.get(label) {
            Ok(format!("{:?}", words))
        } else if let Some(string) = self.strings.get(label) {
            Ok(string.clone())
        } else {
            Err(Fault::UnknownStorage(label.clone()))
        }
    }

    fn word_storage(&self, label: &str) -> Result<&Vec<i32>, Fault> {
        self.words
            .get(label)
            .ok_or_else(|| Fault::UnknownStorage(label.to_string()))
    }
}
