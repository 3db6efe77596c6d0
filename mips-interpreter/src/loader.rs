//! Turn assembly source into a `Program`

use crate::errors::LoadError;
use crate::labels::Labels;
use crate::operand::parse_immediate;
use crate::string_unescape::unescape_str;
use std::fs::File;
use std::io;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Largest `.space` reservation, in bytes
const MAX_SPACE_BYTES: usize = 1 << 24;

/// A loaded program, ready to be interpreted
#[derive(Debug, Default, Clone)]
pub struct Program {
    /// One entry per source line, with comments, labels and directives removed
    pub lines: Vec<String>,
    /// The line execution starts at
    pub entry: usize,
    pub labels: Labels,
}

impl Program {
    /// Load a program from a file
    pub fn from_file(path: &Path) -> Result<Self, LoadError> {
        let file = File::open(path).map_err(|source| LoadError::Open {
            path: path.display().to_string(),
            source,
        })?;

        Self::parse(BufReader::new(file))
    }

    /// Parse program source. Lines which can't be decoded are reported and
    /// left empty.
    pub fn parse<R: BufRead>(input: R) -> Result<Self, LoadError> {
        let mut program = Program::default();
        let mut in_text = false;

        for (line_number, line) in input.lines().enumerate() {
            let line = match line {
                Ok(line) => line,
                Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                    warn!("Couldn't read line {}: {}", line_number, e);
                    program.lines.push(String::new());
                    continue;
                }
                Err(source) => {
                    return Err(LoadError::Read {
                        line: line_number,
                        source,
                    })
                }
            };

            let line = strip_comment(line.trim()).trim();

            if line.starts_with(".data") {
                in_text = false;
                program.lines.push(String::new());
                continue;
            }

            if line.starts_with(".text") {
                in_text = true;
                program.entry = line_number + 1;
                program.lines.push(String::new());
                continue;
            }

            let statement = match split_label(line) {
                Some((name, rest)) => {
                    if in_text {
                        program.labels.text.insert(name.to_string(), line_number);
                    } else {
                        program.define_data(name, rest, line_number);
                    }
                    rest
                }
                None => line,
            };

            // Directives are fully handled here, so they don't reach the engine
            if statement.starts_with('.') && !statement.starts_with(".syscall") {
                program.lines.push(String::new());
            } else {
                program.lines.push(statement.to_string());
            }
        }

        info!(
            "Loaded {} lines, {} text labels, {} word arrays, {} strings",
            program.lines.len(),
            program.labels.text.len(),
            program.labels.words.len(),
            program.labels.strings.len()
        );

        Ok(program)
    }

    /// Handle a labelled directive in the data section
    fn define_data(&mut self, name: &str, directive: &str, line_number: usize) {
        if let Some(literal) = directive.strip_prefix(".asciiz") {
            match parse_string_literal(literal) {
                Ok(string) => {
                    self.labels.strings.insert(name.to_string(), string);
                }
                Err(e) => warn!("Line {}: bad .asciiz for {}: {}", line_number, name, e),
            }
        } else if let Some(size) = directive.strip_prefix(".space") {
            match size.trim().parse::<usize>() {
                Ok(bytes) if bytes <= MAX_SPACE_BYTES => {
                    let words = self.labels.words.entry(name.to_string()).or_default();
                    words.resize(words.len() + (bytes + 3) / 4, 0);
                }
                Ok(bytes) => warn!(
                    "Line {}: .space size {} for {} is over the {} byte limit",
                    line_number, bytes, name, MAX_SPACE_BYTES
                ),
                Err(_) => warn!(
                    "Line {}: bad .space size `{}` for {}",
                    line_number,
                    size.trim(),
                    name
                ),
            }
        } else if let Some(values) = directive.strip_prefix(".word") {
            let parsed = values
                .split(',')
                .map(|value| parse_immediate(value.trim()))
                .collect::<Option<Vec<_>>>();

            match parsed {
                Some(parsed) => self
                    .labels
                    .words
                    .entry(name.to_string())
                    .or_default()
                    .extend(parsed),
                None => warn!("Line {}: bad .word values for {}", line_number, name),
            }
        } else if !directive.is_empty() {
            warn!(
                "Line {}: unsupported data directive `{}`",
                line_number,
                directive
            );
        }
    }
}

/// Split `name: rest` into its parts
fn split_label(line: &str) -> Option<(&str, &str)> {
    let (name, rest) = line.split_once(':')?;
    let name = name.trim();

    if name.is_empty() || name.contains(char::is_whitespace) || name.contains('"') {
        return None;
    }

    Some((name, rest.trim()))
}

/// Remove a `#` comment, ignoring any `#` inside a string
fn strip_comment(line: &str) -> &str {
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in line.char_indices() {
        match c {
            '\\' if in_string => {
                escaped = !escaped;
                continue;
            }
            '"' if !escaped => in_string = !in_string,
            '#' if !in_string => return &line[..i],
            _ => {}
        }
        escaped = false;
    }

    line
}

/// Get the unescaped contents of a quoted string
fn parse_string_literal(literal: &str) -> Result<String, String> {
    let literal = literal.trim();
    let body = literal
        .strip_prefix('"')
        .ok_or_else(|| "expected a quoted string".to_string())?;

    let mut escaped = false;
    let end = body
        .char_indices()
        .find(|&(_, c)| {
            let is_end = c == '"' && !escaped;
            escaped = c == '\\' && !escaped;
            is_end
        })
        .map(|(i, _)| i)
        .ok_or_else(|| "unterminated string".to_string())?;

    unescape_str(&body[..end]).map_err(|e| e.to_string())
}
