use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum UnescapeError {
    #[error("trailing backslash")]
    TrailingBackslash,
    #[error("unknown escape `\\{0}`")]
    UnknownEscape(char),
}

/// Convert the escape sequences of an `.asciiz` literal into their raw values.
pub fn unescape_str(s: &str) -> Result<String, UnescapeError> {
    let mut chars = s.chars();
    let mut result = String::with_capacity(s.len());

    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }

        match chars.next() {
            Some('n') => result.push('\n'),
            Some('r') => result.push('\r'),
            Some('t') => result.push('\t'),
            Some('0') => result.push('\0'),
            Some('\\') => result.push('\\'),
            Some('\'') => result.push('\''),
            Some('\"') => result.push('\"'),
            Some(c) => return Err(UnescapeError::UnknownEscape(c)),
            None => return Err(UnescapeError::TrailingBackslash),
        }
    }

    Ok(result)
}
