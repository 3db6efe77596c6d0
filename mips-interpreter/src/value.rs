use std::fmt;
use std::fmt::{Display, Formatter};

/// The content of a single register
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    Integer(i32),
    /// Names a storage location instead of holding a number
    Reference(String),
}

impl Value {
    /// Get the integer, if this is not a reference
    pub fn as_integer(&self) -> Option<i32> {
        match self {
            Value::Integer(value) => Some(*value),
            Value::Reference(_) => None,
        }
    }

    /// Get the referenced label, if any
    pub fn as_reference(&self) -> Option<&str> {
        match self {
            Value::Integer(_) => None,
            Value::Reference(label) => Some(label),
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Integer(0)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(value)
    }
}

/// Shows the raw cell. Use `Labels::display` to resolve references.
impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(value) => write!(f, "{}", value),
            Value::Reference(label) => write!(f, "&{}", label),
        }
    }
}
