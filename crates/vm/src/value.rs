//! Values held in local variable slots and on the operand stack.

use std::fmt;

/// A single-slot JVM value.
///
/// No heap exists yet, so the only reference is `null`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Value {
    Int(i32),
    #[default]
    Null,
}

impl Value {
    /// The integer payload, or `None` for a reference.
    pub fn as_int(self) -> Option<i32> {
        match self {
            Value::Int(v) => Some(v),
            Value::Null => None,
        }
    }

    pub fn is_null(self) -> bool {
        matches!(self, Value::Null)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Null => f.write_str("null"),
        }
    }
}
