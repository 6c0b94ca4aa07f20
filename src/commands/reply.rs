//! Reply Values
//!
//! A [`Reply`] is what a [`CommandHandler`](super::CommandHandler) hands back
//! for every command. Its `Display` form is the token a surrounding service
//! is expected to relay to its clients:
//!
//! | Reply            | Rendered as            |
//! |------------------|------------------------|
//! | `Ok`             | `OK`                   |
//! | `Nil`            | `(nil)`                |
//! | `Integer(n)`     | `n`                    |
//! | `Value(s)`       | `s`                    |
//! | `Error(msg)`     | `(error) msg`          |

use std::fmt;

/// The nil-sentinel token
pub const NIL: &str = "(nil)";

/// The result of executing one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Status confirmation for SET
    Ok,

    /// No value: the key is absent or expired
    Nil,

    /// Counts, flags, TTLs and counter values
    Integer(i64),

    /// A stored value, returned verbatim
    Value(String),

    /// The command failed; the message starts with an error code such as `ERR`
    Error(String),
}

impl Reply {
    /// Creates a stored-value reply.
    pub fn value(s: impl Into<String>) -> Self {
        Reply::Value(s.into())
    }

    /// Creates an error reply.
    ///
    /// # Example
    /// ```
    /// use lazykv::commands::Reply;
    /// let err = Reply::error("ERR unknown command 'FOO'");
    /// assert!(err.is_error());
    /// ```
    pub fn error(s: impl Into<String>) -> Self {
        Reply::Error(s.into())
    }

    /// Encodes a flag as `1` or `0`.
    pub fn flag(set: bool) -> Self {
        Reply::Integer(i64::from(set))
    }

    /// Returns true if this reply is the nil-sentinel.
    pub fn is_nil(&self) -> bool {
        matches!(self, Reply::Nil)
    }

    /// Returns true if this reply is an error.
    pub fn is_error(&self) -> bool {
        matches!(self, Reply::Error(_))
    }

    /// Returns the stored value, if this is a value reply.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Reply::Value(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer, if this is an integer reply.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Reply::Integer(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<Option<String>> for Reply {
    fn from(value: Option<String>) -> Self {
        value.map(Reply::Value).unwrap_or(Reply::Nil)
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Ok => f.write_str("OK"),
            Reply::Nil => f.write_str(NIL),
            Reply::Integer(n) => write!(f, "{}", n),
            Reply::Value(s) => f.write_str(s),
            Reply::Error(msg) => write!(f, "(error) {}", msg),
        }
    }
}
