//! Error Types
//!
//! Every fallible path in lazykv reports one of the enums below. The store
//! itself only fails on counter arithmetic; everything else is total.

use thiserror::Error;

/// Errors returned by [`ExpiringStore`](crate::storage::ExpiringStore) operations.
///
/// A failed operation never leaves a partial mutation behind: the entry for
/// the key is exactly what it was before the call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The stored value does not parse as a base-10 signed 64-bit integer.
    #[error("value is not an integer or out of range")]
    NotAnInteger,

    /// The adjusted counter would fall outside the signed 64-bit range.
    #[error("increment or decrement would overflow")]
    Overflow,
}

/// Errors raised while turning an argument list into a [`Command`](crate::commands::Command).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// No command name was given
    #[error("empty command")]
    Empty,

    /// The command name is not one the store understands
    #[error("unknown command '{0}'")]
    Unknown(String),

    /// The command was given the wrong number of arguments
    #[error("wrong number of arguments for '{0}' command")]
    WrongArity(&'static str),

    /// The TTL argument of SET is not a non-negative integer
    #[error("invalid expire time '{0}'")]
    InvalidTtl(String),
}

/// Errors raised while loading a [`StoreConfig`](crate::config::StoreConfig).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable holds a value that cannot be parsed
    #[error("invalid value '{value}' for {var}")]
    InvalidValue {
        /// Name of the offending variable
        var: &'static str,
        /// The raw value that failed to parse
        value: String,
    },
}
