//! Typed Commands
//!
//! [`Command`] is one request against the store. Commands can be built
//! directly or from an argument list such as `["SET", "name", "arun", "60"]`,
//! which is how a surrounding service would typically hand them over.

use crate::error::CommandError;

/// A single store operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `SET key value [ttlSeconds]`
    Set {
        key: String,
        value: String,
        ttl: Option<u64>,
    },
    /// `GET key`
    Get { key: String },
    /// `DEL key`
    Del { key: String },
    /// `EXISTS key`
    Exists { key: String },
    /// `TTL key`
    Ttl { key: String },
    /// `INCR key`
    Incr { key: String },
    /// `DECR key`
    Decr { key: String },
}

impl Command {
    /// Parses an argument list. The command name is case-insensitive.
    ///
    /// # Example
    ///
    /// ```
    /// use lazykv::commands::Command;
    ///
    /// let cmd = Command::from_args(["set", "session", "abc", "30"]).unwrap();
    /// assert_eq!(
    ///     cmd,
    ///     Command::Set {
    ///         key: "session".to_string(),
    ///         value: "abc".to_string(),
    ///         ttl: Some(30),
    ///     }
    /// );
    /// ```
    pub fn from_args<I, S>(args: I) -> Result<Self, CommandError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut args = args.into_iter().map(Into::<String>::into);
        let name = args.next().ok_or(CommandError::Empty)?.to_ascii_uppercase();
        let rest: Vec<String> = args.collect();

        match name.as_str() {
            "SET" => parse_set(rest),
            "GET" => single_key(rest, "GET").map(|key| Command::Get { key }),
            "DEL" => single_key(rest, "DEL").map(|key| Command::Del { key }),
            "EXISTS" => single_key(rest, "EXISTS").map(|key| Command::Exists { key }),
            "TTL" => single_key(rest, "TTL").map(|key| Command::Ttl { key }),
            "INCR" => single_key(rest, "INCR").map(|key| Command::Incr { key }),
            "DECR" => single_key(rest, "DECR").map(|key| Command::Decr { key }),
            _ => Err(CommandError::Unknown(name)),
        }
    }

    /// Returns the upper-case command name.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Set { .. } => "SET",
            Command::Get { .. } => "GET",
            Command::Del { .. } => "DEL",
            Command::Exists { .. } => "EXISTS",
            Command::Ttl { .. } => "TTL",
            Command::Incr { .. } => "INCR",
            Command::Decr { .. } => "DECR",
        }
    }

    /// Returns the key this command operates on.
    pub fn key(&self) -> &str {
        match self {
            Command::Set { key, .. }
            | Command::Get { key }
            | Command::Del { key }
            | Command::Exists { key }
            | Command::Ttl { key }
            | Command::Incr { key }
            | Command::Decr { key } => key,
        }
    }
}

fn single_key(args: Vec<String>, name: &'static str) -> Result<String, CommandError> {
    let [key]: [String; 1] = args
        .try_into()
        .map_err(|_| CommandError::WrongArity(name))?;
    Ok(key)
}

fn parse_set(args: Vec<String>) -> Result<Command, CommandError> {
    let mut args = args.into_iter();
    let (key, value) = match (args.next(), args.next()) {
        (Some(key), Some(value)) => (key, value),
        _ => return Err(CommandError::WrongArity("SET")),
    };

    let ttl = match args.next() {
        None => None,
        Some(raw) => Some(raw.parse::<u64>().map_err(|_| CommandError::InvalidTtl(raw))?),
    };

    if args.next().is_some() {
        return Err(CommandError::WrongArity("SET"));
    }

    Ok(Command::Set { key, value, ttl })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_key_commands() {
        assert_eq!(
            Command::from_args(["GET", "name"]),
            Ok(Command::Get {
                key: "name".to_string()
            })
        );
        assert_eq!(
            Command::from_args(["incr", "hits"]),
            Ok(Command::Incr {
                key: "hits".to_string()
            })
        );
        assert_eq!(Command::from_args(["Ttl", "k"]).unwrap().name(), "TTL");
    }

    #[test]
    fn test_parse_set() {
        assert_eq!(
            Command::from_args(["SET", "k", "v"]),
            Ok(Command::Set {
                key: "k".to_string(),
                value: "v".to_string(),
                ttl: None,
            })
        );
        assert_eq!(
            Command::from_args(["SET", "k", "v", "0"]).unwrap(),
            Command::Set {
                key: "k".to_string(),
                value: "v".to_string(),
                ttl: Some(0),
            }
        );
    }

    #[test]
    fn test_parse_errors() {
        let empty: [&str; 0] = [];
        assert_eq!(Command::from_args(empty), Err(CommandError::Empty));
        assert_eq!(
            Command::from_args(["FLY", "k"]),
            Err(CommandError::Unknown("FLY".to_string()))
        );
        assert_eq!(
            Command::from_args(["GET"]),
            Err(CommandError::WrongArity("GET"))
        );
        assert_eq!(
            Command::from_args(["DEL", "a", "b"]),
            Err(CommandError::WrongArity("DEL"))
        );
        assert_eq!(
            Command::from_args(["SET", "k"]),
            Err(CommandError::WrongArity("SET"))
        );
        assert_eq!(
            Command::from_args(["SET", "k", "v", "10", "extra"]),
            Err(CommandError::WrongArity("SET"))
        );
        assert_eq!(
            Command::from_args(["SET", "k", "v", "-5"]),
            Err(CommandError::InvalidTtl("-5".to_string()))
        );
    }

    #[test]
    fn test_key_accessor() {
        let cmd = Command::Set {
            key: "k".to_string(),
            value: "v".to_string(),
            ttl: Some(1),
        };
        assert_eq!(cmd.key(), "k");
        assert_eq!(cmd.name(), "SET");
    }
}
