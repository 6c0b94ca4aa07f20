//! Command Handler
//!
//! Executes [`Command`]s against a shared [`ExpiringStore`] and turns the
//! typed results into [`Reply`] tokens.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     CommandHandler                          │
//! │                                                             │
//! │  ┌──────────────┐    ┌─────────────┐    ┌─────────────┐     │
//! │  │ from_args()  │───>│  execute()  │───>│   Reply     │     │
//! │  └──────────────┘    └──────┬──────┘    └─────────────┘     │
//! │                             │                               │
//! │                             ▼                               │
//! │                      ExpiringStore                          │
//! └─────────────────────────────────────────────────────────────┘
//! ```

use crate::commands::{Command, Reply};
use crate::error::StoreError;
use crate::storage::ExpiringStore;
use std::sync::Arc;
use std::time::Duration;
use tracing::trace;

/// Dispatches commands to the store.
///
/// Cloning a handler is cheap; every clone shares the same store.
#[derive(Debug, Clone)]
pub struct CommandHandler {
    store: Arc<ExpiringStore>,
}

impl CommandHandler {
    /// Creates a new command handler for the given store.
    pub fn new(store: Arc<ExpiringStore>) -> Self {
        Self { store }
    }

    /// Returns the store this handler executes against.
    pub fn store(&self) -> &Arc<ExpiringStore> {
        &self.store
    }

    /// Parses an argument list and executes it.
    ///
    /// Parse failures are reported as error replies, like store failures.
    ///
    /// # Example
    ///
    /// ```
    /// use lazykv::commands::{CommandHandler, Reply};
    /// use lazykv::storage::ExpiringStore;
    /// use std::sync::Arc;
    ///
    /// let handler = CommandHandler::new(Arc::new(ExpiringStore::new()));
    /// assert_eq!(handler.execute_args(["SET", "name", "arun"]), Reply::Ok);
    /// assert_eq!(handler.execute_args(["GET", "name"]).to_string(), "arun");
    /// ```
    pub fn execute_args<I, S>(&self, args: I) -> Reply
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        match Command::from_args(args) {
            Ok(command) => self.execute(command),
            Err(e) => Reply::error(format!("ERR {}", e)),
        }
    }

    /// Executes a command and returns the reply.
    pub fn execute(&self, command: Command) -> Reply {
        trace!(command = command.name(), key = command.key(), "Executing command");

        match command {
            Command::Set { key, value, ttl: None } => {
                self.store.set(key, value);
                Reply::Ok
            }
            Command::Set {
                key,
                value,
                ttl: Some(secs),
            } => {
                self.store.set_with_ttl(key, value, Duration::from_secs(secs));
                Reply::Ok
            }
            Command::Get { key } => self.store.get(&key).into(),
            Command::Del { key } => Reply::flag(self.store.delete(&key)),
            Command::Exists { key } => Reply::flag(self.store.exists(&key)),
            Command::Ttl { key } => Reply::Integer(self.store.ttl(&key).as_i64()),
            Command::Incr { key } => counter_reply(self.store.incr(&key)),
            Command::Decr { key } => counter_reply(self.store.decr(&key)),
        }
    }
}

fn counter_reply(result: Result<i64, StoreError>) -> Reply {
    match result {
        Ok(n) => Reply::Integer(n),
        Err(e) => Reply::error(format!("ERR {}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_handler() -> CommandHandler {
        CommandHandler::new(Arc::new(ExpiringStore::new()))
    }

    fn run(handler: &CommandHandler, args: &[&str]) -> String {
        handler.execute_args(args.iter().copied()).to_string()
    }

    #[test]
    fn test_set_get_del_session() {
        let handler = create_handler();

        assert_eq!(run(&handler, &["SET", "name", "arun"]), "OK");
        assert_eq!(run(&handler, &["GET", "name"]), "arun");
        assert_eq!(run(&handler, &["DEL", "name"]), "1");
        assert_eq!(run(&handler, &["GET", "name"]), "(nil)");
        assert_eq!(run(&handler, &["DEL", "name"]), "0");
    }

    #[test]
    fn test_absent_key_tokens() {
        let handler = create_handler();

        assert_eq!(run(&handler, &["GET", "k"]), "(nil)");
        assert_eq!(run(&handler, &["EXISTS", "k"]), "0");
        assert_eq!(run(&handler, &["TTL", "k"]), "-2");
        assert_eq!(run(&handler, &["DEL", "k"]), "0");
    }

    #[test]
    fn test_ttl_tokens() {
        let handler = create_handler();

        run(&handler, &["SET", "plain", "v"]);
        assert_eq!(run(&handler, &["TTL", "plain"]), "-1");

        run(&handler, &["SET", "timed", "v", "30"]);
        let ttl: i64 = run(&handler, &["TTL", "timed"]).parse().unwrap();
        assert!(ttl == 30 || ttl == 29);

        run(&handler, &["SET", "gone", "v", "0"]);
        assert_eq!(run(&handler, &["EXISTS", "gone"]), "0");
        assert_eq!(run(&handler, &["TTL", "gone"]), "-2");
    }

    #[test]
    fn test_set_without_ttl_clears_expiry() {
        let handler = create_handler();

        run(&handler, &["SET", "k", "v1", "5"]);
        run(&handler, &["SET", "k", "v2"]);

        assert_eq!(run(&handler, &["TTL", "k"]), "-1");
        assert_eq!(run(&handler, &["GET", "k"]), "v2");
    }

    #[test]
    fn test_counter_tokens() {
        let handler = create_handler();

        run(&handler, &["SET", "counter", "10"]);
        assert_eq!(run(&handler, &["INCR", "counter"]), "11");
        assert_eq!(run(&handler, &["INCR", "counter"]), "12");
        assert_eq!(run(&handler, &["DECR", "counter"]), "11");
        assert_eq!(run(&handler, &["GET", "counter"]), "11");

        assert_eq!(run(&handler, &["INCR", "c2"]), "1");
        assert_eq!(run(&handler, &["INCR", "c2"]), "2");
        assert_eq!(run(&handler, &["DECR", "c3"]), "-1");
    }

    #[test]
    fn test_incr_not_an_integer() {
        let handler = create_handler();

        run(&handler, &["SET", "bad", "notanumber"]);
        let reply = handler.execute_args(["INCR", "bad"]);
        assert_eq!(
            reply,
            Reply::error("ERR value is not an integer or out of range")
        );
        assert_eq!(run(&handler, &["GET", "bad"]), "notanumber");
    }

    #[test]
    fn test_typed_execute() {
        let handler = create_handler();

        let reply = handler.execute(Command::Set {
            key: "k".to_string(),
            value: "v".to_string(),
            ttl: Some(60),
        });
        assert_eq!(reply, Reply::Ok);
        assert_eq!(
            handler.execute(Command::Exists {
                key: "k".to_string()
            }),
            Reply::Integer(1)
        );
        assert!(handler.store().exists("k"));
    }

    #[test]
    fn test_parse_errors_become_replies() {
        let handler = create_handler();

        let reply = handler.execute_args(["NOPE"]);
        assert_eq!(reply, Reply::error("ERR unknown command 'NOPE'"));

        let reply = handler.execute_args(["GET"]);
        assert!(reply.is_error());

        let reply = handler.execute_args(["SET", "k", "v", "soon"]);
        assert_eq!(reply, Reply::error("ERR invalid expire time 'soon'"));
    }

    #[test]
    fn test_handlers_share_store() {
        let handler = create_handler();
        let other = handler.clone();

        run(&handler, &["SET", "shared", "yes"]);
        assert_eq!(run(&other, &["GET", "shared"]), "yes");
    }
}
