//! Command Layer
//!
//! In-process call surface that maps each store operation to its reply token.
//! A surrounding service can relay these tokens over whatever transport it
//! speaks; no wire format is defined here.
//!
//! | Operation | Arguments                 | Reply                                  |
//! |-----------|---------------------------|----------------------------------------|
//! | `SET`     | key value [ttlSeconds]    | `OK`                                   |
//! | `GET`     | key                       | value or `(nil)`                       |
//! | `DEL`     | key                       | `1` if a live entry was removed, `0`   |
//! | `EXISTS`  | key                       | `1` or `0`                             |
//! | `TTL`     | key                       | seconds, `-1` no expiry, `-2` absent   |
//! | `INCR`    | key                       | new value or error                     |
//! | `DECR`    | key                       | new value or error                     |

pub mod command;
pub mod handler;
pub mod reply;

pub use command::Command;
pub use handler::CommandHandler;
pub use reply::Reply;
