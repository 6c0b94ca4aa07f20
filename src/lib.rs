//! # lazykv - An In-Process Expiring Key-Value Store
//!
//! lazykv is a thread-safe, in-memory key-value store meant to sit in front of
//! a slower backing system as a fast-path cache. It supports SET (with an
//! optional time-to-live), GET, DEL, EXISTS, TTL inspection and atomic
//! INCR/DECR.
//!
//! ## Features
//!
//! - **Per-Key Atomicity**: Every operation is linearizable per key; concurrent
//!   INCRs never lose an update
//! - **Sharded Storage**: Independent RwLock shards keep unrelated keys apart
//! - **Lazy Expiry**: Expired keys are hidden and removed on their next access
//! - **Optional Sweeper**: A background Tokio task can reclaim expired keys that
//!   are never read again
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                               lazykv                                    │
//! │                                                                         │
//! │  ┌─────────────┐    ┌─────────────┐                                     │
//! │  │  Command    │───>│  Command    │──────────────┐                      │
//! │  │ (from_args) │    │  Handler    │              │                      │
//! │  └─────────────┘    └─────────────┘              ▼                      │
//! │                     ┌──────────────────────────────────────────────┐   │
//! │                     │              ExpiringStore                   │   │
//! │                     │  ┌────────┐ ┌────────┐ ┌────────┐ ┌────────┐ │   │
//! │                     │  │Shard 0 │ │Shard 1 │ │Shard 2 │ │...N    │ │   │
//! │                     │  │RwLock  │ │RwLock  │ │RwLock  │ │shards  │ │   │
//! │                     │  └────────┘ └────────┘ └────────┘ └────────┘ │   │
//! │                     └──────────────────────────────────────────────┘   │
//! │                                               ▲                         │
//! │                     ┌─────────────────────────┴───────────────────────┐ │
//! │                     │       ExpirySweeper (optional Tokio task)       │ │
//! │                     └─────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use lazykv::{CommandHandler, ExpiringStore, Reply};
//! use std::sync::Arc;
//!
//! let store = Arc::new(ExpiringStore::new());
//!
//! // Typed API
//! store.set("name", "arun");
//! assert_eq!(store.get("name"), Some("arun".to_string()));
//!
//! // Token API
//! let handler = CommandHandler::new(Arc::clone(&store));
//! assert_eq!(handler.execute_args(["DEL", "name"]), Reply::Integer(1));
//! assert_eq!(handler.execute_args(["GET", "name"]).to_string(), "(nil)");
//! ```
//!
//! ## Module Overview
//!
//! - [`storage`]: The expiring store and the background sweeper
//! - [`commands`]: Typed commands, the command handler and reply tokens
//! - [`config`]: Store configuration, from code or the environment
//! - [`error`]: Error types

pub mod commands;
pub mod config;
pub mod error;
pub mod storage;

// Re-export commonly used types for convenience
pub use commands::{Command, CommandHandler, Reply};
pub use config::StoreConfig;
pub use error::{CommandError, ConfigError, StoreError};
pub use storage::{start_expiry_sweeper, ExpiryConfig, ExpiringStore, ExpirySweeper, Ttl};

/// Version of lazykv
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
