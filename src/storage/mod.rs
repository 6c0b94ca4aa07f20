//! Storage Module
//!
//! This module provides the core storage functionality for lazykv: a
//! thread-safe, sharded key-value store with per-key expiry, plus an optional
//! background sweeper.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     ExpiringStore                           │
//! │  ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐           │
//! │  │ Shard 0 │ │ Shard 1 │ │ Shard 2 │ │...N     │           │
//! │  │ RwLock  │ │ RwLock  │ │ RwLock  │ │ shards  │           │
//! │  └─────────┘ └─────────┘ └─────────┘ └─────────┘           │
//! └─────────────────────────────────────────────────────────────┘
//!                            ▲
//!                            │ (optional)
//!              ┌─────────────┴─────────────┐
//!              │     ExpirySweeper         │
//!              │  (Background Tokio Task)  │
//!              └───────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use lazykv::storage::ExpiringStore;
//! use std::time::Duration;
//!
//! let store = ExpiringStore::new();
//!
//! store.set("name", "Ariz");
//! assert_eq!(store.get("name"), Some("Ariz".to_string()));
//!
//! store.set_with_ttl("session", "token123", Duration::from_secs(3600));
//! assert!(store.exists("session"));
//! ```

pub mod engine;
pub mod expiry;

pub use engine::{ExpiringStore, StorageStats, Ttl};
pub use expiry::{start_expiry_sweeper, ExpiryConfig, ExpirySweeper};
