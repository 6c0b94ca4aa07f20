//! Thread-Safe Expiring Store
//!
//! This module implements the core of lazykv: a concurrent map from string
//! keys to string values, each with an optional expiry instant.
//!
//! ## Design Decisions
//!
//! 1. **Sharded Locks**: The key space is split across independently locked shards,
//!    so operations on keys in different shards never contend.
//! 2. **Per-Key Atomicity**: Every read-check-mutate sequence for a key runs under
//!    that key's shard lock, which makes each operation linearizable per key.
//! 3. **Lazy Expiry**: Expired entries are treated as absent and removed the next
//!    time any operation touches them. The background sweeper is optional.
//! 4. **Read Fast Path**: GET, EXISTS and TTL take a shared lock first and only
//!    upgrade to the exclusive lock when they find an expired entry to remove.
//!
//! ## Concurrency Model
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     ExpiringStore                           │
//! │  ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐           │
//! │  │ Shard 0 │ │ Shard 1 │ │ Shard 2 │ │ Shard N │           │
//! │  │ RwLock  │ │ RwLock  │ │ RwLock  │ │ RwLock  │           │
//! │  │ HashMap │ │ HashMap │ │ HashMap │ │ HashMap │           │
//! │  └─────────┘ └─────────┘ └─────────┘ └─────────┘           │
//! └─────────────────────────────────────────────────────────────┘
//! ```

use crate::config::StoreConfig;
use crate::error::StoreError;
use std::collections::HashMap;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// A stored value with optional expiry time.
#[derive(Debug, Clone)]
struct Entry {
    value: String,
    /// None = never expires
    expires_at: Option<Instant>,
}

impl Entry {
    fn persistent(value: String) -> Self {
        Self {
            value,
            expires_at: None,
        }
    }

    /// A TTL too large to represent as an instant never expires.
    fn expiring(value: String, ttl: Duration, now: Instant) -> Self {
        Self {
            value,
            expires_at: now.checked_add(ttl),
        }
    }

    #[inline]
    fn is_expired_at(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|exp| now >= exp)
    }

    fn ttl_at(&self, now: Instant) -> Ttl {
        match self.expires_at {
            None => Ttl::NoExpiry,
            Some(exp) => exp
                .checked_duration_since(now)
                .map(|remaining| Ttl::Seconds(remaining.as_secs()))
                .unwrap_or(Ttl::Absent),
        }
    }
}

/// Remaining time-to-live of a key, as reported by [`ExpiringStore::ttl`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ttl {
    /// The key does not exist or has expired
    Absent,
    /// The key exists and never expires
    NoExpiry,
    /// Whole seconds left before the key expires (rounded down)
    Seconds(u64),
}

impl Ttl {
    /// Returns the Redis-style integer: `-2`, `-1`, or the remaining seconds.
    pub fn as_i64(self) -> i64 {
        match self {
            Ttl::Absent => -2,
            Ttl::NoExpiry => -1,
            Ttl::Seconds(secs) => i64::try_from(secs).unwrap_or(i64::MAX),
        }
    }
}

/// A single shard containing a portion of the key space.
#[derive(Debug, Default)]
struct Shard {
    data: RwLock<HashMap<String, Entry>>,
}

impl Shard {
    // Entries are only written once all fallible work is done, so a map
    // behind a poisoned lock is still consistent.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Entry>> {
        self.data.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Entry>> {
        self.data.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Store statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageStats {
    /// Physical entry count, including expired entries not yet removed
    pub keys: u64,
    /// GET operations served
    pub get_ops: u64,
    /// SET operations, with or without TTL
    pub set_ops: u64,
    /// DEL operations, whether or not a key was removed
    pub del_ops: u64,
    /// INCR/DECR operations, including failed ones
    pub incr_ops: u64,
    /// Expired entries removed so far, lazily or by the sweeper
    pub expired: u64,
}

/// An in-process, thread-safe key-value store with per-key expiry.
///
/// The store is meant to be created once and shared as an `Arc<ExpiringStore>`
/// between every caller that needs it. All operations are synchronous and
/// bounded by one map operation plus a clock read.
///
/// # Memory
///
/// Expiry is enforced lazily. An expired key that is never touched again stays
/// in memory until [`cleanup_expired`](Self::cleanup_expired) runs, either by
/// hand or from an [`ExpirySweeper`](crate::storage::ExpirySweeper). Without a
/// sweeper, memory grows with the number of distinct keys ever written.
///
/// # Example
///
/// ```
/// use lazykv::storage::{ExpiringStore, Ttl};
/// use std::time::Duration;
///
/// let store = ExpiringStore::new();
///
/// store.set("name", "Ariz");
/// assert_eq!(store.get("name"), Some("Ariz".to_string()));
///
/// store.set_with_ttl("session", "abc123", Duration::from_secs(60));
/// assert!(matches!(store.ttl("session"), Ttl::Seconds(59..=60)));
///
/// assert_eq!(store.incr("hits"), Ok(1));
/// ```
pub struct ExpiringStore {
    shards: Box<[Shard]>,

    /// Statistics: physical number of entries (approximate)
    key_count: AtomicU64,

    get_count: AtomicU64,
    set_count: AtomicU64,
    del_count: AtomicU64,
    incr_count: AtomicU64,

    /// Statistics: number of expired entries cleaned up
    expired_count: AtomicU64,
}

impl std::fmt::Debug for ExpiringStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpiringStore")
            .field("shards", &self.shards.len())
            .field("key_count", &self.key_count.load(Ordering::Relaxed))
            .field("get_count", &self.get_count.load(Ordering::Relaxed))
            .field("set_count", &self.set_count.load(Ordering::Relaxed))
            .finish()
    }
}

impl Default for ExpiringStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpiringStore {
    /// Creates a store with the default shard count.
    pub fn new() -> Self {
        Self::with_config(&StoreConfig::default())
    }

    /// Creates a store laid out according to `config`.
    pub fn with_config(config: &StoreConfig) -> Self {
        let num_shards = config.num_shards.max(1);
        let shards = (0..num_shards).map(|_| Shard::default()).collect();

        debug!(shards = num_shards, "Expiring store created");

        Self {
            shards,
            key_count: AtomicU64::new(0),
            get_count: AtomicU64::new(0),
            set_count: AtomicU64::new(0),
            del_count: AtomicU64::new(0),
            incr_count: AtomicU64::new(0),
            expired_count: AtomicU64::new(0),
        }
    }

    /// Returns the number of shards.
    pub fn num_shards(&self) -> usize {
        self.shards.len()
    }

    #[inline]
    fn shard(&self, key: &str) -> &Shard {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        &self.shards[(hasher.finish() as usize) % self.shards.len()]
    }

    fn note_expired(&self, key: &str) {
        self.key_count.fetch_sub(1, Ordering::Relaxed);
        self.expired_count.fetch_add(1, Ordering::Relaxed);
        trace!(key, "Removed expired key on access");
    }

    /// Sets a key-value pair without expiry.
    ///
    /// Any previous entry is replaced wholesale, including its TTL.
    ///
    /// # Returns
    ///
    /// Returns `true` if no live entry existed for the key.
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) -> bool {
        self.set_count.fetch_add(1, Ordering::Relaxed);
        self.install(key.into(), Entry::persistent(value.into()))
    }

    /// Sets a key-value pair that expires after `ttl`.
    ///
    /// A zero TTL makes the entry absent to every later observer.
    ///
    /// # Returns
    ///
    /// Returns `true` if no live entry existed for the key.
    pub fn set_with_ttl(&self, key: impl Into<String>, value: impl Into<String>, ttl: Duration) -> bool {
        self.set_count.fetch_add(1, Ordering::Relaxed);
        let entry = Entry::expiring(value.into(), ttl, Instant::now());
        self.install(key.into(), entry)
    }

    fn install(&self, key: String, entry: Entry) -> bool {
        let mut data = self.shard(&key).write();
        let now = Instant::now();

        match data.insert(key, entry) {
            None => {
                self.key_count.fetch_add(1, Ordering::Relaxed);
                true
            }
            Some(previous) => {
                let was_expired = previous.is_expired_at(now);
                if was_expired {
                    self.expired_count.fetch_add(1, Ordering::Relaxed);
                }
                was_expired
            }
        }
    }

    /// Runs `f` against the live entry for `key`.
    ///
    /// Returns `None` if the key is absent or expired; an expired entry is
    /// removed before returning.
    fn inspect<R>(&self, key: &str, f: impl FnOnce(&Entry, Instant) -> R) -> Option<R> {
        let shard = self.shard(key);

        {
            let data = shard.read();
            let now = Instant::now();
            match data.get(key) {
                None => return None,
                Some(entry) if !entry.is_expired_at(now) => return Some(f(entry, now)),
                Some(_) => {}
            }
        }

        // Another writer may have replaced the entry between the two locks.
        let mut data = shard.write();
        let now = Instant::now();
        match data.get(key) {
            None => None,
            Some(entry) if !entry.is_expired_at(now) => Some(f(entry, now)),
            Some(_) => {
                data.remove(key);
                self.note_expired(key);
                None
            }
        }
    }

    /// Gets the value for a key.
    ///
    /// Returns `None` if the key doesn't exist or has expired.
    pub fn get(&self, key: &str) -> Option<String> {
        self.get_count.fetch_add(1, Ordering::Relaxed);
        self.inspect(key, |entry, _| entry.value.clone())
    }

    /// Checks if a key exists and has not expired.
    pub fn exists(&self, key: &str) -> bool {
        self.inspect(key, |_, _| ()).is_some()
    }

    /// Gets the remaining TTL for a key, rounded down to whole seconds.
    pub fn ttl(&self, key: &str) -> Ttl {
        self.inspect(key, |entry, now| entry.ttl_at(now))
            .unwrap_or(Ttl::Absent)
    }

    /// Deletes a key from the store.
    ///
    /// # Returns
    ///
    /// Returns `true` only if the removed entry was still live. Removing an
    /// expired entry reports `false`.
    pub fn delete(&self, key: &str) -> bool {
        self.del_count.fetch_add(1, Ordering::Relaxed);

        let mut data = self.shard(key).write();
        let now = Instant::now();

        match data.remove(key) {
            None => false,
            Some(entry) if entry.is_expired_at(now) => {
                self.note_expired(key);
                false
            }
            Some(_) => {
                self.key_count.fetch_sub(1, Ordering::Relaxed);
                true
            }
        }
    }

    /// Increments an integer value by 1.
    ///
    /// If the key doesn't exist or has expired, it is created as `1` with no expiry.
    pub fn incr(&self, key: &str) -> Result<i64, StoreError> {
        self.incr_by(key, 1)
    }

    /// Decrements an integer value by 1.
    ///
    /// If the key doesn't exist or has expired, it is created as `-1` with no expiry.
    pub fn decr(&self, key: &str) -> Result<i64, StoreError> {
        self.decr_by(key, 1)
    }

    /// Adds `delta` to an integer value.
    ///
    /// A live entry keeps its expiry; only its value changes. An absent or
    /// expired key starts a fresh persistent counter holding `delta`.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotAnInteger`] if the current value is not a base-10
    /// integer, [`StoreError::Overflow`] if the result leaves the `i64` range.
    /// The entry is left untouched in both cases.
    pub fn incr_by(&self, key: &str, delta: i64) -> Result<i64, StoreError> {
        self.adjust(key, |current| current.checked_add(delta))
    }

    /// Subtracts `delta` from an integer value.
    ///
    /// Same semantics as [`incr_by`](Self::incr_by); an absent or expired key
    /// starts a fresh counter holding `-delta`.
    pub fn decr_by(&self, key: &str, delta: i64) -> Result<i64, StoreError> {
        self.adjust(key, |current| current.checked_sub(delta))
    }

    /// Read-modify-write of a counter under the key's shard lock.
    ///
    /// An absent or expired key is treated as `0`. `apply` returns `None`
    /// when the result does not fit in an `i64`.
    fn adjust(&self, key: &str, apply: impl FnOnce(i64) -> Option<i64>) -> Result<i64, StoreError> {
        self.incr_count.fetch_add(1, Ordering::Relaxed);

        let mut data = self.shard(key).write();
        let now = Instant::now();

        if let Some(entry) = data.get_mut(key) {
            if !entry.is_expired_at(now) {
                let current = entry
                    .value
                    .parse::<i64>()
                    .map_err(|_| StoreError::NotAnInteger)?;
                let updated = apply(current).ok_or(StoreError::Overflow)?;
                entry.value = updated.to_string();
                return Ok(updated);
            }
        }

        let fresh = apply(0).ok_or(StoreError::Overflow)?;
        match data.insert(key.to_string(), Entry::persistent(fresh.to_string())) {
            None => {
                self.key_count.fetch_add(1, Ordering::Relaxed);
            }
            Some(_) => {
                self.expired_count.fetch_add(1, Ordering::Relaxed);
                trace!(key, "Replaced expired key with a fresh counter");
            }
        }

        Ok(fresh)
    }

    /// Clears all data from the store.
    pub fn flush(&self) {
        for shard in self.shards.iter() {
            let mut data = shard.write();
            let removed = data.len() as u64;
            data.clear();
            self.key_count.fetch_sub(removed, Ordering::Relaxed);
        }
    }

    /// Returns the approximate number of entries in the store.
    ///
    /// Expired entries that have not been removed yet are counted.
    pub fn len(&self) -> u64 {
        self.key_count.load(Ordering::Relaxed)
    }

    /// Returns true if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns store statistics.
    pub fn stats(&self) -> StorageStats {
        StorageStats {
            keys: self.key_count.load(Ordering::Relaxed),
            get_ops: self.get_count.load(Ordering::Relaxed),
            set_ops: self.set_count.load(Ordering::Relaxed),
            del_ops: self.del_count.load(Ordering::Relaxed),
            incr_ops: self.incr_count.load(Ordering::Relaxed),
            expired: self.expired_count.load(Ordering::Relaxed),
        }
    }

    /// Removes expired entries from all shards.
    ///
    /// Each shard is locked on its own, so callers only ever wait for one
    /// shard's pass.
    ///
    /// # Returns
    ///
    /// Returns the number of entries that were removed.
    pub fn cleanup_expired(&self) -> u64 {
        let mut cleaned = 0u64;

        for shard in self.shards.iter() {
            let mut data = shard.write();
            let now = Instant::now();
            let before = data.len();

            data.retain(|_, entry| !entry.is_expired_at(now));

            cleaned += (before - data.len()) as u64;
        }

        if cleaned > 0 {
            self.key_count.fetch_sub(cleaned, Ordering::Relaxed);
            self.expired_count.fetch_add(cleaned, Ordering::Relaxed);
        }

        cleaned
    }
}
