//! Store Configuration
//!
//! [`StoreConfig`] controls how an [`ExpiringStore`](crate::storage::ExpiringStore)
//! is laid out and whether a background sweeper should accompany it.
//!
//! Values can be set in code with the builder methods or loaded from the
//! environment:
//!
//! | Variable                    | Meaning                               | Default |
//! |-----------------------------|---------------------------------------|---------|
//! | `LAZYKV_SHARDS`             | Number of independently locked shards | 64      |
//! | `LAZYKV_ACTIVE_EXPIRY`      | Run the background sweeper            | true    |
//! | `LAZYKV_SWEEP_INTERVAL_MS`  | Base interval between sweeps          | 100     |

use crate::error::ConfigError;
use crate::storage::ExpiryConfig;
use std::time::Duration;

/// Default number of shards.
/// More shards = less lock contention, but more memory overhead.
pub const DEFAULT_NUM_SHARDS: usize = 64;

const ENV_SHARDS: &str = "LAZYKV_SHARDS";
const ENV_ACTIVE_EXPIRY: &str = "LAZYKV_ACTIVE_EXPIRY";
const ENV_SWEEP_INTERVAL_MS: &str = "LAZYKV_SWEEP_INTERVAL_MS";

/// Configuration for an expiring store.
///
/// # Example
///
/// ```
/// use lazykv::StoreConfig;
/// use std::time::Duration;
///
/// let config = StoreConfig::default()
///     .with_num_shards(16)
///     .with_sweep_interval(Duration::from_millis(250));
/// assert_eq!(config.num_shards, 16);
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Number of shards the key space is split into (always at least 1)
    pub num_shards: usize,

    /// Whether callers should start the background expiry sweeper
    pub active_expiry: bool,

    /// Settings for the background expiry sweeper
    pub expiry: ExpiryConfig,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            num_shards: DEFAULT_NUM_SHARDS,
            active_expiry: true,
            expiry: ExpiryConfig::default(),
        }
    }
}

impl StoreConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the shard count. Zero is raised to one.
    pub fn with_num_shards(mut self, num_shards: usize) -> Self {
        self.num_shards = num_shards.max(1);
        self
    }

    /// Enables or disables the background sweeper.
    pub fn with_active_expiry(mut self, enabled: bool) -> Self {
        self.active_expiry = enabled;
        self
    }

    /// Sets the base interval between sweeps.
    ///
    /// The adaptive bounds are widened if needed so that
    /// `min_interval <= base_interval <= max_interval` keeps holding.
    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.expiry.base_interval = interval;
        self.expiry.min_interval = self.expiry.min_interval.min(interval);
        self.expiry.max_interval = self.expiry.max_interval.max(interval);
        self
    }

    /// Loads a configuration from the process environment.
    ///
    /// Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Builds a configuration from an arbitrary variable lookup.
    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_SHARDS) {
            let shards = raw.trim().parse::<usize>().map_err(|_| invalid(ENV_SHARDS, &raw))?;
            config = config.with_num_shards(shards);
        }

        if let Some(raw) = lookup(ENV_ACTIVE_EXPIRY) {
            let enabled = match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => return Err(invalid(ENV_ACTIVE_EXPIRY, &raw)),
            };
            config = config.with_active_expiry(enabled);
        }

        if let Some(raw) = lookup(ENV_SWEEP_INTERVAL_MS) {
            let ms = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|ms| *ms > 0)
                .ok_or_else(|| invalid(ENV_SWEEP_INTERVAL_MS, &raw))?;
            config = config.with_sweep_interval(Duration::from_millis(ms));
        }

        Ok(config)
    }
}

fn invalid(var: &'static str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        var,
        value: value.to_string(),
    }
}
