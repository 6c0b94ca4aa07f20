//! Background Expiry Sweeper
//!
//! Lazy expiry (checking on access) keeps every operation cheap, but a key
//! that expires and is never touched again would stay in memory forever.
//! The sweeper is an optional tokio task that periodically calls
//! [`ExpiringStore::cleanup_expired`] to reclaim that memory.
//!
//! It only removes entries that every operation already treats as absent, so
//! running it or not never changes what callers observe.
//!
//! ## Adaptive Frequency
//!
//! If a large share of keys expired during a pass, the next pass comes sooner.
//! If a pass found nothing, the sweeper backs off to save CPU.

use crate::config::StoreConfig;
use crate::storage::ExpiringStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, trace};

/// Shortest wait the sweeper ever takes between passes, whatever the config says.
pub const MIN_SWEEP_INTERVAL: Duration = Duration::from_millis(1);

/// Configuration for the expiry sweeper.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpiryConfig {
    /// Interval before the first sweep (default: 100ms)
    pub base_interval: Duration,

    /// Minimum interval between sweeps (default: 10ms)
    pub min_interval: Duration,

    /// Maximum interval between sweeps (default: 1s)
    pub max_interval: Duration,

    /// If more than this fraction of keys expired in a pass, speed up
    pub speedup_threshold: f64,

    /// If less than this fraction expired and nothing was removed, slow down
    pub slowdown_threshold: f64,
}

impl Default for ExpiryConfig {
    fn default() -> Self {
        Self {
            base_interval: Duration::from_millis(100),
            min_interval: Duration::from_millis(10),
            max_interval: Duration::from_secs(1),
            speedup_threshold: 0.25,
            slowdown_threshold: 0.01,
        }
    }
}

impl ExpiryConfig {
    /// Computes the wait before the next pass from the outcome of the last one.
    ///
    /// `keys_before` is the entry count when the pass started and `expired`
    /// is how many entries it removed. The result is never below
    /// [`MIN_SWEEP_INTERVAL`].
    pub fn next_interval(&self, current: Duration, keys_before: u64, expired: u64) -> Duration {
        let next = if keys_before == 0 {
            current
        } else {
            let expiry_rate = expired as f64 / keys_before as f64;

            if expiry_rate > self.speedup_threshold {
                (current / 2).max(self.min_interval)
            } else if expired == 0 && expiry_rate < self.slowdown_threshold {
                (current * 2).min(self.max_interval)
            } else {
                current
            }
        };

        next.max(MIN_SWEEP_INTERVAL)
    }
}

/// A handle to the running expiry sweeper.
///
/// When this handle is dropped, the sweeper task will be stopped.
#[derive(Debug)]
pub struct ExpirySweeper {
    shutdown_tx: watch::Sender<bool>,
}

impl ExpirySweeper {
    /// Starts the expiry sweeper as a background task.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Example
    ///
    /// ```ignore
    /// use lazykv::storage::{ExpiringStore, ExpirySweeper, ExpiryConfig};
    /// use std::sync::Arc;
    ///
    /// let store = Arc::new(ExpiringStore::new());
    /// let sweeper = ExpirySweeper::start(Arc::clone(&store), ExpiryConfig::default());
    ///
    /// // Dropping the handle stops the sweeper
    /// drop(sweeper);
    /// ```
    pub fn start(store: Arc<ExpiringStore>, config: ExpiryConfig) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        info!(
            base_interval_ms = config.base_interval.as_millis(),
            "Background expiry sweeper started"
        );

        tokio::spawn(sweeper_loop(store, config, shutdown_rx));

        Self { shutdown_tx }
    }

    /// Starts a sweeper if `config` enables active expiry.
    pub fn start_if_enabled(store: Arc<ExpiringStore>, config: &StoreConfig) -> Option<Self> {
        if config.active_expiry {
            Some(Self::start(store, config.expiry.clone()))
        } else {
            debug!("Active expiry disabled, relying on lazy expiry only");
            None
        }
    }

    /// Stops the expiry sweeper.
    ///
    /// This is called automatically when the handle is dropped.
    pub fn stop(&self) {
        if self.shutdown_tx.send_replace(true) {
            return;
        }
        info!("Background expiry sweeper stopped");
    }
}

impl Drop for ExpirySweeper {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn sweeper_loop(
    store: Arc<ExpiringStore>,
    config: ExpiryConfig,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let mut current_interval = config.base_interval.max(MIN_SWEEP_INTERVAL);

    loop {
        tokio::select! {
            _ = tokio::time::sleep(current_interval) => {}
            result = shutdown_rx.changed() => {
                if result.is_err() || *shutdown_rx.borrow() {
                    debug!("Expiry sweeper received shutdown signal");
                    return;
                }
            }
        }

        let keys_before = store.len();
        let expired = store.cleanup_expired();

        let next = config.next_interval(current_interval, keys_before, expired);
        if next < current_interval {
            debug!(
                expired,
                keys_before,
                new_interval_ms = next.as_millis(),
                "High expiry rate, speeding up sweeper"
            );
        } else if next > current_interval {
            trace!(
                new_interval_ms = next.as_millis(),
                "Low expiry rate, slowing down sweeper"
            );
        }
        current_interval = next;

        if expired > 0 {
            debug!(
                expired,
                keys_remaining = store.len(),
                "Expired keys cleaned up"
            );
        }
    }
}

/// Starts the expiry sweeper with default configuration.
pub fn start_expiry_sweeper(store: Arc<ExpiringStore>) -> ExpirySweeper {
    ExpirySweeper::start(store, ExpiryConfig::default())
}
