//! Cache Store Module
//!
//! Main cache engine: a lock-guarded HashMap shared with a background reaper.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;

use crate::cache::CacheEntry;
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};
use crate::tasks::spawn_reaper_task;

/// Key-value storage shared between the cache handle and its reaper.
pub(crate) type EntryMap = HashMap<String, CacheEntry>;

// == TTL Cache ==
/// Concurrent byte cache whose entries expire a fixed interval after insertion.
///
/// Construction spawns one reaper task on the current tokio runtime. The task
/// lives until [`TtlCache::stop`] is called or the cache is dropped.
#[derive(Debug)]
pub struct TtlCache {
    /// Key-value storage, shared with the reaper
    entries: Arc<RwLock<EntryMap>>,
    /// Reaping period and maximum entry age
    interval: Duration,
    /// Stop signal for the reaper
    shutdown: watch::Sender<bool>,
    /// Reaper task handle
    reaper: JoinHandle<()>,
}

impl TtlCache {
    // == Constructor ==
    /// Creates an empty cache and starts its reaper task.
    ///
    /// # Errors
    /// - `InvalidConfig` if `interval` is zero or too large to schedule
    /// - `RuntimeUnavailable` if called outside a tokio runtime
    pub fn new(interval: Duration) -> Result<Self> {
        if interval.is_zero() {
            return Err(CacheError::InvalidConfig(
                "interval must be a positive duration".to_string(),
            ));
        }
        if Instant::now().checked_add(interval).is_none() {
            return Err(CacheError::InvalidConfig(format!(
                "interval of {:?} is too large to schedule",
                interval
            )));
        }

        let runtime = Handle::try_current().map_err(|_| CacheError::RuntimeUnavailable)?;

        let entries = Arc::new(RwLock::new(EntryMap::new()));
        let (shutdown, shutdown_rx) = watch::channel(false);
        let reaper = spawn_reaper_task(&runtime, entries.clone(), interval, shutdown_rx);

        Ok(Self {
            entries,
            interval,
            shutdown,
            reaper,
        })
    }

    /// Creates a cache from a validated configuration.
    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        config.validate()?;
        Self::new(config.interval())
    }

    // == Set ==
    /// Inserts a new entry stamped with the current time.
    ///
    /// Never overwrites a live entry: if the key holds a non-empty value that
    /// has not expired, returns `AlreadyExists` and leaves it untouched.
    /// Callers wanting replacement must `delete` first.
    pub async fn set(&self, key: impl Into<String>, value: impl Into<Vec<u8>>) -> Result<()> {
        let key = key.into();
        let mut entries = self.entries.write().await;
        let now = Instant::now();

        if entries
            .get(&key)
            .is_some_and(|entry| entry.is_occupied_at(now, self.interval))
        {
            debug!(key = %key, "Set rejected, key already cached");
            return Err(CacheError::AlreadyExists(key));
        }

        entries.insert(key, CacheEntry::new(value.into()));
        Ok(())
    }

    // == Get ==
    /// Returns a copy of the cached value, or `None` if absent or expired.
    ///
    /// Reading never refreshes an entry's age.
    pub async fn get(&self, key: &str) -> Option<Vec<u8>> {
        let entries = self.entries.read().await;
        let now = Instant::now();

        entries
            .get(key)
            .filter(|entry| !entry.is_expired_at(now, self.interval))
            .map(|entry| entry.value.clone())
    }

    // == Delete ==
    /// Removes an entry by key. No-op if the key is absent.
    pub async fn delete(&self, key: &str) {
        self.entries.write().await.remove(key);
    }

    // == Read-through ==
    /// Returns the cached value for `key`, or awaits `fetch` on a miss and
    /// caches its result.
    ///
    /// The lock is not held while fetching, so concurrent callers may fetch the
    /// same key; the loser's insert is rejected and its freshly fetched bytes
    /// are returned as-is. Fetch errors are returned unchanged and nothing is
    /// cached.
    pub async fn get_or_fetch<F, Fut, E>(
        &self,
        key: &str,
        fetch: F,
    ) -> std::result::Result<Vec<u8>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<Vec<u8>, E>>,
    {
        if let Some(value) = self.get(key).await {
            return Ok(value);
        }

        debug!(key, "Cache miss, fetching");
        let value = fetch().await?;

        if let Err(err) = self.set(key, value.clone()).await {
            debug!(key, %err, "Fetched value not cached");
        }

        Ok(value)
    }

    // == Stop ==
    /// Asks the reaper task to exit. Entries are kept but no longer reaped;
    /// `get` still hides expired ones.
    pub fn stop(&self) {
        // Receiver only goes away once the task has already exited
        let _ = self.shutdown.send(true);
    }

    /// Returns true while the reaper task is alive.
    pub fn is_reaper_running(&self) -> bool {
        !self.reaper.is_finished()
    }

    // == Interval ==
    /// Returns the configured reaping interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    // == Length ==
    /// Returns the number of stored entries, including expired entries the
    /// reaper has not removed yet.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    // == Is Empty ==
    /// Returns true if nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl Drop for TtlCache {
    fn drop(&mut self) {
        self.reaper.abort();
    }
}

// == Remove Expired ==
/// Removes every entry at least `interval` old as of `now`.
///
/// Returns the number of entries removed.
pub(crate) fn remove_expired(entries: &mut EntryMap, now: Instant, interval: Duration) -> usize {
    let before = entries.len();
    entries.retain(|_, entry| !entry.is_expired_at(now, interval));
    before - entries.len()
}
