//! Configuration Module
//!
//! Cache settings, deserializable so an owning application can embed them in
//! its own configuration file.

use std::time::Duration;

use serde::Deserialize;

use crate::error::{CacheError, Result};

/// Default reaping interval in milliseconds (10 seconds).
pub const DEFAULT_INTERVAL_MS: u64 = 10_000;

/// Cache configuration parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Reaping period and maximum entry age, in milliseconds
    pub interval_ms: u64,
}

impl CacheConfig {
    /// Creates a config with the given interval.
    ///
    /// The config works in whole milliseconds: sub-millisecond remainders round
    /// up, so any positive interval stays positive.
    pub fn with_interval(interval: Duration) -> Self {
        let millis = interval.as_nanos().div_ceil(1_000_000);
        Self {
            interval_ms: u64::try_from(millis).unwrap_or(u64::MAX),
        }
    }

    /// Returns the configured interval as a `Duration`.
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// Rejects a zero interval.
    pub fn validate(&self) -> Result<()> {
        if self.interval_ms == 0 {
            return Err(CacheError::InvalidConfig(
                "interval must be a positive duration".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_INTERVAL_MS,
        }
    }
}
