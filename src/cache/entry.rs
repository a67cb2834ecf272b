//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with creation timestamps.

use std::time::Duration;

use tokio::time::Instant;

// == Cache Entry ==
/// Represents a single cache entry with value and creation time.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored payload
    pub value: Vec<u8>,
    /// Monotonic creation timestamp, never updated after insertion
    pub created_at: Instant,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry stamped with the current time.
    pub fn new(value: Vec<u8>) -> Self {
        Self {
            value,
            created_at: Instant::now(),
        }
    }

    // == Age ==
    /// Returns how long the entry has existed as of `now`.
    pub fn age_at(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.created_at)
    }

    // == Is Expired ==
    /// Checks whether the entry has reached `interval` age as of `now`.
    ///
    /// Boundary condition: an entry is expired once its age is greater than or
    /// equal to the interval.
    pub fn is_expired_at(&self, now: Instant, interval: Duration) -> bool {
        self.age_at(now) >= interval
    }

    // == Is Occupied ==
    /// Returns true if the entry blocks a new insert for its key as of `now`.
    ///
    /// Entries holding an empty payload, or past their interval, may be replaced.
    pub fn is_occupied_at(&self, now: Instant, interval: Duration) -> bool {
        !self.value.is_empty() && !self.is_expired_at(now, interval)
    }
}
