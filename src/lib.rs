//! Pokecache - A concurrent in-memory TTL cache
//!
//! Caches raw API response bytes by key, expiring each entry a fixed interval
//! after insertion. A background task reaps expired entries for the lifetime of
//! the cache.

pub mod cache;
pub mod config;
pub mod error;
pub(crate) mod tasks;

pub use cache::TtlCache;
pub use config::CacheConfig;
pub use error::{CacheError, Result};
