//! Cache Module
//!
//! Provides a concurrent in-memory byte cache with TTL expiration.

mod entry;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use store::TtlCache;

pub(crate) use store::{remove_expired, EntryMap};
