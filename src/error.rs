//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// A live entry already occupies the key
    #[error("Key already exists: {0}")]
    AlreadyExists(String),

    /// Construction parameters were rejected
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// No tokio runtime to host the reaper task
    #[error("No tokio runtime available to spawn the reaper task")]
    RuntimeUnavailable,
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
