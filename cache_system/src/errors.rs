//! Error types for cache construction
//!
//! Lookups never fail on their own; errors produced while filling an entry
//! belong to the caller and are passed through untouched.

use thiserror::Error;

/// Cache system errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error("Invalid TTL value: {0} seconds")]
    InvalidTtl(u64),
}
