//! Cache system for time-bounded, in-process result caching
//!
//! This crate provides a keyed TTL cache whose fills are serialized per key,
//! along with pluggable clocks for expiry checks.

pub mod clock;
pub mod entry;
pub mod errors;
pub mod manager;
pub mod prelude;

// Re-export centralized config
pub use config::{CacheConfig, CacheKeyStrategy};

pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use errors::CacheError;
pub use manager::{CacheStats, TtlCache};
