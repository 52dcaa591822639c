//! Convenience re-exports for common cache-system usage

// Core cache system components
pub use crate::clock::{Clock, ManualClock, SystemClock};
pub use crate::entry::CacheEntry;
pub use crate::errors::CacheError;
pub use crate::manager::{CacheStats, TtlCache};

// Re-export centralized config
pub use config::{CacheConfig, CacheKeyStrategy};

// Common external dependencies
pub use tokio;
