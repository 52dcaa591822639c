//! Convenience re-exports for common pagecache usage
//!
//! # Example
//!
//! ```rust
//! use pagecache::prelude::*;
//! ```

// Core components
pub use crate::core::{connect_pool, PaginatedCache};
pub use crate::errors::{ExecutorError, PageCacheError};
pub use crate::executor::QueryExecutor;
pub use crate::result::{PaginatedResult, Row};

// Re-export centralized config
pub use config::{AppConfig, CacheConfig, CacheKeyStrategy, DatabaseConfig};

// Query building
pub use query_builder::prelude::*;

// Cache internals
pub use cache_system::prelude::*;

// Common external dependencies
pub use anyhow;
pub use async_trait::async_trait;
pub use sqlx;
pub use sqlx::PgPool;
pub use tokio;
