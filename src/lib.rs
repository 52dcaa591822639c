//! # pagecache
//!
//! Parameterized paginated reads over PostgreSQL with a time-bounded result cache.
//!
//! A request (table, equality filters, sort criteria, page window) is rendered
//! into a `SELECT ... LIMIT $n OFFSET $m` statement plus a companion
//! `SELECT COUNT(*)`. The first request for a key runs both against the
//! executor; identical requests within the TTL are answered from memory.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pagecache::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let cache = PaginatedCache::connect(&config).await?;
//!
//!     let orders = ValidatedTableName::new("orders")?;
//!     let filters = [FilterCriterion::eq("id", 4)?];
//!     let sort = [SortCriterion::asc("id")?];
//!     let page = PageRequest::new(0, 10)?;
//!
//!     let result = cache.fetch(&orders, &filters, &sort, &page).await?;
//!     println!("{} of {} rows", result.rows.len(), result.total);
//!     Ok(())
//! }
//! ```

/// Conditional debug logging macros
/// These macros only compile in code when the `debug-logging` feature is enabled
#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

pub mod core;
pub mod errors;
pub mod executor;
pub mod prelude;
pub mod result;

// Re-export the main public types for convenience
pub use crate::core::{connect_pool, PaginatedCache};
pub use errors::{ExecutorError, PageCacheError};
pub use executor::QueryExecutor;
pub use result::{PaginatedResult, Row};

// Re-export centralized config
pub use config::{AppConfig, CacheConfig, CacheKeyStrategy, DatabaseConfig};

// Re-export internal crates used in the public API
pub use cache_system;
pub use query_builder;

// Re-export external dependencies used in public API
pub use async_trait;
pub use sqlx;
