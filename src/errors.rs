//! Error types for the pagecache crate
//!
//! This module contains all error types that can be returned by paginated fetches.

use cache_system::CacheError;
use config::ConfigError;
use query_builder::QueryError;
use thiserror::Error;

/// Failures raised by a [`QueryExecutor`](crate::executor::QueryExecutor)
#[derive(Error, Debug)]
pub enum ExecutorError {
    /// The data store rejected or failed to run the statement
    #[error("Query execution failed: {0}")]
    Execution(#[source] sqlx::Error),

    /// A returned row or count could not be decoded into the expected shape
    #[error("Failed to scan result: {0}")]
    Scan(String),
}

impl ExecutorError {
    pub fn scan(message: impl Into<String>) -> Self {
        Self::Scan(message.into())
    }

    pub fn is_scan(&self) -> bool {
        matches!(self, Self::Scan(_))
    }
}

impl From<sqlx::Error> for ExecutorError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::Decode(_)
            | sqlx::Error::ColumnNotFound(_)
            | sqlx::Error::ColumnIndexOutOfBounds { .. }
            | sqlx::Error::TypeNotFound { .. } => Self::Scan(error.to_string()),
            other => Self::Execution(other),
        }
    }
}

#[derive(Error, Debug)]
pub enum PageCacheError {
    #[error("Invalid query: {0}")]
    Query(#[from] QueryError),

    #[error(transparent)]
    Executor(#[from] ExecutorError),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database connection error: {0}")]
    Connection(#[from] sqlx::Error),
}

impl From<query_builder::ValidationError> for PageCacheError {
    fn from(error: query_builder::ValidationError) -> Self {
        Self::Query(QueryError::Validation(error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_failures_map_to_scan() {
        let decode_errors = [
            sqlx::Error::ColumnDecode {
                index: "amount".to_string(),
                source: "unexpected null".into(),
            },
            sqlx::Error::Decode("invalid utf-8".into()),
            sqlx::Error::ColumnNotFound("amount".to_string()),
            sqlx::Error::ColumnIndexOutOfBounds { index: 3, len: 2 },
            sqlx::Error::TypeNotFound {
                type_name: "mood".to_string(),
            },
        ];

        for error in decode_errors {
            let mapped = ExecutorError::from(error);
            assert!(mapped.is_scan(), "expected scan error, got {:?}", mapped);
        }
    }

    #[test]
    fn test_other_failures_map_to_execution() {
        let execution_errors = [
            sqlx::Error::Protocol("connection reset by peer".to_string()),
            sqlx::Error::RowNotFound,
            sqlx::Error::PoolTimedOut,
            sqlx::Error::PoolClosed,
        ];

        for error in execution_errors {
            let mapped = ExecutorError::from(error);
            assert!(
                matches!(mapped, ExecutorError::Execution(_)),
                "expected execution error, got {:?}",
                mapped
            );
        }
    }

    #[test]
    fn test_executor_error_displays_transparently() {
        let error = PageCacheError::from(ExecutorError::scan("column 'amount': bad value"));
        assert_eq!(
            error.to_string(),
            "Failed to scan result: column 'amount': bad value"
        );
    }
}
