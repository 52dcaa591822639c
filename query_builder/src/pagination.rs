//! Pagination bounds

use crate::errors::QueryError;
use serde::{Deserialize, Serialize};

/// Largest offset or limit; both are bound as `BIGINT`
pub const MAX_PAGE_VALUE: u64 = i64::MAX as u64;

/// Offset/limit window; both are always bound as query parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPageRequest")]
pub struct PageRequest {
    offset: u64,
    limit: u64,
}

#[derive(Deserialize)]
struct RawPageRequest {
    #[serde(default)]
    offset: u64,
    limit: u64,
}

impl TryFrom<RawPageRequest> for PageRequest {
    type Error = QueryError;

    fn try_from(raw: RawPageRequest) -> Result<Self, Self::Error> {
        Self::new(raw.offset, raw.limit)
    }
}

impl PageRequest {
    /// Create a page window, rejecting a zero limit and values past `BIGINT`
    pub fn new(offset: u64, limit: u64) -> Result<Self, QueryError> {
        if limit == 0 {
            return Err(QueryError::InvalidPage(
                "limit must be greater than 0".to_string(),
            ));
        }
        if limit > MAX_PAGE_VALUE {
            return Err(QueryError::InvalidPage(format!(
                "limit {} exceeds maximum {}",
                limit, MAX_PAGE_VALUE
            )));
        }
        if offset > MAX_PAGE_VALUE {
            return Err(QueryError::InvalidPage(format!(
                "offset {} exceeds maximum {}",
                offset, MAX_PAGE_VALUE
            )));
        }
        Ok(Self { offset, limit })
    }

    /// First page of the given size
    pub fn first(limit: u64) -> Result<Self, QueryError> {
        Self::new(0, limit)
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub(crate) fn offset_i64(&self) -> i64 {
        i64::try_from(self.offset).unwrap_or(i64::MAX)
    }

    pub(crate) fn limit_i64(&self) -> i64 {
        i64::try_from(self.limit).unwrap_or(i64::MAX)
    }

    /// The window directly after this one
    pub fn next(&self) -> Self {
        Self {
            offset: self.offset.saturating_add(self.limit).min(MAX_PAGE_VALUE),
            limit: self.limit,
        }
    }
}
