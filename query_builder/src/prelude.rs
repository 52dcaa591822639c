//! Convenience re-exports for common query-builder usage

pub use crate::builder::{build_query, BuiltQuery, QueryBuilder};
pub use crate::errors::QueryError;
pub use crate::filter::FilterCriterion;
pub use crate::ordering::{SortCriterion, SortDirection};
pub use crate::pagination::{PageRequest, MAX_PAGE_VALUE};
pub use crate::validation::{ValidatedFieldName, ValidatedTableName, ValidationError};
pub use crate::value::SqlValue;

pub use serde_json::{json, Value};
