//! Query Builder - parameterized SQL rendering for paginated reads
//!
//! This crate turns a table name, equality filters, sort criteria and a page
//! window into a `SELECT` statement, its companion `COUNT(*)` statement and the
//! ordered positional arguments both expect.

pub mod builder;
pub mod errors;
pub mod filter;
pub mod ordering;
pub mod pagination;
pub mod prelude;
pub mod sql_generation;
pub mod validation;
pub mod value;


pub use builder::{build_query, BuiltQuery, QueryBuilder};
pub use errors::QueryError;
pub use filter::FilterCriterion;
pub use ordering::{SortCriterion, SortDirection};
pub use pagination::{PageRequest, MAX_PAGE_VALUE};
pub use validation::{ValidatedFieldName, ValidatedTableName, ValidationError};
pub use value::SqlValue;
