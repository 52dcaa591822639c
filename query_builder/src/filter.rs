//! Filter criteria
//!
//! Every criterion is an equality predicate; a list of them is combined with AND.

use crate::errors::QueryError;
use crate::validation::ValidatedFieldName;
use crate::value::SqlValue;
use serde::{Deserialize, Serialize};

/// Single `<field> = $n` condition in the WHERE clause
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCriterion {
    pub field: ValidatedFieldName,
    pub value: SqlValue,
}

impl FilterCriterion {
    pub fn new(field: ValidatedFieldName, value: SqlValue) -> Self {
        Self { field, value }
    }

    /// Equality condition on a raw column name, validated here
    pub fn eq(field: &str, value: impl Into<SqlValue>) -> Result<Self, QueryError> {
        Ok(Self::new(ValidatedFieldName::new(field)?, value.into()))
    }
}
