//! Sort criteria

use crate::errors::QueryError;
use crate::validation::ValidatedFieldName;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_sql())
    }
}

/// One `<field> <direction>` entry of the ORDER BY clause
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortCriterion {
    pub field: ValidatedFieldName,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortCriterion {
    pub fn new(field: ValidatedFieldName, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    pub fn asc(field: &str) -> Result<Self, QueryError> {
        Ok(Self::new(ValidatedFieldName::new(field)?, SortDirection::Asc))
    }

    pub fn desc(field: &str) -> Result<Self, QueryError> {
        Ok(Self::new(ValidatedFieldName::new(field)?, SortDirection::Desc))
    }
}
