use crate::validation::ValidationError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("Invalid identifier: {0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid page request: {0}")]
    InvalidPage(String),

    #[error("Query for table '{0}' has no page request")]
    MissingPage(String),
}
