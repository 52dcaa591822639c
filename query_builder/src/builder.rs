//! Query builder
//!
//! Renders a paginated `SELECT` and its companion `COUNT(*)` query from
//! validated identifiers, equality filters, sort criteria and a page window.

use crate::errors::QueryError;
use crate::filter::FilterCriterion;
use crate::ordering::{SortCriterion, SortDirection};
use crate::pagination::PageRequest;
use crate::sql_generation::SqlGenerator;
use crate::validation::{ValidatedFieldName, ValidatedTableName};
use crate::value::SqlValue;
use serde::Serialize;

/// Rendered data query, count query and the positional arguments for both
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuiltQuery {
    /// `SELECT * ... LIMIT $n+1 OFFSET $n+2`
    pub sql: String,
    /// `SELECT COUNT(*) ...` sharing the data query's WHERE clause
    pub count_sql: String,
    /// Filter values followed by limit and offset
    pub arguments: Vec<SqlValue>,
}

impl BuiltQuery {
    /// Arguments for `count_sql`: everything except the trailing limit/offset pair
    pub fn count_arguments(&self) -> &[SqlValue] {
        let filter_count = self.arguments.len().saturating_sub(2);
        &self.arguments[..filter_count]
    }

    /// Number of `$n` placeholders in the data query
    pub fn placeholder_count(&self) -> usize {
        self.arguments.len()
    }
}

/// Render the data and count queries for one paginated request
pub fn build_query(
    table: &ValidatedTableName,
    filters: &[FilterCriterion],
    sort: &[SortCriterion],
    page: &PageRequest,
) -> BuiltQuery {
    let (where_clause, mut arguments) = SqlGenerator::build_where_clause(filters);
    let order_clause = SqlGenerator::build_order_clause(sort);
    let (limit_clause, page_arguments) = SqlGenerator::build_limit_clause(page, arguments.len());

    let sql = SqlGenerator::assemble(
        &SqlGenerator::select_base(table),
        &[where_clause.as_str(), order_clause.as_str(), limit_clause.as_str()],
    );
    let count_sql =
        SqlGenerator::assemble(&SqlGenerator::count_base(table), &[where_clause.as_str()]);

    arguments.extend(page_arguments);
    tracing::trace!(table = %table, sql = %sql, params = arguments.len(), "rendered paginated query");

    BuiltQuery {
        sql,
        count_sql,
        arguments,
    }
}

/// Fluent front-end over [`build_query`]
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    pub(crate) table: ValidatedTableName,
    pub(crate) filters: Vec<FilterCriterion>,
    pub(crate) sort: Vec<SortCriterion>,
    pub(crate) page: Option<PageRequest>,
}

impl QueryBuilder {
    pub fn new(table: ValidatedTableName) -> Self {
        Self {
            table,
            filters: Vec::new(),
            sort: Vec::new(),
            page: None,
        }
    }

    /// Start a builder from a raw table name
    pub fn table(name: &str) -> Result<Self, QueryError> {
        Ok(Self::new(ValidatedTableName::new(name)?))
    }

    /// Add a filter condition
    pub fn filter(mut self, filter: FilterCriterion) -> Self {
        self.filters.push(filter);
        self
    }

    /// Add multiple filters (combined with AND)
    pub fn filters(mut self, filters: impl IntoIterator<Item = FilterCriterion>) -> Self {
        self.filters.extend(filters);
        self
    }

    /// Add equality filter on a raw column name
    pub fn filter_eq(self, field: &str, value: impl Into<SqlValue>) -> Result<Self, QueryError> {
        Ok(self.filter(FilterCriterion::eq(field, value)?))
    }

    /// Add ordering
    pub fn order_by(mut self, field: ValidatedFieldName, direction: SortDirection) -> Self {
        self.sort.push(SortCriterion::new(field, direction));
        self
    }

    /// Add several sort criteria, keeping their order
    pub fn sort(mut self, sort: impl IntoIterator<Item = SortCriterion>) -> Self {
        self.sort.extend(sort);
        self
    }

    pub fn page(mut self, page: PageRequest) -> Self {
        self.page = Some(page);
        self
    }

    pub fn table_name(&self) -> &ValidatedTableName {
        &self.table
    }

    pub fn filter_list(&self) -> &[FilterCriterion] {
        &self.filters
    }

    pub fn sort_list(&self) -> &[SortCriterion] {
        &self.sort
    }

    pub fn page_request(&self) -> Option<&PageRequest> {
        self.page.as_ref()
    }

    /// Render both queries; a page window is required
    pub fn build(&self) -> Result<BuiltQuery, QueryError> {
        let page = self
            .page
            .as_ref()
            .ok_or_else(|| QueryError::MissingPage(self.table.to_string()))?;
        Ok(build_query(&self.table, &self.filters, &self.sort, page))
    }
}
