//! SQL text rendering
//!
//! Placeholders are numbered `$1..$n` across the filter list and then continue
//! into the LIMIT/OFFSET pair, so the argument vector lines up index-for-index.

use crate::filter::FilterCriterion;
use crate::ordering::SortCriterion;
use crate::pagination::PageRequest;
use crate::validation::ValidatedTableName;
use crate::value::SqlValue;

pub struct SqlGenerator;

impl SqlGenerator {
    /// Build `WHERE a = $1 AND b = $2`; empty string when there are no filters
    pub fn build_where_clause(filters: &[FilterCriterion]) -> (String, Vec<SqlValue>) {
        if filters.is_empty() {
            return (String::new(), Vec::new());
        }

        let mut values = Vec::with_capacity(filters.len());
        let predicates = filters
            .iter()
            .enumerate()
            .map(|(i, filter)| {
                values.push(filter.value.clone());
                format!("{} = ${}", filter.field, i + 1)
            })
            .collect::<Vec<_>>()
            .join(" AND ");

        (format!("WHERE {}", predicates), values)
    }

    /// Build `ORDER BY a ASC, b DESC`; empty string when there is no sort
    pub fn build_order_clause(sort: &[SortCriterion]) -> String {
        if sort.is_empty() {
            return String::new();
        }

        let order_parts: Vec<String> = sort
            .iter()
            .map(|criterion| format!("{} {}", criterion.field, criterion.direction.to_sql()))
            .collect();

        format!("ORDER BY {}", order_parts.join(", "))
    }

    /// Build `LIMIT $n+1 OFFSET $n+2` where n is the number of placeholders already used
    pub fn build_limit_clause(page: &PageRequest, used_params: usize) -> (String, Vec<SqlValue>) {
        let clause = format!("LIMIT ${} OFFSET ${}", used_params + 1, used_params + 2);
        (
            clause,
            vec![
                SqlValue::BigInt(page.limit_i64()),
                SqlValue::BigInt(page.offset_i64()),
            ],
        )
    }

    /// Join non-empty clauses with single spaces
    pub fn assemble(base: &str, clauses: &[&str]) -> String {
        let extra: usize = clauses.iter().map(|c| c.len() + 1).sum();
        let mut sql = String::with_capacity(base.len() + extra);
        sql.push_str(base);
        for clause in clauses.iter().filter(|c| !c.is_empty()) {
            sql.push(' ');
            sql.push_str(clause);
        }
        sql
    }

    pub fn select_base(table: &ValidatedTableName) -> String {
        format!("SELECT * FROM {}", table)
    }

    pub fn count_base(table: &ValidatedTableName) -> String {
        format!("SELECT COUNT(*) FROM {}", table)
    }
}
