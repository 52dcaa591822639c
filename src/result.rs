use query_builder::PageRequest;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One result row: column name → value, in select-list order
pub type Row = Map<String, Value>;

/// One page of rows plus the number of rows matching the filters overall
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaginatedResult {
    pub rows: Vec<Row>,
    pub total: i64,
}

impl PaginatedResult {
    pub fn new(rows: Vec<Row>, total: i64) -> Self {
        Self { rows, total }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether rows exist past the window this result was fetched with
    pub fn has_next_page(&self, page: &PageRequest) -> bool {
        let seen = page.offset().saturating_add(self.rows.len() as u64);
        u64::try_from(self.total).is_ok_and(|total| seen < total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows(n: usize) -> Vec<Row> {
        (0..n)
            .map(|i| {
                let mut row = Row::new();
                row.insert("id".to_string(), json!(i));
                row
            })
            .collect()
    }

    #[test]
    fn test_has_next_page() {
        let page = PageRequest::new(10, 10).unwrap();
        assert!(PaginatedResult::new(rows(10), 25).has_next_page(&page));
        assert!(!PaginatedResult::new(rows(10), 20).has_next_page(&page));
        assert!(!PaginatedResult::new(rows(0), 0).has_next_page(&page));
    }

    #[test]
    fn test_row_keeps_column_order() {
        let mut row = Row::new();
        for column in ["total", "id", "status", "amount"] {
            row.insert(column.to_string(), Value::Null);
        }

        let columns: Vec<&str> = row.keys().map(String::as_str).collect();
        assert_eq!(columns, ["total", "id", "status", "amount"]);
        assert_eq!(
            serde_json::to_string(&row).unwrap(),
            r#"{"total":null,"id":null,"status":null,"amount":null}"#
        );
    }

    #[test]
    fn test_serializes_rows_and_total() {
        let result = PaginatedResult::new(rows(1), 1);
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"rows": [{"id": 0}], "total": 1})
        );
    }
}
