use serde_json::Value;

use super::error::FilterError;
use super::filter_order::FilterOrder;
use super::types::{FilterOrderInfo, SortDirection, SqlResult};

/// Builds a parameterized `SELECT` for one table. Identifiers are validated and quoted;
/// every value goes through a `?` placeholder.
pub struct Filter {
    table_name: String,
    select_columns: Vec<String>,
    conditions: Vec<String>,
    params: Vec<Value>,
    order_data: Vec<FilterOrderInfo>,
}

impl Filter {
    pub fn new(table_name: impl Into<String>) -> Result<Self, FilterError> {
        let table_name = table_name.into();
        if !Self::is_identifier(&table_name) {
            return Err(FilterError::InvalidTableName(table_name));
        }
        Ok(Self {
            table_name,
            select_columns: vec![],
            conditions: vec![],
            params: vec![],
            order_data: vec![],
        })
    }

    pub fn select(&mut self, columns: &[&str]) -> Result<&mut Self, FilterError> {
        for column in columns {
            Self::validate_column(column)?;
        }
        self.select_columns = columns.iter().map(|c| c.to_string()).collect();
        Ok(self)
    }

    /// `column = ?`
    pub fn where_eq(&mut self, column: &str, value: impl Into<Value>) -> Result<&mut Self, FilterError> {
        Self::validate_column(column)?;
        self.conditions.push(format!("\"{}\" = ?", column));
        self.params.push(value.into());
        Ok(self)
    }

    /// Case-insensitive substring match on any of `columns`:
    /// `(LOWER(a) LIKE ? OR LOWER(b) LIKE ?)` with the needle lower-cased and wrapped in `%`.
    pub fn where_contains_any(&mut self, columns: &[&str], needle: &str) -> Result<&mut Self, FilterError> {
        if columns.is_empty() {
            return Err(FilterError::NoSearchColumns);
        }
        let pattern = format!("%{}%", needle.to_lowercase());
        let mut parts = Vec::with_capacity(columns.len());
        for column in columns {
            Self::validate_column(column)?;
            parts.push(format!("LOWER(\"{}\") LIKE ?", column));
            self.params.push(Value::from(pattern.as_str()));
        }
        self.conditions.push(format!("({})", parts.join(" OR ")));
        Ok(self)
    }

    pub fn order(&mut self, column: &str, sort: SortDirection) -> Result<&mut Self, FilterError> {
        Self::validate_column(column)?;
        self.order_data.push(FilterOrderInfo { column: column.to_string(), sort });
        Ok(self)
    }

    pub fn to_sql(&self) -> SqlResult {
        let where_clause = if self.conditions.is_empty() {
            "1=1".to_string()
        } else {
            self.conditions.join(" AND ")
        };

        let query = [
            format!("SELECT {}", self.build_select_clause()),
            format!("FROM \"{}\"", self.table_name),
            format!("WHERE {}", where_clause),
            FilterOrder::generate(&self.order_data),
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

        SqlResult { query, params: self.params.clone() }
    }

    fn build_select_clause(&self) -> String {
        if self.select_columns.is_empty() {
            "*".to_string()
        } else {
            self.select_columns.iter().map(|c| format!("\"{}\"", c)).collect::<Vec<_>>().join(", ")
        }
    }

    fn validate_column(column: &str) -> Result<(), FilterError> {
        if Self::is_identifier(column) {
            Ok(())
        } else {
            Err(FilterError::InvalidColumn(column.to_string()))
        }
    }

    fn is_identifier(name: &str) -> bool {
        let mut chars = name.chars();
        match chars.next() {
            Some(first) if first.is_ascii_alphabetic() || first == '_' => {
                chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
            }
            _ => false,
        }
    }
}
