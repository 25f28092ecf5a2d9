//! Query building blocks shared by the warehouse and its callers.

use std::fmt::{Display, Formatter};

use ::duckdb::types::{ToSql, ToSqlOutput, Value as DuckValue};
use serde_json::{Map, Value};

/// A value bound to a `?` placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Null,
    Double(f64),
    Text(String),
}

impl ToSql for SqlParam {
    fn to_sql(&self) -> ::duckdb::Result<ToSqlOutput<'_>> {
        match self {
            Self::Null => Ok(ToSqlOutput::Owned(DuckValue::Null)),
            Self::Double(value) => value.to_sql(),
            Self::Text(value) => value.to_sql(),
        }
    }
}

impl From<f64> for SqlParam {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<&str> for SqlParam {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for SqlParam {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// A WHERE clause assembled from AND-ed fragments with `?` placeholders.
///
/// Parameters are kept in placeholder order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Predicate {
    clauses: Vec<String>,
    params: Vec<SqlParam>,
}

impl Predicate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one fragment together with the parameters for its placeholders.
    pub fn push(&mut self, clause: impl Into<String>, params: impl IntoIterator<Item = SqlParam>) {
        self.clauses.push(clause.into());
        self.params.extend(params);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    #[must_use]
    pub fn clauses(&self) -> &[String] {
        &self.clauses
    }

    #[must_use]
    pub fn params(&self) -> &[SqlParam] {
        &self.params
    }

    /// The full ` WHERE ...` suffix, or an empty string when there is nothing to filter on.
    #[must_use]
    pub fn where_sql(&self) -> String {
        if self.clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.clauses.join(" AND "))
        }
    }
}

impl Display for Predicate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.clauses.join(" AND ").as_str())
    }
}

/// How fetched rows are decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowShape {
    /// Positional values, one `Vec` per row.
    Tuple,
    /// Column name to value, one map per row.
    Mapping,
}

/// Rows returned by [`Warehouse::fetch`](crate::Warehouse::fetch).
#[derive(Debug, Clone, PartialEq)]
pub enum Rows {
    Tuples(Vec<Vec<Value>>),
    Mappings(Vec<Map<String, Value>>),
}

impl Rows {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Tuples(rows) => rows.len(),
            Self::Mappings(rows) => rows.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Aggregate function applied by [`Warehouse::aggregate`](crate::Warehouse::aggregate).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    Min,
    Max,
}

impl Aggregate {
    #[must_use]
    pub const fn sql_function(self) -> &'static str {
        match self {
            Self::Min => "MIN",
            Self::Max => "MAX",
        }
    }
}
