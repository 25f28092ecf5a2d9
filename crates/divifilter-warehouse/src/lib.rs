//! # Divifilter Warehouse
//!
//! DuckDB-backed row store for dividend stock data.
//!
//! ## Overview
//!
//! The warehouse owns the `dividend_data_table`, hands out pooled
//! connections, and exposes the three read operations the filter layer
//! needs: an aggregate over one column, distinct values of one column, and a
//! filtered scan returning whole rows.
//!
//! ### Features
//!
//! - 🔒 **Secure SQL**: every value is a bound parameter; only catalog column
//!   names are spliced into query text
//! - 🧩 **One fetch path**: rows decode as tuples or as column-name mappings
//! - 🔄 **Connection Pooling**: cloned connections over a single database instance
//! - 📥 **Merging ingest**: upserts keep stored values where the new row is null
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use divifilter_warehouse::{StockField, StockRecord, Warehouse, WarehouseConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let warehouse = Warehouse::open(WarehouseConfig::default())?;
//!
//!     warehouse.upsert_stocks(&[StockRecord::new("KO").with(StockField::DivYield, 3.1)])?;
//!     let symbols = warehouse.distinct(StockField::Symbol)?;
//!     println!("{} symbols", symbols.len());
//!
//!     warehouse.close();
//!     Ok(())
//! }
//! ```
//!
//! ## Tables
//!
//! | Table | Description |
//! |-------|-------------|
//! | `dividend_data_table` | One row per symbol, see [`StockField`] |
//! | `dividend_update_times` | Last update time per data source |
//! | `schema_migrations` | Applied migration versions |

pub mod duckdb;
pub mod migrations;
pub mod models;
pub mod query;
pub mod schema;

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use ::duckdb::types::Value as DuckValue;
use ::duckdb::{params_from_iter, Connection};
use serde_json::{Map, Number, Value};
use thiserror::Error;

pub use self::duckdb::{DuckDbConnectionManager, PooledConnection, StoreLocation};
pub use models::StockRecord;
pub use query::{Aggregate, Predicate, RowShape, Rows, SqlParam};
pub use schema::{FieldKind, StockField, STOCK_TABLE, UPDATE_TIMES_TABLE};

/// Errors that can occur during warehouse operations.
#[derive(Debug, Error)]
pub enum WarehouseError {
    /// `DuckDB` database error.
    #[error(transparent)]
    DuckDb(#[from] ::duckdb::Error),

    /// I/O error (file system operations).
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Query was rejected due to policy violation.
    #[error("query rejected: {0}")]
    QueryRejected(String),

    /// A fetched row did not match the expected record layout.
    #[error("row decode failed: {0}")]
    Decode(#[from] serde_json::Error),

    /// The warehouse was closed.
    #[error("connection pool is closed")]
    PoolClosed,
}

/// Configuration for the warehouse database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarehouseConfig {
    /// Root directory for divifilter data.
    pub divifilter_home: PathBuf,
    /// Path to the `DuckDB` database file.
    pub db_path: PathBuf,
    /// Maximum number of idle connections kept in the pool.
    pub max_pool_size: usize,
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        Self::with_home(resolve_divifilter_home())
    }
}

impl WarehouseConfig {
    /// Default layout under the given home directory.
    pub fn with_home(divifilter_home: impl Into<PathBuf>) -> Self {
        let divifilter_home = divifilter_home.into();
        let db_path = divifilter_home.join("warehouse.duckdb");
        Self {
            divifilter_home,
            db_path,
            max_pool_size: 4,
        }
    }
}

/// The row store for dividend stock data.
#[derive(Clone)]
pub struct Warehouse {
    manager: DuckDbConnectionManager,
}

impl Warehouse {
    /// Open (creating if needed) the database file named by `config`.
    pub fn open(config: WarehouseConfig) -> Result<Self, WarehouseError> {
        if let Some(parent) = config.db_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let manager = DuckDbConnectionManager::open(
            StoreLocation::File(config.db_path.clone()),
            config.max_pool_size,
        )?;
        tracing::debug!(db_path = %config.db_path.display(), "opened warehouse");
        let warehouse = Self { manager };
        warehouse.initialize()?;
        Ok(warehouse)
    }

    /// Open a private in-memory warehouse.
    pub fn open_in_memory() -> Result<Self, WarehouseError> {
        let manager = DuckDbConnectionManager::open(StoreLocation::InMemory, 2)?;
        let warehouse = Self { manager };
        warehouse.initialize()?;
        Ok(warehouse)
    }

    /// Apply schema migrations.
    pub fn initialize(&self) -> Result<(), WarehouseError> {
        let connection = self.manager.acquire()?;
        migrations::apply_migrations(&connection)?;
        Ok(())
    }

    /// Get the path to the database file; `None` for in-memory stores.
    pub fn db_path(&self) -> Option<&Path> {
        self.manager.db_path()
    }

    /// Release pooled connections. Every later call fails with
    /// [`WarehouseError::PoolClosed`], including calls through clones.
    pub fn close(&self) {
        self.manager.close();
        tracing::debug!("closed warehouse");
    }

    /// Whether [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.manager.is_closed()
    }

    /// Run a read-only query with bound parameters and decode rows in the
    /// requested shape.
    ///
    /// # Security
    /// Only a single SELECT/CTE statement is accepted. Values must be passed
    /// through `params`, never formatted into `sql`.
    pub fn fetch(
        &self,
        sql: &str,
        params: &[SqlParam],
        shape: RowShape,
    ) -> Result<Rows, WarehouseError> {
        let sql = normalize_sql(sql)?;
        enforce_read_only_query(sql)?;

        let connection = self.manager.acquire()?;
        fetch_rows(&connection, sql, params, shape)
    }

    /// `MIN`/`MAX` of `field` over rows where `presence` is not null.
    ///
    /// Returns `None` when no row qualifies or all values of `field` are null.
    pub fn aggregate(
        &self,
        function: Aggregate,
        field: StockField,
        presence: StockField,
    ) -> Result<Option<f64>, WarehouseError> {
        if !field.is_numeric() {
            return Err(WarehouseError::QueryRejected(format!(
                "cannot aggregate categorical column '{field}'"
            )));
        }

        let sql = format!(
            "SELECT {function}({column}) FROM {STOCK_TABLE} WHERE {presence} IS NOT NULL",
            function = function.sql_function(),
            column = field.quoted(),
            presence = presence.quoted(),
        );
        tracing::debug!(%sql, "aggregate query");

        let Rows::Tuples(rows) = self.fetch(sql.as_str(), &[], RowShape::Tuple)? else {
            return Ok(None);
        };
        Ok(rows
            .first()
            .and_then(|row| row.first())
            .and_then(Value::as_f64))
    }

    /// Distinct non-null values of `field`, sorted ascending by column value.
    ///
    /// Numeric values are rendered in their shortest decimal form.
    pub fn distinct(&self, field: StockField) -> Result<Vec<String>, WarehouseError> {
        let column = field.quoted();
        let sql = format!(
            "SELECT DISTINCT {column} FROM {STOCK_TABLE} WHERE {column} IS NOT NULL ORDER BY 1"
        );
        tracing::debug!(%sql, "distinct query");

        let Rows::Tuples(rows) = self.fetch(sql.as_str(), &[], RowShape::Tuple)? else {
            return Ok(Vec::new());
        };
        Ok(rows
            .into_iter()
            .filter_map(|row| match row.into_iter().next() {
                Some(Value::String(value)) => Some(value),
                Some(Value::Number(value)) => value.as_f64().map(|value| value.to_string()),
                _ => None,
            })
            .collect())
    }

    /// Every row matching `predicate`, ordered by symbol.
    pub fn scan(&self, predicate: &Predicate) -> Result<Vec<StockRecord>, WarehouseError> {
        let sql = format!(
            "SELECT {columns} FROM {STOCK_TABLE}{filter} ORDER BY {symbol}",
            columns = StockField::select_list(),
            filter = predicate.where_sql(),
            symbol = StockField::Symbol.quoted(),
        );
        tracing::debug!(%sql, params = predicate.params().len(), "scan query");

        let Rows::Mappings(rows) = self.fetch(sql.as_str(), predicate.params(), RowShape::Mapping)?
        else {
            return Ok(Vec::new());
        };
        rows.into_iter()
            .map(|row| serde_json::from_value(Value::Object(row)).map_err(WarehouseError::from))
            .collect()
    }

    /// Insert new symbols and merge existing ones column by column.
    ///
    /// A non-null incoming value overwrites the stored one; a null keeps it.
    pub fn upsert_stocks(&self, rows: &[StockRecord]) -> Result<usize, WarehouseError> {
        if rows.is_empty() {
            return Ok(0);
        }
        ensure_finite(rows)?;

        let sql = upsert_sql();
        let connection = self.manager.acquire()?;
        connection.execute_batch("BEGIN TRANSACTION")?;
        let result = insert_rows(&connection, sql.as_str(), rows);
        let written = finalize_transaction(&connection, result)?;
        tracing::info!(rows = written, "upserted stock rows");
        Ok(written)
    }

    /// Replace the whole table with `rows`.
    pub fn replace_stocks(&self, rows: &[StockRecord]) -> Result<usize, WarehouseError> {
        ensure_finite(rows)?;

        let sql = upsert_sql();
        let connection = self.manager.acquire()?;
        connection.execute_batch("BEGIN TRANSACTION")?;
        let result = connection
            .execute_batch(format!("DELETE FROM {STOCK_TABLE}").as_str())
            .map_err(WarehouseError::from)
            .and_then(|()| insert_rows(&connection, sql.as_str(), rows));
        let written = finalize_transaction(&connection, result)?;
        tracing::info!(rows = written, "replaced stock table");
        Ok(written)
    }

    /// Set the last update time of a data source.
    pub fn record_update_time(&self, name: &str, last_update_time: &str) -> Result<(), WarehouseError> {
        let connection = self.manager.acquire()?;
        let sql = format!(
            "INSERT INTO {UPDATE_TIMES_TABLE} (name, last_update_time) VALUES (?, ?) \
             ON CONFLICT (name) DO UPDATE SET last_update_time = excluded.last_update_time"
        );
        connection.execute(sql.as_str(), [name, last_update_time])?;
        Ok(())
    }

    /// Last update time of every data source.
    pub fn update_times(&self) -> Result<BTreeMap<String, String>, WarehouseError> {
        let sql = format!("SELECT name, last_update_time FROM {UPDATE_TIMES_TABLE} ORDER BY name");
        let rows = self.fetch(sql.as_str(), &[], RowShape::Tuple)?;
        let Rows::Tuples(rows) = rows else {
            return Ok(BTreeMap::new());
        };

        Ok(rows
            .into_iter()
            .filter_map(|row| {
                let mut values = row.into_iter();
                match (values.next(), values.next()) {
                    (Some(Value::String(name)), Some(Value::String(time))) => Some((name, time)),
                    _ => None,
                }
            })
            .collect())
    }
}

/// `INSERT ... ON CONFLICT` statement covering every catalog column.
fn upsert_sql() -> String {
    let placeholders = vec!["?"; StockField::ALL.len()].join(", ");
    let merges = StockField::ALL
        .iter()
        .filter(|field| **field != StockField::Symbol)
        .map(|field| {
            let column = field.quoted();
            format!("{column} = COALESCE(excluded.{column}, {column})")
        })
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "INSERT INTO {STOCK_TABLE} ({columns}) VALUES ({placeholders}) \
         ON CONFLICT ({symbol}) DO UPDATE SET {merges}",
        columns = StockField::select_list(),
        symbol = StockField::Symbol.quoted(),
    )
}

/// Reject rows holding NaN or infinite numbers. DuckDB orders NaN above
/// every number, so a stored NaN would satisfy `>=` filters.
fn ensure_finite(rows: &[StockRecord]) -> Result<(), WarehouseError> {
    for row in rows {
        let bad = StockField::ALL
            .iter()
            .find(|field| row.numeric(**field).is_some_and(|value| !value.is_finite()));
        if let Some(field) = bad {
            return Err(WarehouseError::QueryRejected(format!(
                "non-finite value in column '{field}' for symbol '{}'",
                row.symbol
            )));
        }
    }
    Ok(())
}

fn insert_rows(
    connection: &Connection,
    sql: &str,
    rows: &[StockRecord],
) -> Result<usize, WarehouseError> {
    let mut statement = connection.prepare(sql)?;
    for row in rows {
        // SECURITY: every column value is bound, never interpolated
        let params: Vec<SqlParam> = StockField::ALL.iter().map(|field| row.param(*field)).collect();
        statement.execute(params_from_iter(params.iter()))?;
    }
    Ok(rows.len())
}

/// Finalize a transaction, committing on success or rolling back on failure.
fn finalize_transaction<T>(
    connection: &Connection,
    result: Result<T, WarehouseError>,
) -> Result<T, WarehouseError> {
    match result {
        Ok(value) => {
            connection.execute_batch("COMMIT")?;
            Ok(value)
        }
        Err(error) => {
            let _ = connection.execute_batch("ROLLBACK");
            Err(error)
        }
    }
}

fn fetch_rows(
    connection: &Connection,
    sql: &str,
    params: &[SqlParam],
    shape: RowShape,
) -> Result<Rows, WarehouseError> {
    let mut statement = connection.prepare(sql)?;
    let mut cursor = statement.query(params_from_iter(params.iter()))?;
    let columns = cursor
        .as_ref()
        .map(|statement| statement.column_names())
        .unwrap_or_default();

    match shape {
        RowShape::Tuple => {
            let mut rows = Vec::new();
            while let Some(row) = cursor.next()? {
                rows.push(read_row(row, columns.len())?);
            }
            Ok(Rows::Tuples(rows))
        }
        RowShape::Mapping => {
            let mut rows = Vec::new();
            while let Some(row) = cursor.next()? {
                let values = read_row(row, columns.len())?;
                let mapping: Map<String, Value> =
                    columns.iter().cloned().zip(values).collect();
                rows.push(mapping);
            }
            Ok(Rows::Mappings(rows))
        }
    }
}

/// Read a single row from the result set.
fn read_row(row: &::duckdb::Row<'_>, column_count: usize) -> Result<Vec<Value>, ::duckdb::Error> {
    let mut output = Vec::with_capacity(column_count);
    for index in 0..column_count {
        let value: DuckValue = row.get(index)?;
        output.push(to_json_value(value));
    }
    Ok(output)
}

/// Convert a DuckDB value to a JSON value.
fn to_json_value(value: DuckValue) -> Value {
    match value {
        DuckValue::Null => Value::Null,
        DuckValue::Boolean(value) => Value::Bool(value),
        DuckValue::TinyInt(value) => Value::Number(Number::from(value)),
        DuckValue::SmallInt(value) => Value::Number(Number::from(value)),
        DuckValue::Int(value) => Value::Number(Number::from(value)),
        DuckValue::BigInt(value) => Value::Number(Number::from(value)),
        DuckValue::UTinyInt(value) => Value::Number(Number::from(value)),
        DuckValue::USmallInt(value) => Value::Number(Number::from(value)),
        DuckValue::UInt(value) => Value::Number(Number::from(value)),
        DuckValue::UBigInt(value) => Value::Number(Number::from(value)),
        DuckValue::Float(value) => number_from_f64(f64::from(value)),
        DuckValue::Double(value) => number_from_f64(value),
        DuckValue::Text(value) => Value::String(value),
        other => Value::String(format!("{other:?}")),
    }
}

/// Convert an f64 to a JSON number, returning Null for NaN/Inf.
fn number_from_f64(value: f64) -> Value {
    Number::from_f64(value)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

/// Normalize a SQL query string.
fn normalize_sql(sql: &str) -> Result<&str, WarehouseError> {
    let normalized = sql.trim();
    if normalized.is_empty() {
        return Err(WarehouseError::QueryRejected(String::from(
            "query must not be empty",
        )));
    }
    Ok(normalized.trim_end_matches(';').trim())
}

/// Enforce that a query is read-only (SELECT/CTE only).
fn enforce_read_only_query(sql: &str) -> Result<(), WarehouseError> {
    if !is_select_like(sql) {
        return Err(WarehouseError::QueryRejected(String::from(
            "only SELECT/CTE queries can be fetched",
        )));
    }
    if has_multiple_statements(sql) {
        return Err(WarehouseError::QueryRejected(String::from(
            "multiple SQL statements are not allowed",
        )));
    }
    Ok(())
}

fn is_select_like(sql: &str) -> bool {
    let first_keyword = sql
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_ascii_uppercase();
    matches!(first_keyword.as_str(), "SELECT" | "WITH")
}

/// Count `;`-separated statements, skipping separators inside quoted
/// literals and identifiers. Comments are not parsed.
fn has_multiple_statements(sql: &str) -> bool {
    let mut quote: Option<char> = None;
    let mut statements = 0_usize;
    let mut pending = false;

    for ch in sql.chars() {
        match quote {
            Some(open) if ch == open => quote = None,
            Some(_) => {}
            None => match ch {
                '\'' | '"' => {
                    quote = Some(ch);
                    pending = true;
                }
                ';' => {
                    if pending {
                        statements += 1;
                    }
                    pending = false;
                }
                other if !other.is_whitespace() => pending = true,
                _ => {}
            },
        }
    }

    if pending {
        statements += 1;
    }
    statements > 1
}

/// Resolve the divifilter home directory from environment or default.
fn resolve_divifilter_home() -> PathBuf {
    if let Some(path) = env::var_os("DIVIFILTER_HOME") {
        let path = PathBuf::from(path);
        if !path.as_os_str().is_empty() {
            return path;
        }
    }

    if let Some(home) = env::var_os("HOME") {
        return PathBuf::from(home).join(".divifilter");
    }

    PathBuf::from(".divifilter")
}
