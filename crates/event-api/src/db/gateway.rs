//! The data access contract shared by every resource.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;

use crate::db::row_mapper::{map_row, map_rows};
use crate::error::{AppError, AppResult};

/// A database row as a JSON object keyed by field name.
pub type Row = serde_json::Map<String, serde_json::Value>;

/// Positional bind value for a parameterized statement (`$1`, `$2`, ...).
///
/// Text and timestamps carry `None` for a typed SQL NULL.
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    Text(Option<String>),
    Bool(bool),
    Int(i64),
    Timestamp(Option<DateTime<Utc>>),
}

impl From<&str> for Param {
    fn from(value: &str) -> Self {
        Param::Text(Some(value.to_string()))
    }
}

impl From<String> for Param {
    fn from(value: String) -> Self {
        Param::Text(Some(value))
    }
}

impl From<Option<&str>> for Param {
    fn from(value: Option<&str>) -> Self {
        Param::Text(value.map(str::to_string))
    }
}

impl From<bool> for Param {
    fn from(value: bool) -> Self {
        Param::Bool(value)
    }
}

impl From<i64> for Param {
    fn from(value: i64) -> Self {
        Param::Int(value)
    }
}

impl From<DateTime<Utc>> for Param {
    fn from(value: DateTime<Utc>) -> Self {
        Param::Timestamp(Some(value))
    }
}

impl From<Option<DateTime<Utc>>> for Param {
    fn from(value: Option<DateTime<Utc>>) -> Self {
        Param::Timestamp(value)
    }
}

/// Owner of the connection pool and the four query shapes.
///
/// Implementors provide [`Gateway::execute`] and [`Gateway::fetch_rows`];
/// the fetch shapes are derived from `fetch_rows` and always return rows
/// with camelCase keys.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Run a statement that returns no rows (insert, delete, DDL).
    async fn execute(&self, sql: &str, params: &[Param]) -> AppResult<()>;

    /// Run a query and return its rows keyed by raw column name.
    async fn fetch_rows(&self, sql: &str, params: &[Param]) -> AppResult<Vec<Row>>;

    /// First row, or `None` when nothing matched.
    async fn fetch_one_or_none(&self, sql: &str, params: &[Param]) -> AppResult<Option<Row>> {
        let rows = self.fetch_rows(sql, params).await?;
        Ok(rows.into_iter().next().map(map_row))
    }

    /// First row. Zero rows is a [`AppError::NotFound`].
    async fn fetch_one(&self, sql: &str, params: &[Param]) -> AppResult<Row> {
        self.fetch_one_or_none(sql, params).await?.ok_or_else(|| {
            AppError::NotFound(
                "Expected at least one row from the database. Received zero...".to_string(),
            )
        })
    }

    /// Every row, in the order the database returned them.
    async fn fetch_many(&self, sql: &str, params: &[Param]) -> AppResult<Vec<Row>> {
        let rows = self.fetch_rows(sql, params).await?;
        Ok(map_rows(rows))
    }
}

/// Decode a mapped row into a model.
pub fn decode<T: DeserializeOwned>(row: Row) -> AppResult<T> {
    Ok(serde_json::from_value(serde_json::Value::Object(row))?)
}
