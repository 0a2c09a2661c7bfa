//! PostgreSQL-backed [`Gateway`].

use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::{PgArguments, PgPoolOptions, PgRow};
use sqlx::query::Query;
use sqlx::{Column, PgPool, Postgres, Row as _, TypeInfo};
use std::time::Duration;

use crate::config::DatabaseConfig;
use crate::db::gateway::{Gateway, Param, Row};
use crate::error::{AppError, AppResult};

/// Gateway over a lazily connecting `PgPool`.
#[derive(Clone)]
pub struct PgGateway {
    pool: PgPool,
}

impl PgGateway {
    /// Create the gateway.
    ///
    /// The configuration is validated first, so a missing value fails here
    /// without touching the network. Connections are opened on first use.
    pub fn new(config: &DatabaseConfig) -> AppResult<Self> {
        config.validate()?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout))
            .connect_lazy_with(config.connect_options());

        tracing::info!(
            host = %config.host,
            port = config.port,
            database = %config.name,
            user = %config.user,
            max_connections = config.max_connections,
            "Database connection pool created"
        );

        Ok(Self { pool })
    }

    /// Access the underlying pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Close every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Database connection pool closed");
    }
}

#[async_trait]
impl Gateway for PgGateway {
    async fn execute(&self, sql: &str, params: &[Param]) -> AppResult<()> {
        bind_params(sqlx::query(sql), params)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(())
    }

    async fn fetch_rows(&self, sql: &str, params: &[Param]) -> AppResult<Vec<Row>> {
        let rows = bind_params(sqlx::query(sql), params)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(rows.iter().map(pg_row_to_json).collect())
    }
}

fn bind_params<'q>(
    mut query: Query<'q, Postgres, PgArguments>,
    params: &'q [Param],
) -> Query<'q, Postgres, PgArguments> {
    for param in params {
        query = match param {
            Param::Text(value) => query.bind(value.as_deref()),
            Param::Bool(value) => query.bind(*value),
            Param::Int(value) => query.bind(*value),
            Param::Timestamp(value) => query.bind(*value),
        };
    }
    query
}

/// Unique violations become [`AppError::Conflict`] so callers can tell a
/// duplicate key apart from any other driver failure.
fn map_db_error(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return AppError::Conflict(db.message().to_string());
        }
    }
    AppError::Database(err)
}

/// Convert a driver row into a JSON object keyed by column name.
pub fn pg_row_to_json(row: &PgRow) -> Row {
    row.columns()
        .iter()
        .enumerate()
        .map(|(idx, column)| (column.name().to_string(), column_to_json(row, idx)))
        .collect()
}

fn column_to_json(row: &PgRow, idx: usize) -> Value {
    let type_name = row.columns()[idx].type_info().name();

    match type_name {
        "BOOL" => decode_as::<bool>(row, idx),
        "INT2" => decode_as::<i16>(row, idx),
        "INT4" => decode_as::<i32>(row, idx),
        "INT8" => decode_as::<i64>(row, idx),
        "FLOAT4" => decode_as::<f32>(row, idx),
        "FLOAT8" => decode_as::<f64>(row, idx),
        "JSON" | "JSONB" => row
            .try_get::<Option<Value>, _>(idx)
            .ok()
            .flatten()
            .unwrap_or(Value::Null),
        "TIMESTAMPTZ" => row
            .try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(idx)
            .ok()
            .flatten()
            .map(|v| Value::String(v.to_rfc3339()))
            .unwrap_or(Value::Null),
        "TIMESTAMP" => row
            .try_get::<Option<chrono::NaiveDateTime>, _>(idx)
            .ok()
            .flatten()
            .map(|v| Value::String(v.and_utc().to_rfc3339()))
            .unwrap_or(Value::Null),
        "DATE" => row
            .try_get::<Option<chrono::NaiveDate>, _>(idx)
            .ok()
            .flatten()
            .map(|v| Value::String(v.to_string()))
            .unwrap_or(Value::Null),
        "UUID" => row
            .try_get::<Option<uuid::Uuid>, _>(idx)
            .ok()
            .flatten()
            .map(|v| Value::String(v.to_string()))
            .unwrap_or(Value::Null),
        // TEXT, VARCHAR, BPCHAR, NAME and anything else that decodes as text
        _ => decode_as::<String>(row, idx),
    }
}

fn decode_as<'r, T>(row: &'r PgRow, idx: usize) -> Value
where
    T: sqlx::Decode<'r, Postgres> + sqlx::Type<Postgres> + serde::Serialize,
{
    row.try_get::<Option<T>, _>(idx)
        .ok()
        .flatten()
        .and_then(|v| serde_json::to_value(v).ok())
        .unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> DatabaseConfig {
        DatabaseConfig {
            host: "localhost".to_string(),
            port: 5432,
            name: "wedding".to_string(),
            user: "guest".to_string(),
            password: "secret".to_string(),
            max_connections: 2,
            acquire_timeout: 1,
            auto_migrate: false,
        }
    }

    #[tokio::test]
    async fn test_new_is_lazy() {
        // No server is listening; construction must still succeed.
        let gateway = PgGateway::new(&config()).unwrap();
        assert_eq!(gateway.pool().size(), 0);
    }

    #[tokio::test]
    async fn test_new_rejects_blank_host_before_connecting() {
        let mut config = config();
        config.host = String::new();
        let result = PgGateway::new(&config);
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_non_database_errors_pass_through() {
        let err = map_db_error(sqlx::Error::RowNotFound);
        assert!(matches!(err, AppError::Database(sqlx::Error::RowNotFound)));
    }
}
