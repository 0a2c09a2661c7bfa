//! Embedded table definitions.

use crate::db::gateway::Gateway;
use crate::error::AppResult;

/// DDL for the `rsvp` and `photo` tables.
pub const SCHEMA_SQL: &str = include_str!("../../sql/schema.sql");

/// Split the embedded DDL into individual statements, dropping comments.
pub fn statements() -> Vec<String> {
    SCHEMA_SQL
        .split(';')
        .map(|chunk| {
            chunk
                .lines()
                .filter(|line| !line.trim_start().starts_with("--"))
                .collect::<Vec<_>>()
                .join("\n")
                .trim()
                .to_string()
        })
        .filter(|statement| !statement.is_empty())
        .collect()
}

/// Create any missing tables.
pub async fn ensure_schema(gateway: &dyn Gateway) -> AppResult<()> {
    let statements = statements();
    for statement in &statements {
        gateway.execute(statement, &[]).await?;
    }
    tracing::info!(statements = statements.len(), "Database schema ensured");
    Ok(())
}
