//! Throw-away Postgres databases for service tests.

pub mod postgres;
pub mod runtime;

use anyhow::{Context, Result};
use sqlx::{postgres::PgPoolOptions, Connection, PgConnection, PgPool};
use std::sync::Arc;
use uuid::Uuid;

use crate::db::Queries;
use postgres::PostgresContainer;

const SCHEMA_SQL: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/sql/schema.sql"));

pub(crate) fn unique_name(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple())
}

/// A migrated database plus the shared query registry.
pub(crate) struct TestDb {
    _postgres: PostgresContainer,
    pub(crate) pool: PgPool,
    pub(crate) queries: Arc<Queries>,
}

impl TestDb {
    /// Start Postgres and apply `sql/schema.sql`.
    ///
    /// Fails when no container runtime is reachable; callers treat that as
    /// "skip this test".
    pub(crate) async fn new() -> Result<Self> {
        if let Err(err) = runtime::ensure_container_runtime() {
            eprintln!("Skipping integration test: {err}");
            return Err(err);
        }

        let postgres = PostgresContainer::start().await?;
        postgres.wait_until_ready().await?;
        apply_schema(&postgres.admin_dsn()).await?;

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(&postgres.admin_dsn())
            .await
            .context("failed to connect test pool")?;
        let queries = Arc::new(Queries::embedded().context("failed to load queries")?);

        Ok(Self {
            _postgres: postgres,
            pool,
            queries,
        })
    }
}

async fn apply_schema(dsn: &str) -> Result<()> {
    let mut connection = PgConnection::connect(dsn)
        .await
        .context("failed to connect for schema setup")?;

    for (index, statement) in split_sql_statements(SCHEMA_SQL).iter().enumerate() {
        sqlx::query(statement)
            .execute(&mut connection)
            .await
            .with_context(|| format!("failed to execute schema statement {}", index + 1))?;
    }

    Ok(())
}

fn split_sql_statements(sql: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();

    for line in sql.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("--") {
            continue;
        }
        current.push_str(line);
        current.push('\n');

        if trimmed.ends_with(';') {
            let statement = current.trim();
            if !statement.is_empty() {
                statements.push(statement.to_string());
            }
            current.clear();
        }
    }

    let leftover = current.trim();
    if !leftover.is_empty() {
        statements.push(leftover.to_string());
    }

    statements
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_splits_into_statements() {
        let statements = split_sql_statements(SCHEMA_SQL);
        assert!(statements
            .iter()
            .any(|s| s.starts_with("CREATE TABLE IF NOT EXISTS users")));
        assert!(statements
            .iter()
            .any(|s| s.starts_with("CREATE TABLE IF NOT EXISTS password_resets")));
        assert!(statements.iter().all(|s| s.ends_with(';')));
    }

    #[test]
    fn unique_name_has_prefix() {
        let first = unique_name("postgres");
        let second = unique_name("postgres");
        assert!(first.starts_with("postgres-"));
        assert_ne!(first, second);
    }
}
