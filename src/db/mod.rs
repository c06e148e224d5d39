//! Postgres connection pool and shared query registry.

mod queries;

pub use queries::{
    GalleryQueries, PasswordResetQueries, Queries, QueryError, SessionQueries, UserQueries,
};

use anyhow::{Context, Result};
use secrecy::{ExposeSecret, SecretString};
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use tracing::{debug, info_span, Instrument, Span};
use url::Url;

pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Open a connection pool for the given DSN.
///
/// # Errors
/// Returns an error if the DSN is invalid or Postgres is unreachable.
pub async fn connect(dsn: &SecretString, max_connections: u32) -> Result<PgPool> {
    let target = redact_dsn(dsn.expose_secret());
    debug!("connecting to {target}");

    PgPoolOptions::new()
        .max_connections(max_connections.max(1))
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect(dsn.expose_secret())
        .instrument(info_span!("db.connect", db.system = "postgresql"))
        .await
        .with_context(|| format!("failed to connect to {target}"))
}

/// Strip the password from a DSN so it can be logged.
#[must_use]
pub fn redact_dsn(dsn: &str) -> String {
    match Url::parse(dsn) {
        Ok(mut url) => {
            if url.password().is_some() && url.set_password(Some("***")).is_err() {
                return "<invalid dsn>".to_string();
            }
            url.to_string()
        }
        Err(_) => "<invalid dsn>".to_string(),
    }
}

/// Span wrapping a single SQL statement.
pub(crate) fn query_span(operation: &str, statement: &str) -> Span {
    info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = operation,
        db.statement = statement
    )
}

/// Postgres `unique_violation`.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().is_some_and(|code| code == "23505"),
        _ => false,
    }
}
