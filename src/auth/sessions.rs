//! Session tokens for signed-in accounts.

use anyhow::Context;
use secrecy::ExposeSecret;
use sqlx::{PgPool, Row};
use std::sync::Arc;
use tracing::{debug, instrument, Instrument};
use uuid::Uuid;

use super::{
    config::{AuthConfig, SessionPolicy},
    error::AuthError,
    models::{Account, NewSession},
    token::{mint_token, TokenHash},
};
use crate::db::{query_span, Queries};

#[derive(Clone)]
pub struct SessionService {
    pool: PgPool,
    queries: Arc<Queries>,
    config: AuthConfig,
}

impl SessionService {
    #[must_use]
    pub fn new(pool: PgPool, queries: Arc<Queries>, config: AuthConfig) -> Self {
        Self {
            pool,
            queries,
            config,
        }
    }

    /// Start a session for an account and return the raw token once.
    ///
    /// With [`SessionPolicy::Single`] the account's earlier sessions are
    /// removed in the same transaction, so their tokens stop resolving.
    ///
    /// # Errors
    /// [`AuthError::AccountNotFound`] if the account does not exist.
    #[instrument(skip(self))]
    pub async fn create(&self, account_id: Uuid) -> Result<NewSession, AuthError> {
        let token = mint_token(self.config.bytes_per_token())?;
        let token_hash = TokenHash::of(token.expose_secret());
        let queries = &self.queries.sessions;

        let mut tx = self
            .pool
            .begin()
            .await
            .context("begin session transaction")?;

        // Row lock serializes concurrent sign-ins and sign-outs of the account.
        let locked = sqlx::query(&queries.lock_user)
            .bind(account_id)
            .fetch_optional(&mut *tx)
            .instrument(query_span("SELECT", &queries.lock_user))
            .await
            .context("failed to lock user for session")?;
        if locked.is_none() {
            let _ = tx.rollback().await;
            return Err(AuthError::AccountNotFound);
        }

        if self.config.session_policy() == SessionPolicy::Single {
            let purged = sqlx::query(&queries.purge_user)
                .bind(account_id)
                .execute(&mut *tx)
                .instrument(query_span("DELETE", &queries.purge_user))
                .await
                .context("failed to replace previous session")?;
            debug!(replaced = purged.rows_affected(), "previous sessions removed");
        }

        let row = sqlx::query(&queries.create)
            .bind(account_id)
            .bind(token_hash.as_bytes())
            .fetch_one(&mut *tx)
            .instrument(query_span("INSERT", &queries.create))
            .await
            .context("failed to insert session")?;
        let id: Uuid = row.try_get("id").context("failed to read session id")?;

        tx.commit().await.context("commit session transaction")?;

        Ok(NewSession {
            id,
            account_id,
            token,
        })
    }

    /// Resolve a presented session token to its account.
    ///
    /// # Errors
    /// [`AuthError::TokenNotFound`] if no session matches the token.
    #[instrument(skip_all)]
    pub async fn resolve(&self, token: &str) -> Result<Account, AuthError> {
        // Only the hash is stored; never compare raw tokens against the database.
        let token_hash = TokenHash::of(token);
        let query = self.queries.sessions.user_by_token.as_str();
        sqlx::query_as::<_, Account>(query)
            .bind(token_hash.as_bytes())
            .fetch_optional(&self.pool)
            .instrument(query_span("SELECT", query))
            .await
            .context("failed to lookup session")?
            .ok_or(AuthError::TokenNotFound)
    }

    /// Sign out. Deleting an unknown token is not an error.
    ///
    /// # Errors
    /// Returns [`AuthError::Internal`] if the delete fails.
    #[instrument(skip_all)]
    pub async fn delete(&self, token: &str) -> Result<(), AuthError> {
        let token_hash = TokenHash::of(token);
        let query = self.queries.sessions.delete.as_str();
        sqlx::query(query)
            .bind(token_hash.as_bytes())
            .execute(&self.pool)
            .instrument(query_span("DELETE", query))
            .await
            .context("failed to delete session")?;
        Ok(())
    }

    /// Sign an account out everywhere, returning how many sessions ended.
    ///
    /// # Errors
    /// Returns [`AuthError::Internal`] if the delete fails.
    #[instrument(skip(self))]
    pub async fn delete_all(&self, account_id: Uuid) -> Result<u64, AuthError> {
        let query = self.queries.sessions.purge_user.as_str();
        let result = sqlx::query(query)
            .bind(account_id)
            .execute(&self.pool)
            .instrument(query_span("DELETE", query))
            .await
            .context("failed to delete sessions")?;
        Ok(result.rows_affected())
    }
}
