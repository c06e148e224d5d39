//! Single-use password reset tokens.
//!
//! Each account has at most one pending reset; requesting another replaces
//! it. Consuming a token deletes its record in the same statement that reads
//! it, so a token can succeed at most once even under concurrent requests.
//! Expired tokens are deleted by the lookup that finds them.

use anyhow::Context;
use chrono::{DateTime, Utc};
use secrecy::ExposeSecret;
use sqlx::{FromRow, PgPool, Row};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, Instrument};
use uuid::Uuid;

use super::{
    config::AuthConfig,
    error::AuthError,
    models::{Account, NewPasswordReset},
    token::{mint_token, TokenHash},
    utils::normalize_email,
};
use crate::db::{query_span, Queries};

#[derive(Clone)]
pub struct PasswordResetService {
    pool: PgPool,
    queries: Arc<Queries>,
    config: AuthConfig,
}

impl PasswordResetService {
    #[must_use]
    pub fn new(pool: PgPool, queries: Arc<Queries>, config: AuthConfig) -> Self {
        Self {
            pool,
            queries,
            config,
        }
    }

    /// Issue a reset token for the account registered under `email`.
    ///
    /// The token expires `ttl` after creation; a zero `ttl` yields a token
    /// that is already expired.
    ///
    /// # Errors
    /// [`AuthError::AccountNotFound`] if no account uses the email.
    #[instrument(skip(self))]
    pub async fn create(&self, email: &str, ttl: Duration) -> Result<NewPasswordReset, AuthError> {
        let token = mint_token(self.config.bytes_per_token())?;
        let token_hash = TokenHash::of(token.expose_secret());
        let ttl_millis = i64::try_from(ttl.as_millis()).context("reset ttl is out of range")?;

        // Account lookup and upsert run as one statement; no row means no account.
        let query = self.queries.password_resets.create.as_str();
        let row = sqlx::query(query)
            .bind(normalize_email(email))
            .bind(token_hash.as_bytes())
            .bind(ttl_millis)
            .fetch_optional(&self.pool)
            .instrument(query_span("INSERT", query))
            .await
            .context("failed to store password reset")?;

        let Some(row) = row else {
            return Err(AuthError::AccountNotFound);
        };

        let id: Uuid = row.try_get("id").context("failed to read reset id")?;
        let account_id: Uuid = row
            .try_get("user_id")
            .context("failed to read reset user id")?;
        let expires_at: DateTime<Utc> = row
            .try_get("expires_at")
            .context("failed to read reset expiry")?;
        info!(%account_id, %expires_at, "password reset issued");

        Ok(NewPasswordReset {
            id,
            account_id,
            token,
            expires_at,
        })
    }

    /// Redeem a reset token, returning the account it was issued for.
    ///
    /// # Errors
    /// [`AuthError::TokenNotFound`] for unknown or already used tokens,
    /// [`AuthError::TokenExpired`] for tokens past their expiry.
    #[instrument(skip_all)]
    pub async fn consume(&self, token: &str) -> Result<Account, AuthError> {
        let token_hash = TokenHash::of(token);
        let query = self.queries.password_resets.consume.as_str();
        let row = sqlx::query(query)
            .bind(token_hash.as_bytes())
            .fetch_optional(&self.pool)
            .instrument(query_span("DELETE", query))
            .await
            .context("failed to consume password reset")?;

        let Some(row) = row else {
            return Err(AuthError::TokenNotFound);
        };

        let account = Account::from_row(&row).context("failed to read reset account")?;
        let expired: bool = row
            .try_get("expired")
            .context("failed to read reset expiry")?;
        if expired {
            info!(account_id = %account.id, "expired password reset discarded");
            return Err(AuthError::TokenExpired);
        }

        info!(account_id = %account.id, "password reset consumed");
        Ok(account)
    }
}
