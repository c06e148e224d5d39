//! Credential store: account creation, sign-in checks and password changes.

use anyhow::Context;
use secrecy::SecretString;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{info, instrument, warn, Instrument};
use uuid::Uuid;

use super::{
    config::AuthConfig,
    error::AuthError,
    models::Account,
    password::{hash_password_blocking, verify_password_blocking},
    utils::normalize_email,
};
use crate::db::{is_unique_violation, query_span, Queries};

#[derive(Clone)]
pub struct UserService {
    pool: PgPool,
    queries: Arc<Queries>,
    config: AuthConfig,
}

impl UserService {
    #[must_use]
    pub fn new(pool: PgPool, queries: Arc<Queries>, config: AuthConfig) -> Self {
        Self {
            pool,
            queries,
            config,
        }
    }

    /// Create an account with a freshly salted password hash.
    ///
    /// # Errors
    /// [`AuthError::EmailTaken`] if the normalized email is already registered.
    #[instrument(skip(self, password))]
    pub async fn create(&self, email: &str, password: &SecretString) -> Result<Account, AuthError> {
        let email = normalize_email(email);
        let password_hash =
            hash_password_blocking(password, self.config.password_params()).await?;

        let query = self.queries.users.create.as_str();
        let result = sqlx::query_as::<_, Account>(query)
            .bind(&email)
            .bind(&password_hash)
            .fetch_one(&self.pool)
            .instrument(query_span("INSERT", query))
            .await;

        match result {
            Ok(account) => {
                info!(account_id = %account.id, "account created");
                Ok(account)
            }
            Err(err) if is_unique_violation(&err) => Err(AuthError::EmailTaken),
            Err(err) => Err(AuthError::Internal(
                anyhow::Error::new(err).context("failed to insert user"),
            )),
        }
    }

    /// Check an email/password pair.
    ///
    /// Callers should not reveal which of the two failure kinds occurred.
    ///
    /// # Errors
    /// [`AuthError::AccountNotFound`] or [`AuthError::CredentialMismatch`].
    #[instrument(skip(self, password))]
    pub async fn authenticate(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<Account, AuthError> {
        let account = self
            .fetch_by_email(&normalize_email(email))
            .await?
            .ok_or(AuthError::AccountNotFound)?;

        if verify_password_blocking(password, &account.password_hash).await? {
            Ok(account)
        } else {
            Err(AuthError::CredentialMismatch)
        }
    }

    /// Look up an account by email.
    ///
    /// # Errors
    /// [`AuthError::AccountNotFound`] if no account uses the email.
    #[instrument(skip(self))]
    pub async fn by_email(&self, email: &str) -> Result<Account, AuthError> {
        self.fetch_by_email(&normalize_email(email))
            .await?
            .ok_or(AuthError::AccountNotFound)
    }

    /// Replace the password hash of an account.
    ///
    /// No old-password check happens here; gate this behind a consumed reset
    /// token or a fresh sign-in.
    ///
    /// # Errors
    /// Returns [`AuthError::Internal`] if hashing or the update fails.
    #[instrument(skip(self, password))]
    pub async fn update_password(
        &self,
        account_id: Uuid,
        password: &SecretString,
    ) -> Result<(), AuthError> {
        let password_hash =
            hash_password_blocking(password, self.config.password_params()).await?;

        let query = self.queries.users.update_password.as_str();
        let result = sqlx::query(query)
            .bind(account_id)
            .bind(&password_hash)
            .execute(&self.pool)
            .instrument(query_span("UPDATE", query))
            .await
            .context("failed to update password")?;

        if result.rows_affected() == 0 {
            warn!(%account_id, "password update matched no account");
        }
        Ok(())
    }

    async fn fetch_by_email(&self, email: &str) -> Result<Option<Account>, AuthError> {
        let query = self.queries.users.by_email.as_str();
        let account = sqlx::query_as::<_, Account>(query)
            .bind(email)
            .fetch_optional(&self.pool)
            .instrument(query_span("SELECT", query))
            .await
            .context("failed to lookup user by email")?;
        Ok(account)
    }
}
