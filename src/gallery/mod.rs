//! Gallery records owned by accounts. Image files are handled elsewhere.

use anyhow::Context;
use serde::Serialize;
use sqlx::{postgres::PgRow, FromRow, PgPool, Row};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, instrument, Instrument};
use uuid::Uuid;

use crate::db::{query_span, Queries};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Gallery {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
}

impl<'r> FromRow<'r, PgRow> for Gallery {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            title: row.try_get("title")?,
        })
    }
}

#[derive(Debug, Error)]
pub enum GalleryError {
    #[error("gallery not found")]
    NotFound,
    #[error("internal error: {0:#}")]
    Internal(#[from] anyhow::Error),
}

#[derive(Clone)]
pub struct GalleryService {
    pool: PgPool,
    queries: Arc<Queries>,
}

impl GalleryService {
    #[must_use]
    pub fn new(pool: PgPool, queries: Arc<Queries>) -> Self {
        Self { pool, queries }
    }

    /// # Errors
    /// Returns [`GalleryError::Internal`] if the insert fails, including an
    /// unknown owner.
    #[instrument(skip(self))]
    pub async fn create(&self, title: &str, user_id: Uuid) -> Result<Gallery, GalleryError> {
        let query = self.queries.galleries.create.as_str();
        let gallery = sqlx::query_as::<_, Gallery>(query)
            .bind(user_id)
            .bind(title.trim())
            .fetch_one(&self.pool)
            .instrument(query_span("INSERT", query))
            .await
            .context("failed to insert gallery")?;
        info!(gallery_id = %gallery.id, "gallery created");
        Ok(gallery)
    }

    /// # Errors
    /// [`GalleryError::NotFound`] if no gallery has the id.
    #[instrument(skip(self))]
    pub async fn by_id(&self, id: Uuid) -> Result<Gallery, GalleryError> {
        let query = self.queries.galleries.by_id.as_str();
        sqlx::query_as::<_, Gallery>(query)
            .bind(id)
            .fetch_optional(&self.pool)
            .instrument(query_span("SELECT", query))
            .await
            .context("failed to lookup gallery")?
            .ok_or(GalleryError::NotFound)
    }

    /// Galleries of an account, oldest first.
    ///
    /// # Errors
    /// Returns [`GalleryError::Internal`] if the query fails.
    #[instrument(skip(self))]
    pub async fn by_user_id(&self, user_id: Uuid) -> Result<Vec<Gallery>, GalleryError> {
        let query = self.queries.galleries.by_user_id.as_str();
        let galleries = sqlx::query_as::<_, Gallery>(query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .instrument(query_span("SELECT", query))
            .await
            .context("failed to list galleries")?;
        Ok(galleries)
    }

    /// Save the title of an existing gallery.
    ///
    /// # Errors
    /// [`GalleryError::NotFound`] if the gallery no longer exists.
    #[instrument(skip(self))]
    pub async fn update(&self, gallery: &Gallery) -> Result<(), GalleryError> {
        let query = self.queries.galleries.update.as_str();
        let result = sqlx::query(query)
            .bind(gallery.id)
            .bind(gallery.title.trim())
            .execute(&self.pool)
            .instrument(query_span("UPDATE", query))
            .await
            .context("failed to update gallery")?;

        if result.rows_affected() == 0 {
            return Err(GalleryError::NotFound);
        }
        Ok(())
    }

    /// Deleting a missing gallery is not an error.
    ///
    /// # Errors
    /// Returns [`GalleryError::Internal`] if the delete fails.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), GalleryError> {
        let query = self.queries.galleries.delete.as_str();
        sqlx::query(query)
            .bind(id)
            .execute(&self.pool)
            .instrument(query_span("DELETE", query))
            .await
            .context("failed to delete gallery")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AuthConfig, PasswordParams, UserService};
    use crate::test_support::TestDb;
    use anyhow::Result;
    use secrecy::SecretString;

    async fn owner(db: &TestDb, email: &str) -> Result<Uuid> {
        let config = AuthConfig::new().with_password_params(PasswordParams {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        });
        let users = UserService::new(db.pool.clone(), db.queries.clone(), config);
        let account = users
            .create(email, &SecretString::from("pw".to_string()))
            .await?;
        Ok(account.id)
    }

    #[test]
    fn gallery_serializes_without_surprises() -> Result<()> {
        let gallery = Gallery {
            id: Uuid::nil(),
            user_id: Uuid::nil(),
            title: "Holidays".to_string(),
        };
        let json = serde_json::to_value(&gallery)?;
        assert_eq!(json["title"], "Holidays");
        assert_eq!(json["user_id"], Uuid::nil().to_string());
        Ok(())
    }

    #[tokio::test]
    async fn gallery_lifecycle() -> Result<()> {
        let Ok(db) = TestDb::new().await else {
            return Ok(());
        };
        let user_id = owner(&db, "owner@example.com").await?;
        let galleries = GalleryService::new(db.pool.clone(), db.queries.clone());

        let first = galleries.create(" Holidays ", user_id).await?;
        let second = galleries.create("Pets", user_id).await?;
        assert_eq!(first.title, "Holidays");
        assert_eq!(first.user_id, user_id);

        let listed = galleries.by_user_id(user_id).await?;
        assert_eq!(listed, vec![first.clone(), second.clone()]);

        let renamed = Gallery {
            title: "Summer".to_string(),
            ..first.clone()
        };
        galleries.update(&renamed).await?;
        assert_eq!(galleries.by_id(first.id).await?.title, "Summer");

        galleries.delete(first.id).await?;
        assert!(matches!(
            galleries.by_id(first.id).await,
            Err(GalleryError::NotFound)
        ));
        assert!(matches!(
            galleries.update(&renamed).await,
            Err(GalleryError::NotFound)
        ));

        // Idempotent.
        galleries.delete(first.id).await?;
        assert_eq!(galleries.by_user_id(user_id).await?, vec![second]);
        Ok(())
    }

    #[tokio::test]
    async fn galleries_are_scoped_to_owner() -> Result<()> {
        let Ok(db) = TestDb::new().await else {
            return Ok(());
        };
        let alice = owner(&db, "alice@example.com").await?;
        let bob = owner(&db, "bob@example.com").await?;
        let galleries = GalleryService::new(db.pool.clone(), db.queries.clone());

        galleries.create("Alice's", alice).await?;
        assert!(galleries.by_user_id(bob).await?.is_empty());

        let err = galleries.create("Orphan", Uuid::new_v4()).await.err();
        assert!(matches!(err, Some(GalleryError::Internal(_))));
        Ok(())
    }
}
