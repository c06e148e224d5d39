pub mod galleries;
pub mod password;
pub mod reset;
pub mod sessions;
pub mod users;

// Internal "interpreter" for `Action`.
mod run;

use anyhow::Result;
use serde::Serialize;
use std::sync::Arc;

use crate::{
    auth::{AuthConfig, AuthError, PasswordResetService, SessionService, UserService},
    cli::commands::database,
    db::{self, Queries},
    gallery::GalleryService,
};

/// Settings shared by every action that talks to the database.
#[derive(Debug, Clone)]
pub struct Runtime {
    pub database: database::Options,
    pub auth: AuthConfig,
}

#[derive(Debug)]
pub enum Action {
    Hash(password::HashArgs),
    Compare(password::CompareArgs),
    Users(Runtime, users::Command),
    Sessions(Runtime, sessions::Command),
    Reset(Runtime, reset::Command),
    Galleries(Runtime, galleries::Command),
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self) -> Result<()> {
        run::execute(self).await
    }
}

pub(crate) struct Services {
    pub(crate) users: UserService,
    pub(crate) sessions: SessionService,
    pub(crate) resets: PasswordResetService,
    pub(crate) galleries: GalleryService,
}

impl Runtime {
    pub(crate) async fn services(&self) -> Result<Services> {
        let queries = Arc::new(Queries::embedded()?);
        let pool = db::connect(&self.database.dsn, self.database.max_connections).await?;

        Ok(Services {
            users: UserService::new(pool.clone(), queries.clone(), self.auth.clone()),
            sessions: SessionService::new(pool.clone(), queries.clone(), self.auth.clone()),
            resets: PasswordResetService::new(pool.clone(), queries.clone(), self.auth.clone()),
            galleries: GalleryService::new(pool, queries),
        })
    }
}

/// Turn an [`AuthError`] into what an operator should see.
pub(crate) fn report(err: AuthError) -> anyhow::Error {
    match err {
        AuthError::Internal(err) => err,
        other => anyhow::anyhow!(other.public_message()),
    }
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
