use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::Serialize;
use sqlx::{postgres::PgRow, FromRow, Row};
use uuid::Uuid;

/// A stored account. Only the password hash is ever kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

impl<'r> FromRow<'r, PgRow> for Account {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
        })
    }
}

/// A freshly created session.
///
/// `token` is the only copy of the raw value; hand it to the client and drop it.
#[derive(Debug)]
pub struct NewSession {
    pub id: Uuid,
    pub account_id: Uuid,
    pub token: SecretString,
}

/// A freshly created (or replaced) password reset.
#[derive(Debug)]
pub struct NewPasswordReset {
    pub id: Uuid,
    pub account_id: Uuid,
    pub token: SecretString,
    pub expires_at: DateTime<Utc>,
}
