//! Named SQL statements loaded from `sql/queries.sql`.
//!
//! The file is a sequence of blocks, each introduced by a header line:
//!
//! ```sql
//! -- name: users.by_email
//! SELECT id, email, password_hash FROM users WHERE email = $1
//! ```
//!
//! [`Queries::load`] parses the blocks and checks that every statement the
//! services need is present exactly once. Services receive the result behind
//! an `Arc`, so the text is parsed a single time per process.

use regex::Regex;
use std::collections::BTreeMap;
use thiserror::Error;

const EMBEDDED_QUERIES: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/sql/queries.sql"));

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("statement text on line {0} appears before any `-- name:` header")]
    Orphan(usize),
    #[error("query `{0}` is defined more than once")]
    Duplicate(String),
    #[error("query `{0}` has an empty body")]
    Empty(String),
    #[error("query `{0}` is missing")]
    Missing(String),
    #[error("query `{0}` is not used by any service")]
    Unknown(String),
    #[error("invalid header pattern: {0}")]
    Pattern(String),
}

#[derive(Debug, Clone)]
pub struct UserQueries {
    pub(crate) create: String,
    pub(crate) by_email: String,
    pub(crate) update_password: String,
}

#[derive(Debug, Clone)]
pub struct SessionQueries {
    pub(crate) lock_user: String,
    pub(crate) purge_user: String,
    pub(crate) create: String,
    pub(crate) user_by_token: String,
    pub(crate) delete: String,
}

#[derive(Debug, Clone)]
pub struct PasswordResetQueries {
    pub(crate) create: String,
    pub(crate) consume: String,
}

#[derive(Debug, Clone)]
pub struct GalleryQueries {
    pub(crate) create: String,
    pub(crate) by_id: String,
    pub(crate) by_user_id: String,
    pub(crate) update: String,
    pub(crate) delete: String,
}

/// Every statement used by the services, validated at load time.
#[derive(Debug, Clone)]
pub struct Queries {
    pub(crate) users: UserQueries,
    pub(crate) sessions: SessionQueries,
    pub(crate) password_resets: PasswordResetQueries,
    pub(crate) galleries: GalleryQueries,
}

impl Queries {
    /// Load the statements compiled into the binary.
    ///
    /// # Errors
    /// Returns an error if the embedded file is malformed.
    pub fn embedded() -> Result<Self, QueryError> {
        Self::load(EMBEDDED_QUERIES)
    }

    /// Parse and validate a query file.
    ///
    /// # Errors
    /// Returns an error if a block is duplicated, empty, missing, unknown, or
    /// if statement text appears before the first header.
    pub fn load(source: &str) -> Result<Self, QueryError> {
        let mut blocks = parse_blocks(source)?;
        let mut take = |name: &str| {
            blocks
                .remove(name)
                .ok_or_else(|| QueryError::Missing(name.to_string()))
        };

        let queries = Self {
            users: UserQueries {
                create: take("users.create")?,
                by_email: take("users.by_email")?,
                update_password: take("users.update_password")?,
            },
            sessions: SessionQueries {
                lock_user: take("sessions.lock_user")?,
                purge_user: take("sessions.purge_user")?,
                create: take("sessions.create")?,
                user_by_token: take("sessions.user_by_token")?,
                delete: take("sessions.delete")?,
            },
            password_resets: PasswordResetQueries {
                create: take("password_resets.create")?,
                consume: take("password_resets.consume")?,
            },
            galleries: GalleryQueries {
                create: take("galleries.create")?,
                by_id: take("galleries.by_id")?,
                by_user_id: take("galleries.by_user_id")?,
                update: take("galleries.update")?,
                delete: take("galleries.delete")?,
            },
        };

        if let Some(name) = blocks.into_keys().next() {
            return Err(QueryError::Unknown(name));
        }

        Ok(queries)
    }
}

/// Split the source into `name -> statement` blocks.
fn parse_blocks(source: &str) -> Result<BTreeMap<String, String>, QueryError> {
    let header = Regex::new(r"^--\s*name:\s*([a-z_]+\.[a-z_]+)\s*$")
        .map_err(|err| QueryError::Pattern(err.to_string()))?;

    let mut blocks = BTreeMap::new();
    let mut current: Option<(String, String)> = None;

    for (index, line) in source.lines().enumerate() {
        let trimmed = line.trim();
        if let Some(captures) = header.captures(trimmed) {
            if let Some((name, body)) = current.take() {
                insert_block(&mut blocks, name, &body)?;
            }
            current = Some((captures[1].to_string(), String::new()));
            continue;
        }

        match current.as_mut() {
            Some((_, body)) => {
                body.push_str(line);
                body.push('\n');
            }
            None => {
                // Free-form comments and blank lines may precede the first block.
                if !trimmed.is_empty() && !trimmed.starts_with("--") {
                    return Err(QueryError::Orphan(index + 1));
                }
            }
        }
    }

    if let Some((name, body)) = current.take() {
        insert_block(&mut blocks, name, &body)?;
    }

    Ok(blocks)
}

fn insert_block(
    blocks: &mut BTreeMap<String, String>,
    name: String,
    body: &str,
) -> Result<(), QueryError> {
    let statement = body.trim();
    if statement.is_empty() {
        return Err(QueryError::Empty(name));
    }
    if blocks.contains_key(&name) {
        return Err(QueryError::Duplicate(name));
    }
    blocks.insert(name, statement.to_string());
    Ok(())
}
