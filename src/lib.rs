//! # Lenslocked (accounts, sessions and password resets)
//!
//! `lenslocked` is the account core of the lenslocked photo-gallery service.
//! It stores salted Argon2id password hashes, issues opaque session and
//! password-reset tokens, and keeps the gallery records owned by accounts.
//!
//! ## Tokens at rest
//!
//! Raw tokens are minted from the OS random source, returned to the caller
//! exactly once and never persisted. The database only stores the SHA-256
//! digest of each token; lookups hash the presented value first.
//!
//! - **Sessions:** one active session per account by default. Signing in again
//!   replaces the previous session; `SessionService::delete_all` signs an
//!   account out everywhere.
//! - **Password resets:** at most one pending reset per account. A reset token
//!   is single-use and expires after the configured duration; expired tokens
//!   are discarded on their first lookup.
//!
//! ## Queries
//!
//! All SQL lives in `sql/queries.sql`. It is parsed and validated once at
//! start-up (`db::Queries::embedded`) and shared by every service.

pub mod auth;
pub mod cli;
pub mod db;
pub mod gallery;

#[cfg(test)]
pub(crate) mod test_support;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};
