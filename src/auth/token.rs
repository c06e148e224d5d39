//! Opaque token minting and hashing.
//!
//! A raw token is only ever handed to the caller; the database stores the
//! [`TokenHash`] and every lookup hashes the presented value first.

use anyhow::{bail, Context, Result};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::{rngs::OsRng, RngCore};
use secrecy::SecretString;
use sha2::{Digest, Sha256};
use std::fmt;

/// Smallest number of random bytes accepted for a token.
pub const MIN_BYTES_PER_TOKEN: usize = 32;

/// Create a new URL-safe token from `byte_len` random bytes.
///
/// # Errors
/// Returns an error if `byte_len` is below [`MIN_BYTES_PER_TOKEN`] or the OS
/// random source fails.
pub fn mint_token(byte_len: usize) -> Result<SecretString> {
    if byte_len < MIN_BYTES_PER_TOKEN {
        bail!("token length {byte_len} is below the minimum of {MIN_BYTES_PER_TOKEN} bytes");
    }
    let mut bytes = vec![0u8; byte_len];
    OsRng
        .try_fill_bytes(&mut bytes)
        .context("failed to generate token")?;
    Ok(SecretString::from(URL_SAFE_NO_PAD.encode(bytes)))
}

/// SHA-256 digest of a raw token.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenHash([u8; 32]);

impl TokenHash {
    #[must_use]
    pub fn of(token: &str) -> Self {
        let digest = Sha256::digest(token.as_bytes());
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&digest);
        Self(bytes)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for TokenHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TokenHash({})", URL_SAFE_NO_PAD.encode(self.0))
    }
}
