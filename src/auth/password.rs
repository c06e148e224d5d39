//! Argon2id password hashing.

use anyhow::{anyhow, Context, Result};
use argon2::{
    password_hash::{self, rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use secrecy::{ExposeSecret, SecretString};

/// Argon2id cost parameters used for new hashes.
///
/// Existing hashes carry their own parameters, so changing these only
/// affects passwords hashed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordParams {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for PasswordParams {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

impl PasswordParams {
    fn hasher(self) -> Result<Argon2<'static>> {
        let params = Params::new(self.memory_kib, self.iterations, self.parallelism, None)
            .map_err(|err| anyhow!("invalid argon2 parameters: {err}"))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

/// Hash a password into a PHC string with a fresh random salt.
///
/// # Errors
/// Returns an error if the parameters are invalid or hashing fails.
pub fn hash_password(password: &SecretString, params: PasswordParams) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = params
        .hasher()?
        .hash_password(password.expose_secret().as_bytes(), &salt)
        .map_err(|err| anyhow!("failed to hash password: {err}"))?;
    Ok(hash.to_string())
}

/// Check a password against a stored PHC string.
///
/// Returns `Ok(false)` on mismatch; errors are reserved for malformed hashes.
///
/// # Errors
/// Returns an error if `hash` is not a valid PHC string.
pub fn verify_password(password: &SecretString, hash: &str) -> Result<bool> {
    let parsed =
        PasswordHash::new(hash).map_err(|err| anyhow!("invalid stored password hash: {err}"))?;
    match Argon2::default().verify_password(password.expose_secret().as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(err) => Err(anyhow!("failed to verify password: {err}")),
    }
}

/// [`hash_password`] on the blocking pool.
pub(super) async fn hash_password_blocking(
    password: &SecretString,
    params: PasswordParams,
) -> Result<String> {
    let password = SecretString::from(password.expose_secret().to_owned());
    tokio::task::spawn_blocking(move || hash_password(&password, params))
        .await
        .context("password hashing task failed")?
}

/// [`verify_password`] on the blocking pool.
pub(super) async fn verify_password_blocking(password: &SecretString, hash: &str) -> Result<bool> {
    let password = SecretString::from(password.expose_secret().to_owned());
    let hash = hash.to_owned();
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .context("password verification task failed")?
}
