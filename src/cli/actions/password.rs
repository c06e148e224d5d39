use anyhow::{Context, Result};
use secrecy::SecretString;

use crate::auth::{
    password::{hash_password, verify_password},
    PasswordParams,
};

#[derive(Debug)]
pub struct HashArgs {
    pub password: SecretString,
}

#[derive(Debug)]
pub struct CompareArgs {
    pub password: SecretString,
    pub hash: String,
}

/// Print the Argon2id hash of a password.
/// # Errors
/// Returns an error if hashing fails.
pub fn hash(args: &HashArgs) -> Result<()> {
    let hash = hash_password(&args.password, PasswordParams::default())
        .context("failed to hash password")?;
    println!("{hash}");
    Ok(())
}

/// Report whether a password matches a hash.
/// # Errors
/// Returns an error if the hash is malformed.
pub fn compare(args: &CompareArgs) -> Result<()> {
    if verify_password(&args.password, &args.hash)? {
        println!("Password is correct!");
    } else {
        println!("Password is invalid: {}", args.hash);
    }
    Ok(())
}
