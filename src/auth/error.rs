use thiserror::Error;

/// Failure kinds reported by the account and token services.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("email address is already in use")]
    EmailTaken,
    #[error("account not found")]
    AccountNotFound,
    #[error("password does not match")]
    CredentialMismatch,
    #[error("token not found")]
    TokenNotFound,
    #[error("token expired")]
    TokenExpired,
    #[error("internal error: {0:#}")]
    Internal(#[from] anyhow::Error),
}

impl AuthError {
    /// Message safe to show to the person who made the request.
    #[must_use]
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::EmailTaken => "That email address is already in use.",
            Self::AccountNotFound | Self::CredentialMismatch => "Invalid email or password.",
            Self::TokenNotFound | Self::TokenExpired => {
                "The reset link is invalid or has expired."
            }
            Self::Internal(_) => "Something went wrong. Please try again later.",
        }
    }
}

impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        Self::Internal(err.into())
    }
}
