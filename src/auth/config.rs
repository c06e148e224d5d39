//! Service configuration.

use std::str::FromStr;
use std::time::Duration;

use super::password::PasswordParams;
use super::token::MIN_BYTES_PER_TOKEN;

const DEFAULT_RESET_TTL: Duration = Duration::from_secs(30 * 60);

/// How many sessions an account may hold at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPolicy {
    /// Signing in replaces the account's previous session.
    #[default]
    Single,
    /// Every sign-in adds a session; use `delete_all` to sign out everywhere.
    Multiple,
}

impl FromStr for SessionPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "single" => Ok(Self::Single),
            "multiple" => Ok(Self::Multiple),
            _ => Err(format!("invalid session policy: {value}")),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AuthConfig {
    bytes_per_token: usize,
    reset_ttl: Duration,
    session_policy: SessionPolicy,
    password_params: PasswordParams,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthConfig {
    #[must_use]
    pub fn new() -> Self {
        Self {
            bytes_per_token: MIN_BYTES_PER_TOKEN,
            reset_ttl: DEFAULT_RESET_TTL,
            session_policy: SessionPolicy::default(),
            password_params: PasswordParams::default(),
        }
    }

    /// Token length in random bytes; values below the minimum are raised to it.
    #[must_use]
    pub fn with_bytes_per_token(mut self, bytes: usize) -> Self {
        self.bytes_per_token = bytes.max(MIN_BYTES_PER_TOKEN);
        self
    }

    #[must_use]
    pub fn with_reset_ttl(mut self, ttl: Duration) -> Self {
        self.reset_ttl = ttl;
        self
    }

    #[must_use]
    pub fn with_session_policy(mut self, policy: SessionPolicy) -> Self {
        self.session_policy = policy;
        self
    }

    #[must_use]
    pub fn with_password_params(mut self, params: PasswordParams) -> Self {
        self.password_params = params;
        self
    }

    #[must_use]
    pub fn bytes_per_token(&self) -> usize {
        self.bytes_per_token
    }

    /// Default lifetime of a password reset token.
    #[must_use]
    pub fn reset_ttl(&self) -> Duration {
        self.reset_ttl
    }

    #[must_use]
    pub fn session_policy(&self) -> SessionPolicy {
        self.session_policy
    }

    #[must_use]
    pub fn password_params(&self) -> PasswordParams {
        self.password_params
    }
}
