use clap::{Arg, ArgMatches, Command};
use std::time::Duration;

use crate::auth::{AuthConfig, SessionPolicy};

pub const ARG_BYTES_PER_TOKEN: &str = "bytes-per-token";
pub const ARG_RESET_TTL_SECONDS: &str = "reset-ttl-seconds";
pub const ARG_SESSION_POLICY: &str = "session-policy";

#[derive(Debug, Clone)]
pub struct Options {
    pub bytes_per_token: usize,
    pub reset_ttl_seconds: u64,
    pub session_policy: SessionPolicy,
}

impl Options {
    /// Parse token arguments from matches, falling back to the library defaults.
    ///
    /// # Errors
    /// Returns an error if the session policy is not recognised.
    pub fn parse(matches: &ArgMatches) -> anyhow::Result<Self> {
        let defaults = AuthConfig::new();
        let session_policy = match matches.get_one::<String>(ARG_SESSION_POLICY) {
            Some(policy) => policy.parse::<SessionPolicy>().map_err(anyhow::Error::msg)?,
            None => defaults.session_policy(),
        };

        Ok(Self {
            bytes_per_token: matches
                .get_one::<usize>(ARG_BYTES_PER_TOKEN)
                .copied()
                .unwrap_or(defaults.bytes_per_token()),
            reset_ttl_seconds: matches
                .get_one::<u64>(ARG_RESET_TTL_SECONDS)
                .copied()
                .unwrap_or(defaults.reset_ttl().as_secs()),
            session_policy,
        })
    }

    #[must_use]
    pub fn config(&self) -> AuthConfig {
        AuthConfig::new()
            .with_bytes_per_token(self.bytes_per_token)
            .with_reset_ttl(Duration::from_secs(self.reset_ttl_seconds))
            .with_session_policy(self.session_policy)
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_BYTES_PER_TOKEN)
                .long(ARG_BYTES_PER_TOKEN)
                .help("Random bytes per session and reset token (minimum 32)")
                .env("LENSLOCKED_BYTES_PER_TOKEN")
                .global(true)
                .default_value("32")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new(ARG_RESET_TTL_SECONDS)
                .long(ARG_RESET_TTL_SECONDS)
                .help("Password reset token TTL in seconds")
                .env("LENSLOCKED_RESET_TTL_SECONDS")
                .global(true)
                .default_value("1800")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new(ARG_SESSION_POLICY)
                .long(ARG_SESSION_POLICY)
                .help("Whether signing in replaces the previous session (single) or adds one (multiple)")
                .env("LENSLOCKED_SESSION_POLICY")
                .global(true)
                .default_value("single")
                .value_parser(["single", "multiple"]),
        )
}
