use anyhow::Result;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::info;

use super::{print_json, report, Runtime};

#[derive(Debug)]
pub enum Command {
    Request {
        email: String,
    },
    Consume {
        token: SecretString,
        password: SecretString,
    },
}

/// # Errors
/// Returns an error if the database is unreachable or the operation is refused.
pub async fn execute(runtime: &Runtime, command: Command) -> Result<()> {
    let services = runtime.services().await?;

    match command {
        Command::Request { email } => {
            let reset = services
                .resets
                .create(&email, runtime.auth.reset_ttl())
                .await
                .map_err(report)?;
            print_json(&json!({
                "account_id": reset.account_id,
                "token": reset.token.expose_secret(),
                "expires_at": reset.expires_at,
            }))
        }
        Command::Consume { token, password } => {
            let account = services
                .resets
                .consume(token.expose_secret())
                .await
                .map_err(report)?;
            services
                .users
                .update_password(account.id, &password)
                .await
                .map_err(report)?;
            // A new password ends every existing session.
            let ended = services
                .sessions
                .delete_all(account.id)
                .await
                .map_err(report)?;
            info!(account_id = %account.id, sessions_ended = ended, "password reset completed");
            print_json(&account)
        }
    }
}
