use anyhow::Result;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;

use super::{print_json, report, Runtime};

#[derive(Debug)]
pub enum Command {
    Create {
        email: String,
        password: SecretString,
    },
    Resolve {
        token: SecretString,
    },
    Delete {
        token: SecretString,
    },
    DeleteAll {
        email: String,
    },
}

/// # Errors
/// Returns an error if the database is unreachable or the operation is refused.
pub async fn execute(runtime: &Runtime, command: Command) -> Result<()> {
    let services = runtime.services().await?;

    match command {
        Command::Create { email, password } => {
            let account = services
                .users
                .authenticate(&email, &password)
                .await
                .map_err(report)?;
            let session = services.sessions.create(account.id).await.map_err(report)?;
            print_json(&json!({
                "session_id": session.id,
                "account_id": session.account_id,
                "token": session.token.expose_secret(),
            }))
        }
        Command::Resolve { token } => {
            let account = services
                .sessions
                .resolve(token.expose_secret())
                .await
                .map_err(report)?;
            print_json(&account)
        }
        Command::Delete { token } => {
            services
                .sessions
                .delete(token.expose_secret())
                .await
                .map_err(report)?;
            println!("Signed out");
            Ok(())
        }
        Command::DeleteAll { email } => {
            let account = services.users.by_email(&email).await.map_err(report)?;
            let ended = services
                .sessions
                .delete_all(account.id)
                .await
                .map_err(report)?;
            print_json(&json!({ "account_id": account.id, "sessions_ended": ended }))
        }
    }
}
