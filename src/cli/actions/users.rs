use anyhow::Result;
use secrecy::SecretString;

use super::{print_json, report, Runtime};

#[derive(Debug)]
pub enum Command {
    Create {
        email: String,
        password: SecretString,
    },
    Authenticate {
        email: String,
        password: SecretString,
    },
}

/// # Errors
/// Returns an error if the database is unreachable or the operation is refused.
pub async fn execute(runtime: &Runtime, command: Command) -> Result<()> {
    let services = runtime.services().await?;

    let account = match command {
        Command::Create { email, password } => services
            .users
            .create(&email, &password)
            .await
            .map_err(report)?,
        Command::Authenticate { email, password } => services
            .users
            .authenticate(&email, &password)
            .await
            .map_err(report)?,
    };

    print_json(&account)
}
