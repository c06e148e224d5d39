use crate::cli::actions::{galleries, password, reset, sessions, users, Action};
use anyhow::Result;

/// Execute the provided action.
// This is the single dispatch point for all CLI actions.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action) -> Result<()> {
    match action {
        Action::Hash(args) => password::hash(&args),
        Action::Compare(args) => password::compare(&args),
        Action::Users(runtime, command) => users::execute(&runtime, command).await,
        Action::Sessions(runtime, command) => sessions::execute(&runtime, command).await,
        Action::Reset(runtime, command) => reset::execute(&runtime, command).await,
        Action::Galleries(runtime, command) => galleries::execute(&runtime, command).await,
    }
}
