//! Maps parsed arguments to an [`Action`].

use crate::cli::actions::{galleries, password, reset, sessions, users, Action, Runtime};
use crate::cli::commands::{
    auth, database, ARG_EMAIL, ARG_HASH, ARG_ID, ARG_PASSWORD, ARG_TITLE, ARG_TOKEN,
};
use anyhow::{anyhow, Context, Result};
use clap::ArgMatches;
use secrecy::SecretString;
use uuid::Uuid;

fn string(matches: &ArgMatches, id: &str) -> Result<String> {
    matches
        .get_one::<String>(id)
        .cloned()
        .with_context(|| format!("missing required argument: --{id}"))
}

fn secret(matches: &ArgMatches, id: &str) -> Result<SecretString> {
    string(matches, id).map(SecretString::from)
}

fn uuid(matches: &ArgMatches, id: &str) -> Result<Uuid> {
    matches
        .get_one::<Uuid>(id)
        .copied()
        .with_context(|| format!("missing required argument: --{id}"))
}

fn runtime(matches: &ArgMatches) -> Result<Runtime> {
    Ok(Runtime {
        database: database::Options::parse(matches)?,
        auth: auth::Options::parse(matches)?.config(),
    })
}

fn users_command(matches: &ArgMatches) -> Result<users::Command> {
    match matches.subcommand() {
        Some(("create", sub)) => Ok(users::Command::Create {
            email: string(sub, ARG_EMAIL)?,
            password: secret(sub, ARG_PASSWORD)?,
        }),
        Some(("authenticate", sub)) => Ok(users::Command::Authenticate {
            email: string(sub, ARG_EMAIL)?,
            password: secret(sub, ARG_PASSWORD)?,
        }),
        _ => Err(anyhow!("unknown users command")),
    }
}

fn sessions_command(matches: &ArgMatches) -> Result<sessions::Command> {
    match matches.subcommand() {
        Some(("create", sub)) => Ok(sessions::Command::Create {
            email: string(sub, ARG_EMAIL)?,
            password: secret(sub, ARG_PASSWORD)?,
        }),
        Some(("resolve", sub)) => Ok(sessions::Command::Resolve {
            token: secret(sub, ARG_TOKEN)?,
        }),
        Some(("delete", sub)) => Ok(sessions::Command::Delete {
            token: secret(sub, ARG_TOKEN)?,
        }),
        Some(("delete-all", sub)) => Ok(sessions::Command::DeleteAll {
            email: string(sub, ARG_EMAIL)?,
        }),
        _ => Err(anyhow!("unknown sessions command")),
    }
}

fn reset_command(matches: &ArgMatches) -> Result<reset::Command> {
    match matches.subcommand() {
        Some(("request", sub)) => Ok(reset::Command::Request {
            email: string(sub, ARG_EMAIL)?,
        }),
        Some(("consume", sub)) => Ok(reset::Command::Consume {
            token: secret(sub, ARG_TOKEN)?,
            password: secret(sub, ARG_PASSWORD)?,
        }),
        _ => Err(anyhow!("unknown reset command")),
    }
}

fn galleries_command(matches: &ArgMatches) -> Result<galleries::Command> {
    match matches.subcommand() {
        Some(("create", sub)) => Ok(galleries::Command::Create {
            email: string(sub, ARG_EMAIL)?,
            title: string(sub, ARG_TITLE)?,
        }),
        Some(("list", sub)) => Ok(galleries::Command::List {
            email: string(sub, ARG_EMAIL)?,
        }),
        Some(("show", sub)) => Ok(galleries::Command::Show {
            id: uuid(sub, ARG_ID)?,
        }),
        Some(("rename", sub)) => Ok(galleries::Command::Rename {
            id: uuid(sub, ARG_ID)?,
            title: string(sub, ARG_TITLE)?,
        }),
        Some(("delete", sub)) => Ok(galleries::Command::Delete {
            id: uuid(sub, ARG_ID)?,
        }),
        _ => Err(anyhow!("unknown galleries command")),
    }
}

/// Map validated CLI matches to an action.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &ArgMatches) -> Result<Action> {
    match matches.subcommand() {
        Some(("hash", sub)) => Ok(Action::Hash(password::HashArgs {
            password: secret(sub, ARG_PASSWORD)?,
        })),
        Some(("compare", sub)) => Ok(Action::Compare(password::CompareArgs {
            password: secret(sub, ARG_PASSWORD)?,
            hash: string(sub, ARG_HASH)?,
        })),
        Some(("users", sub)) => Ok(Action::Users(runtime(matches)?, users_command(sub)?)),
        Some(("sessions", sub)) => Ok(Action::Sessions(
            runtime(matches)?,
            sessions_command(sub)?,
        )),
        Some(("reset", sub)) => Ok(Action::Reset(runtime(matches)?, reset_command(sub)?)),
        Some(("galleries", sub)) => Ok(Action::Galleries(
            runtime(matches)?,
            galleries_command(sub)?,
        )),
        _ => Err(anyhow!("no command given, see --help")),
    }
}
