use anyhow::Result;
use uuid::Uuid;

use super::{print_json, report, Runtime};
use crate::gallery::{Gallery, GalleryError};

#[derive(Debug)]
pub enum Command {
    Create { email: String, title: String },
    List { email: String },
    Show { id: Uuid },
    Rename { id: Uuid, title: String },
    Delete { id: Uuid },
}

fn gallery_error(err: GalleryError) -> anyhow::Error {
    match err {
        GalleryError::NotFound => anyhow::anyhow!("Gallery not found."),
        GalleryError::Internal(err) => err,
    }
}

/// # Errors
/// Returns an error if the database is unreachable or the gallery does not exist.
pub async fn execute(runtime: &Runtime, command: Command) -> Result<()> {
    let services = runtime.services().await?;
    let galleries = &services.galleries;

    match command {
        Command::Create { email, title } => {
            let account = services.users.by_email(&email).await.map_err(report)?;
            let gallery = galleries
                .create(&title, account.id)
                .await
                .map_err(gallery_error)?;
            print_json(&gallery)
        }
        Command::List { email } => {
            let account = services.users.by_email(&email).await.map_err(report)?;
            let list = galleries
                .by_user_id(account.id)
                .await
                .map_err(gallery_error)?;
            print_json(&list)
        }
        Command::Show { id } => {
            let gallery = galleries.by_id(id).await.map_err(gallery_error)?;
            print_json(&gallery)
        }
        Command::Rename { id, title } => {
            let gallery = galleries.by_id(id).await.map_err(gallery_error)?;
            let gallery = Gallery {
                title: title.trim().to_string(),
                ..gallery
            };
            galleries.update(&gallery).await.map_err(gallery_error)?;
            print_json(&gallery)
        }
        Command::Delete { id } => {
            galleries.delete(id).await.map_err(gallery_error)?;
            println!("Deleted gallery {id}");
            Ok(())
        }
    }
}
