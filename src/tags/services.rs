use tracing::{info, warn};
use uuid::Uuid;

use super::dto::{TagRequest, TagUpdateRequest};
use super::repo_types::{NewTag, Tag, DEFAULT_EMOJI};
use crate::error::AppError;
use crate::storage::TagStore;
use crate::transactions::repo_types::TransactionKind;

pub fn parse_tag_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::InvalidInput("Invalid tag id".into()))
}

pub fn parse_category(raw: &str) -> Result<TransactionKind, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::InvalidInput(format!("Unknown tag category {:?}", raw.trim())))
}

fn clean_name(name: &str) -> Result<String, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::InvalidInput("Tag name is required".into()));
    }
    Ok(name.to_string())
}

fn clean_emoji(emoji: Option<String>) -> String {
    emoji
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| DEFAULT_EMOJI.to_string())
}

pub async fn create(store: &dyn TagStore, owner: &str, req: TagRequest) -> Result<Tag, AppError> {
    let tag = NewTag {
        name: clean_name(&req.name)?,
        emoji: clean_emoji(req.emoji),
        category: req.category,
    };
    let created = store.insert(owner, tag).await?;
    info!(owner = %owner, id = %created.id, category = %created.category, "tag added");
    Ok(created)
}

pub async fn list(store: &dyn TagStore, owner: &str, category: &str) -> Result<Vec<Tag>, AppError> {
    let category = parse_category(category)?;
    Ok(store.find_by_category(owner, category).await?)
}

pub async fn update(
    store: &dyn TagStore,
    owner: &str,
    id: Uuid,
    req: TagUpdateRequest,
) -> Result<(), AppError> {
    let name = clean_name(&req.name)?;
    let emoji = clean_emoji(req.emoji);
    match store.update(owner, id, &name, &emoji).await? {
        1 => {
            info!(owner = %owner, id = %id, "tag updated");
            Ok(())
        }
        matched => {
            warn!(owner = %owner, id = %id, matched, "update matched no single tag");
            Err(AppError::NotFound("Tag".into()))
        }
    }
}

pub async fn delete(store: &dyn TagStore, owner: &str, id: Uuid) -> Result<(), AppError> {
    match store.delete(owner, id).await? {
        1 => {
            info!(owner = %owner, id = %id, "tag deleted");
            Ok(())
        }
        deleted => {
            warn!(owner = %owner, id = %id, deleted, "delete removed no single tag");
            Err(AppError::NotFound("Tag".into()))
        }
    }
}
