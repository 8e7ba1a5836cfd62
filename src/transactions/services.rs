use tracing::{info, warn};
use uuid::Uuid;

use super::dto::TransactionRequest;
use super::repo_types::{Transaction, TransactionInput, MAX_AMOUNT};
use super::summary::{summarize, Summary};
use crate::error::AppError;
use crate::storage::TransactionStore;

pub(crate) const MAX_RECENT: i64 = 100;

/// Ids arrive as path strings; anything that is not a UUID never reaches the store.
pub fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::InvalidInput("Invalid transaction id".into()))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn validate(req: TransactionRequest) -> Result<TransactionInput, AppError> {
    let title = req.title.trim().to_string();
    if title.is_empty() {
        return Err(AppError::InvalidInput("Title is required".into()));
    }
    let month = req.month.trim().to_string();
    if month.is_empty() {
        return Err(AppError::InvalidInput("Month is required".into()));
    }
    if !req.amount.is_valid() {
        return Err(AppError::InvalidInput(format!(
            "Amount must be a number between 0 and {MAX_AMOUNT:e}"
        )));
    }
    Ok(TransactionInput {
        kind: req.kind,
        title,
        amount: req.amount.normalized(),
        tag: non_blank(req.tag),
        payment_method: req.payment_method.unwrap_or_default(),
        description: non_blank(req.description),
        month,
    })
}

pub fn require_month(month: Option<String>) -> Result<String, AppError> {
    non_blank(month).ok_or_else(|| AppError::InvalidInput("Query parameter `month` is required".into()))
}

pub async fn add(
    store: &dyn TransactionStore,
    owner: &str,
    req: TransactionRequest,
) -> Result<Transaction, AppError> {
    let input = validate(req)?;
    let created = store.insert(owner, input).await?;
    info!(owner = %owner, id = %created.id, kind = %created.kind, "transaction added");
    Ok(created)
}

pub async fn get(store: &dyn TransactionStore, owner: &str, id: Uuid) -> Result<Transaction, AppError> {
    store
        .find_one(owner, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Transaction".into()))
}

pub async fn recent(
    store: &dyn TransactionStore,
    owner: &str,
    limit: i64,
) -> Result<Vec<Transaction>, AppError> {
    if !(1..=MAX_RECENT).contains(&limit) {
        return Err(AppError::InvalidInput(format!(
            "limit must be between 1 and {MAX_RECENT}"
        )));
    }
    Ok(store.find_recent(owner, limit).await?)
}

pub async fn update(
    store: &dyn TransactionStore,
    owner: &str,
    id: Uuid,
    req: TransactionRequest,
) -> Result<(), AppError> {
    let input = validate(req)?;
    match store.update(owner, id, input).await? {
        1 => {
            info!(owner = %owner, id = %id, "transaction updated");
            Ok(())
        }
        matched => {
            warn!(owner = %owner, id = %id, matched, "update matched no single transaction");
            Err(AppError::NotFound("Transaction".into()))
        }
    }
}

pub async fn delete(store: &dyn TransactionStore, owner: &str, id: Uuid) -> Result<(), AppError> {
    match store.delete(owner, id).await? {
        1 => {
            info!(owner = %owner, id = %id, "transaction deleted");
            Ok(())
        }
        deleted => {
            warn!(owner = %owner, id = %id, deleted, "delete removed no single transaction");
            Err(AppError::NotFound("Transaction".into()))
        }
    }
}

/// The owner's transactions, newest first, optionally narrowed to one month.
pub async fn list(
    store: &dyn TransactionStore,
    owner: &str,
    month: Option<String>,
) -> Result<Vec<Transaction>, AppError> {
    Ok(match non_blank(month) {
        Some(month) => store.find_by_month(owner, &month).await?,
        None => store.find_all(owner).await?,
    })
}

pub async fn summary(
    store: &dyn TransactionStore,
    owner: &str,
    month: Option<String>,
) -> Result<Summary, AppError> {
    let transactions = list(store, owner, month).await?;
    Ok(summarize(&transactions))
}
