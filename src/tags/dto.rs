use serde::Deserialize;

use crate::transactions::repo_types::TransactionKind;

#[derive(Debug, Clone, Deserialize)]
pub struct TagRequest {
    pub name: String,
    #[serde(default)]
    pub emoji: Option<String>,
    pub category: TransactionKind,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TagUpdateRequest {
    pub name: String,
    #[serde(default)]
    pub emoji: Option<String>,
}
