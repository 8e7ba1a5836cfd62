use serde::{Deserialize, Serialize};

use super::repo_types::{Amount, PaymentMethod, TransactionKind};

/// Body for both create and full update. No owner field: it comes from the token.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionRequest {
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub title: String,
    pub amount: Amount,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>, // null or absent means Cash
    #[serde(default)]
    pub description: Option<String>,
    pub month: String,
}

#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    pub month: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    #[serde(default = "default_recent_limit")]
    pub limit: i64,
}
fn default_recent_limit() -> i64 { 4 }

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
