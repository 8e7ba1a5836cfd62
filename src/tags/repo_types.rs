use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::storage::now_micros;
use crate::transactions::repo_types::TransactionKind;

pub const DEFAULT_EMOJI: &str = "🏷️";

/// A user-defined label offered when entering transactions of one kind.
/// Transactions refer to tags by name, so removing a tag leaves them as they are.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
    pub emoji: String,
    pub category: TransactionKind,
    pub owner: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTag {
    pub name: String,
    pub emoji: String,
    pub category: TransactionKind,
}

impl Tag {
    pub fn new(owner: &str, tag: NewTag) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: tag.name,
            emoji: tag.emoji,
            category: tag.category,
            owner: owner.to_string(),
            created_at: now_micros(),
        }
    }
}

#[derive(Debug, FromRow)]
pub struct TagRow {
    pub id: Uuid,
    pub name: String,
    pub emoji: String,
    pub category: String,
    pub owner_email: String,
    pub created_at: OffsetDateTime,
}

impl TryFrom<TagRow> for Tag {
    type Error = anyhow::Error;

    fn try_from(r: TagRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: r.id,
            name: r.name,
            emoji: r.emoji,
            category: r.category.parse()?,
            owner: r.owner_email,
            created_at: r.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_converts_category() {
        let row = TagRow {
            id: Uuid::new_v4(),
            name: "Rent".into(),
            emoji: "🏠".into(),
            category: "Expense".into(),
            owner_email: "a@x.com".into(),
            created_at: now_micros(),
        };
        let tag = Tag::try_from(row).unwrap();
        assert_eq!(tag.category, TransactionKind::Expense);
        assert_eq!(tag.owner, "a@x.com");
    }

    #[test]
    fn row_with_unknown_category_is_rejected() {
        let row = TagRow {
            id: Uuid::new_v4(),
            name: "x".into(),
            emoji: DEFAULT_EMOJI.into(),
            category: "Savings".into(),
            owner_email: "a@x.com".into(),
            created_at: now_micros(),
        };
        assert!(Tag::try_from(row).is_err());
    }
}
