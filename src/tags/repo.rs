use async_trait::async_trait;
use uuid::Uuid;

use crate::db::{unique_violation, PgStore};
use crate::storage::{StoreResult, TagStore};
use crate::tags::repo_types::{NewTag, Tag, TagRow};
use crate::transactions::repo_types::TransactionKind;

#[async_trait]
impl TagStore for PgStore {
    async fn find_by_category(&self, owner: &str, category: TransactionKind) -> StoreResult<Vec<Tag>> {
        let rows = sqlx::query_as::<_, TagRow>(
            r#"
            SELECT id, name, emoji, category, owner_email, created_at
            FROM tags
            WHERE owner_email = $1 AND category = $2
            ORDER BY created_at ASC
            "#,
        )
        .bind(owner)
        .bind(category.as_str())
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter()
            .map(|r| Tag::try_from(r).map_err(Into::into))
            .collect()
    }

    async fn insert(&self, owner: &str, tag: NewTag) -> StoreResult<Tag> {
        let record = Tag::new(owner, tag);
        sqlx::query(
            r#"
            INSERT INTO tags (id, name, emoji, category, owner_email, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(record.id)
        .bind(&record.name)
        .bind(&record.emoji)
        .bind(record.category.as_str())
        .bind(&record.owner)
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| unique_violation(e, &format!("Tag {} already exists", record.name)))?;
        Ok(record)
    }

    async fn update(&self, owner: &str, id: Uuid, name: &str, emoji: &str) -> StoreResult<u64> {
        let result = sqlx::query(
            "UPDATE tags SET name = $3, emoji = $4 WHERE id = $1 AND owner_email = $2",
        )
        .bind(id)
        .bind(owner)
        .bind(name)
        .bind(emoji)
        .execute(&self.pool)
        .await
        .map_err(|e| unique_violation(e, &format!("Tag {name} already exists")))?;
        Ok(result.rows_affected())
    }

    async fn delete(&self, owner: &str, id: Uuid) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM tags WHERE id = $1 AND owner_email = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
