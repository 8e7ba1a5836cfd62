use async_trait::async_trait;
use uuid::Uuid;

use crate::db::PgStore;
use crate::storage::{StoreResult, TransactionStore};
use crate::transactions::repo_types::{Transaction, TransactionInput, TransactionRow};

const COLUMNS: &str = "id, kind, title, amount, tag, payment_method, description, month, owner_email, created_at";

fn into_domain(rows: Vec<TransactionRow>) -> StoreResult<Vec<Transaction>> {
    rows.into_iter()
        .map(|r| Transaction::try_from(r).map_err(Into::into))
        .collect()
}

#[async_trait]
impl TransactionStore for PgStore {
    async fn find_all(&self, owner: &str) -> StoreResult<Vec<Transaction>> {
        let rows = sqlx::query_as::<_, TransactionRow>(&format!(
            "SELECT {COLUMNS} FROM transactions WHERE owner_email = $1 ORDER BY created_at DESC"
        ))
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;
        into_domain(rows)
    }

    async fn find_by_month(&self, owner: &str, month: &str) -> StoreResult<Vec<Transaction>> {
        let rows = sqlx::query_as::<_, TransactionRow>(&format!(
            "SELECT {COLUMNS} FROM transactions
             WHERE owner_email = $1 AND month = $2
             ORDER BY created_at DESC"
        ))
        .bind(owner)
        .bind(month)
        .fetch_all(&self.pool)
        .await?;
        into_domain(rows)
    }

    async fn find_recent(&self, owner: &str, limit: i64) -> StoreResult<Vec<Transaction>> {
        let rows = sqlx::query_as::<_, TransactionRow>(&format!(
            "SELECT {COLUMNS} FROM transactions
             WHERE owner_email = $1
             ORDER BY created_at DESC
             LIMIT $2"
        ))
        .bind(owner)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        into_domain(rows)
    }

    async fn find_one(&self, owner: &str, id: Uuid) -> StoreResult<Option<Transaction>> {
        let row = sqlx::query_as::<_, TransactionRow>(&format!(
            "SELECT {COLUMNS} FROM transactions WHERE id = $1 AND owner_email = $2"
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Transaction::try_from).transpose()?)
    }

    async fn insert(&self, owner: &str, input: TransactionInput) -> StoreResult<Transaction> {
        let record = Transaction::new(owner, input);
        sqlx::query(
            r#"
            INSERT INTO transactions
                (id, kind, title, amount, tag, payment_method, description, month, owner_email, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(record.id)
        .bind(record.kind.as_str())
        .bind(&record.title)
        .bind(record.amount.as_f64())
        .bind(&record.tag)
        .bind(record.payment_method.as_str())
        .bind(&record.description)
        .bind(&record.month)
        .bind(&record.owner)
        .bind(record.created_at)
        .execute(&self.pool)
        .await?;
        Ok(record)
    }

    async fn update(&self, owner: &str, id: Uuid, input: TransactionInput) -> StoreResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE transactions
               SET kind = $3, title = $4, amount = $5, tag = $6,
                   payment_method = $7, description = $8, month = $9
             WHERE id = $1 AND owner_email = $2
            "#,
        )
        .bind(id)
        .bind(owner)
        .bind(input.kind.as_str())
        .bind(&input.title)
        .bind(input.amount.as_f64())
        .bind(&input.tag)
        .bind(input.payment_method.as_str())
        .bind(&input.description)
        .bind(&input.month)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn delete(&self, owner: &str, id: Uuid) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM transactions WHERE id = $1 AND owner_email = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
