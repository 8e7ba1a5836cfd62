use async_trait::async_trait;

use crate::db::{unique_violation, PgStore};
use crate::salary::repo_types::Salary;
use crate::storage::{SalaryStore, StoreResult};

#[async_trait]
impl SalaryStore for PgStore {
    async fn insert(&self, owner: &str, month: &str, amount: i64) -> StoreResult<Salary> {
        let record = Salary::new(owner, month, amount);
        sqlx::query(
            r#"
            INSERT INTO salaries (id, owner_email, month, amount, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(record.id)
        .bind(&record.owner)
        .bind(&record.month)
        .bind(record.amount)
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| unique_violation(e, &format!("Salary for {month} already recorded")))?;
        Ok(record)
    }

    async fn find_by_month(&self, owner: &str, month: &str) -> StoreResult<Option<Salary>> {
        let salary = sqlx::query_as::<_, Salary>(
            r#"
            SELECT id, owner_email, month, amount, created_at
            FROM salaries
            WHERE owner_email = $1 AND month = $2
            "#,
        )
        .bind(owner)
        .bind(month)
        .fetch_optional(&self.pool)
        .await?;
        Ok(salary)
    }
}
