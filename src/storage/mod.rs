//! Store seams. Handlers only talk to these traits; Postgres and in-memory
//! implementations live behind them.
//!
//! Every transaction, tag and salary method takes the owner email and filters on it.
//! A record owned by someone else behaves exactly like a missing one.

use async_trait::async_trait;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::{
    auth::repo_types::{NewUser, User},
    salary::repo_types::Salary,
    tags::repo_types::{NewTag, Tag},
    transactions::repo_types::{Transaction, TransactionInput, TransactionKind},
};

pub mod memory;

pub use memory::MemoryStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique key is already taken. Carries a client-facing message.
    #[error("{0}")]
    Duplicate(String),

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Backend(e.into())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Current UTC time cut to microseconds, the precision `TIMESTAMPTZ` keeps.
/// Records stamped with this read back exactly as they were returned on insert.
pub fn now_micros() -> OffsetDateTime {
    let now = OffsetDateTime::now_utc();
    now - Duration::nanoseconds(i64::from(now.nanosecond() % 1_000))
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;
    async fn insert(&self, user: NewUser) -> StoreResult<User>;
}

#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Newest first.
    async fn find_all(&self, owner: &str) -> StoreResult<Vec<Transaction>>;
    /// Newest first.
    async fn find_by_month(&self, owner: &str, month: &str) -> StoreResult<Vec<Transaction>>;
    /// The `limit` newest.
    async fn find_recent(&self, owner: &str, limit: i64) -> StoreResult<Vec<Transaction>>;
    async fn find_one(&self, owner: &str, id: Uuid) -> StoreResult<Option<Transaction>>;
    async fn insert(&self, owner: &str, input: TransactionInput) -> StoreResult<Transaction>;
    /// Returns the number of matched records (0 or 1).
    async fn update(&self, owner: &str, id: Uuid, input: TransactionInput) -> StoreResult<u64>;
    /// Returns the number of deleted records (0 or 1).
    async fn delete(&self, owner: &str, id: Uuid) -> StoreResult<u64>;
}

#[async_trait]
pub trait SalaryStore: Send + Sync {
    async fn insert(&self, owner: &str, month: &str, amount: i64) -> StoreResult<Salary>;
    async fn find_by_month(&self, owner: &str, month: &str) -> StoreResult<Option<Salary>>;
}

#[async_trait]
pub trait TagStore: Send + Sync {
    /// Oldest first.
    async fn find_by_category(&self, owner: &str, category: TransactionKind) -> StoreResult<Vec<Tag>>;
    async fn insert(&self, owner: &str, tag: NewTag) -> StoreResult<Tag>;
    /// Name and emoji only; the category is fixed at creation. Returns the matched count.
    async fn update(&self, owner: &str, id: Uuid, name: &str, emoji: &str) -> StoreResult<u64>;
    /// Returns the number of deleted tags (0 or 1).
    async fn delete(&self, owner: &str, id: Uuid) -> StoreResult<u64>;
}
