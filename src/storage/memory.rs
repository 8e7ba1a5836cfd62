use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{now_micros, SalaryStore, StoreError, StoreResult, TagStore, TransactionStore, UserStore};
use crate::{
    auth::repo_types::{NewUser, User},
    salary::repo_types::Salary,
    tags::repo_types::{NewTag, Tag},
    transactions::repo_types::{Transaction, TransactionInput, TransactionKind},
};

/// Process-local store used when no `DATABASE_URL` is configured, and by tests.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    users: HashMap<String, User>,
    // Insertion order; iterating in reverse gives newest first.
    transactions: Vec<Transaction>,
    salaries: Vec<Salary>,
    tags: Vec<Tag>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first<'a>(
    rows: &'a [Transaction],
    owner: &'a str,
) -> impl Iterator<Item = &'a Transaction> + 'a {
    rows.iter().rev().filter(move |t| t.owner == owner)
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self.inner.read().await.users.get(email).cloned())
    }

    async fn insert(&self, user: NewUser) -> StoreResult<User> {
        let mut inner = self.inner.write().await;
        if inner.users.contains_key(&user.email) {
            return Err(StoreError::Duplicate("Email already registered".into()));
        }
        let record = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            created_at: now_micros(),
        };
        inner.users.insert(record.email.clone(), record.clone());
        Ok(record)
    }
}

#[async_trait]
impl TransactionStore for MemoryStore {
    async fn find_all(&self, owner: &str) -> StoreResult<Vec<Transaction>> {
        let inner = self.inner.read().await;
        Ok(newest_first(&inner.transactions, owner).cloned().collect())
    }

    async fn find_by_month(&self, owner: &str, month: &str) -> StoreResult<Vec<Transaction>> {
        let inner = self.inner.read().await;
        Ok(newest_first(&inner.transactions, owner)
            .filter(|t| t.month == month)
            .cloned()
            .collect())
    }

    async fn find_recent(&self, owner: &str, limit: i64) -> StoreResult<Vec<Transaction>> {
        let inner = self.inner.read().await;
        let limit = usize::try_from(limit).unwrap_or(0);
        Ok(newest_first(&inner.transactions, owner)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn find_one(&self, owner: &str, id: Uuid) -> StoreResult<Option<Transaction>> {
        let inner = self.inner.read().await;
        Ok(inner
            .transactions
            .iter()
            .find(|t| t.id == id && t.owner == owner)
            .cloned())
    }

    async fn insert(&self, owner: &str, input: TransactionInput) -> StoreResult<Transaction> {
        let record = Transaction::new(owner, input);
        self.inner.write().await.transactions.push(record.clone());
        Ok(record)
    }

    async fn update(&self, owner: &str, id: Uuid, input: TransactionInput) -> StoreResult<u64> {
        let mut inner = self.inner.write().await;
        match inner
            .transactions
            .iter_mut()
            .find(|t| t.id == id && t.owner == owner)
        {
            Some(t) => {
                t.apply(input);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete(&self, owner: &str, id: Uuid) -> StoreResult<u64> {
        let mut inner = self.inner.write().await;
        let before = inner.transactions.len();
        inner
            .transactions
            .retain(|t| !(t.id == id && t.owner == owner));
        Ok((before - inner.transactions.len()) as u64)
    }
}

#[async_trait]
impl SalaryStore for MemoryStore {
    async fn insert(&self, owner: &str, month: &str, amount: i64) -> StoreResult<Salary> {
        let mut inner = self.inner.write().await;
        if inner
            .salaries
            .iter()
            .any(|s| s.owner == owner && s.month == month)
        {
            return Err(StoreError::Duplicate(format!(
                "Salary for {month} already recorded"
            )));
        }
        let record = Salary::new(owner, month, amount);
        inner.salaries.push(record.clone());
        Ok(record)
    }

    async fn find_by_month(&self, owner: &str, month: &str) -> StoreResult<Option<Salary>> {
        let inner = self.inner.read().await;
        Ok(inner
            .salaries
            .iter()
            .find(|s| s.owner == owner && s.month == month)
            .cloned())
    }
}

fn tag_taken(tags: &[Tag], owner: &str, category: TransactionKind, name: &str, except: Option<Uuid>) -> bool {
    tags.iter().any(|t| {
        t.owner == owner && t.category == category && t.name == name && Some(t.id) != except
    })
}

#[async_trait]
impl TagStore for MemoryStore {
    async fn find_by_category(&self, owner: &str, category: TransactionKind) -> StoreResult<Vec<Tag>> {
        let inner = self.inner.read().await;
        Ok(inner
            .tags
            .iter()
            .filter(|t| t.owner == owner && t.category == category)
            .cloned()
            .collect())
    }

    async fn insert(&self, owner: &str, tag: NewTag) -> StoreResult<Tag> {
        let mut inner = self.inner.write().await;
        if tag_taken(&inner.tags, owner, tag.category, &tag.name, None) {
            return Err(StoreError::Duplicate(format!("Tag {} already exists", tag.name)));
        }
        let record = Tag::new(owner, tag);
        inner.tags.push(record.clone());
        Ok(record)
    }

    async fn update(&self, owner: &str, id: Uuid, name: &str, emoji: &str) -> StoreResult<u64> {
        let mut inner = self.inner.write().await;
        let Some(category) = inner
            .tags
            .iter()
            .find(|t| t.id == id && t.owner == owner)
            .map(|t| t.category)
        else {
            return Ok(0);
        };
        if tag_taken(&inner.tags, owner, category, name, Some(id)) {
            return Err(StoreError::Duplicate(format!("Tag {name} already exists")));
        }
        match inner.tags.iter_mut().find(|t| t.id == id) {
            Some(t) => {
                t.name = name.to_string();
                t.emoji = emoji.to_string();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete(&self, owner: &str, id: Uuid) -> StoreResult<u64> {
        let mut inner = self.inner.write().await;
        let before = inner.tags.len();
        inner.tags.retain(|t| !(t.id == id && t.owner == owner));
        Ok((before - inner.tags.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transactions::repo_types::{Amount, PaymentMethod, TransactionKind};

    fn input(kind: TransactionKind, amount: i64, month: &str) -> TransactionInput {
        TransactionInput {
            kind,
            title: format!("{kind} {amount}"),
            amount: Amount::Int(amount),
            tag: None,
            payment_method: PaymentMethod::Cash,
            description: None,
            month: month.into(),
        }
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let store = MemoryStore::new();
        let user = NewUser {
            name: "A".into(),
            email: "a@x.com".into(),
            password_hash: "h".into(),
        };
        UserStore::insert(&store, user.clone()).await.unwrap();
        let err = UserStore::insert(&store, user).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));
    }

    #[tokio::test]
    async fn owners_never_see_each_other() {
        let store = MemoryStore::new();
        let a = TransactionStore::insert(&store, "a@x.com", input(TransactionKind::Income, 10, "2024-01"))
            .await
            .unwrap();
        let b = TransactionStore::insert(&store, "b@x.com", input(TransactionKind::Expense, 20, "2024-01"))
            .await
            .unwrap();

        let seen: Vec<Uuid> = store.find_all("a@x.com").await.unwrap().iter().map(|t| t.id).collect();
        assert_eq!(seen, vec![a.id]);
        assert!(store.find_one("a@x.com", b.id).await.unwrap().is_none());
        assert_eq!(
            TransactionStore::update(&store, "a@x.com", b.id, input(TransactionKind::Income, 1, "2024-02"))
                .await
                .unwrap(),
            0
        );
        assert_eq!(TransactionStore::delete(&store, "a@x.com", b.id).await.unwrap(), 0);

        let b_after = store.find_one("b@x.com", b.id).await.unwrap().unwrap();
        assert_eq!(b_after, b);
    }

    #[tokio::test]
    async fn lists_are_newest_first_and_filtered() {
        let store = MemoryStore::new();
        for (i, month) in ["2024-01", "2024-02", "2024-01", "2024-03", "2024-01"].iter().enumerate() {
            TransactionStore::insert(&store, "a@x.com", input(TransactionKind::Expense, i as i64, month))
                .await
                .unwrap();
        }

        let all = store.find_all("a@x.com").await.unwrap();
        let amounts: Vec<f64> = all.iter().map(|t| t.amount.as_f64()).collect();
        assert_eq!(amounts, vec![4.0, 3.0, 2.0, 1.0, 0.0]);

        let jan = TransactionStore::find_by_month(&store, "a@x.com", "2024-01")
            .await
            .unwrap();
        assert_eq!(jan.len(), 3);
        assert!(jan.iter().all(|t| t.month == "2024-01"));

        let recent = store.find_recent("a@x.com", 2).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].amount, Amount::Int(4));
    }

    #[tokio::test]
    async fn delete_twice_reports_zero() {
        let store = MemoryStore::new();
        let t = TransactionStore::insert(&store, "a@x.com", input(TransactionKind::Income, 1, "2024-01"))
            .await
            .unwrap();
        assert_eq!(TransactionStore::delete(&store, "a@x.com", t.id).await.unwrap(), 1);
        assert_eq!(TransactionStore::delete(&store, "a@x.com", t.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn one_salary_per_owner_and_month() {
        let store = MemoryStore::new();
        SalaryStore::insert(&store, "a@x.com", "2024-01", 5000).await.unwrap();
        SalaryStore::insert(&store, "b@x.com", "2024-01", 7000).await.unwrap();
        let err = SalaryStore::insert(&store, "a@x.com", "2024-01", 1).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));

        let found = SalaryStore::find_by_month(&store, "a@x.com", "2024-01")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.amount, 5000);
        assert!(SalaryStore::find_by_month(&store, "a@x.com", "2024-02")
            .await
            .unwrap()
            .is_none());
    }

    fn tag(name: &str, category: TransactionKind) -> NewTag {
        NewTag {
            name: name.into(),
            emoji: "🍔".into(),
            category,
        }
    }

    #[tokio::test]
    async fn tags_are_per_owner_and_category() {
        let store = MemoryStore::new();
        let food = TagStore::insert(&store, "a@x.com", tag("Food", TransactionKind::Expense))
            .await
            .unwrap();
        TagStore::insert(&store, "a@x.com", tag("Salary", TransactionKind::Income))
            .await
            .unwrap();
        let bobs = TagStore::insert(&store, "b@x.com", tag("Food", TransactionKind::Expense))
            .await
            .unwrap();

        let expense = store
            .find_by_category("a@x.com", TransactionKind::Expense)
            .await
            .unwrap();
        assert_eq!(expense, vec![food.clone()]);

        assert_eq!(TagStore::update(&store, "a@x.com", bobs.id, "Mine", "x").await.unwrap(), 0);
        assert_eq!(TagStore::delete(&store, "a@x.com", bobs.id).await.unwrap(), 0);
        let bob_expense = store
            .find_by_category("b@x.com", TransactionKind::Expense)
            .await
            .unwrap();
        assert_eq!(bob_expense, vec![bobs]);

        assert_eq!(TagStore::delete(&store, "a@x.com", food.id).await.unwrap(), 1);
        assert_eq!(TagStore::delete(&store, "a@x.com", food.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn renaming_onto_an_existing_tag_is_a_duplicate() {
        let store = MemoryStore::new();
        TagStore::insert(&store, "a@x.com", tag("Food", TransactionKind::Expense))
            .await
            .unwrap();
        let rent = TagStore::insert(&store, "a@x.com", tag("Rent", TransactionKind::Expense))
            .await
            .unwrap();

        let err = TagStore::update(&store, "a@x.com", rent.id, "Food", "🏠")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));

        // Keeping its own name is fine.
        assert_eq!(
            TagStore::update(&store, "a@x.com", rent.id, "Rent", "🏠").await.unwrap(),
            1
        );
    }
}
