use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::storage::now_micros;

/// Monthly salary record, one per owner and month.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Salary {
    pub id: Uuid,
    #[sqlx(rename = "owner_email")]
    pub owner: String,
    pub month: String,
    pub amount: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Salary {
    pub fn new(owner: &str, month: &str, amount: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner: owner.to_string(),
            month: month.to_string(),
            amount,
            created_at: now_micros(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_salary_is_stamped_in_whole_microseconds() {
        let s = Salary::new("a@x.com", "2024-01", 5000);
        assert_eq!(s.created_at.nanosecond() % 1_000, 0);
        assert_eq!(s.owner, "a@x.com");
    }
}
