use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::storage::now_micros;

/// Largest accepted amount. Far below the point where `f64` sums stop being finite.
pub const MAX_AMOUNT: f64 = 1e15;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    Income,
    Expense,
    Investment,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PaymentMethod {
    #[default]
    Cash,
    #[serde(rename = "UPI")]
    Upi,
    Bank,
    Card,
}

/// A stored amount. Stores may hand back integers or floats for the same column.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Amount {
    Int(i64),
    Float(f64),
}

impl Amount {
    pub fn as_f64(self) -> f64 {
        match self {
            Amount::Int(v) => v as f64,
            Amount::Float(v) => v,
        }
    }

    pub fn is_valid(self) -> bool {
        let v = self.as_f64();
        v.is_finite() && (0.0..=MAX_AMOUNT).contains(&v)
    }

    /// Whole floats become `Int`, so `5000.0` and `5000` read back the same from any store.
    pub fn normalized(self) -> Self {
        match self {
            Amount::Float(v) if v.fract() == 0.0 && v.abs() <= MAX_AMOUNT => Amount::Int(v as i64),
            other => other,
        }
    }
}

/// Owned financial event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub title: String,
    pub amount: Amount,
    pub tag: Option<String>,
    pub payment_method: PaymentMethod,
    pub description: Option<String>,
    pub month: String,
    pub owner: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// The client-editable part of a transaction; used for both create and full replace.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionInput {
    pub kind: TransactionKind,
    pub title: String,
    pub amount: Amount,
    pub tag: Option<String>,
    pub payment_method: PaymentMethod,
    pub description: Option<String>,
    pub month: String,
}

impl Transaction {
    pub fn new(owner: &str, input: TransactionInput) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: input.kind,
            title: input.title,
            amount: input.amount,
            tag: input.tag,
            payment_method: input.payment_method,
            description: input.description,
            month: input.month,
            owner: owner.to_string(),
            created_at: now_micros(),
        }
    }

    /// Replaces every editable field; id, owner and created_at stay.
    pub fn apply(&mut self, input: TransactionInput) {
        self.kind = input.kind;
        self.title = input.title;
        self.amount = input.amount;
        self.tag = input.tag;
        self.payment_method = input.payment_method;
        self.description = input.description;
        self.month = input.month;
    }
}

/// Raw `transactions` row; enums are stored as text.
#[derive(Debug, FromRow)]
pub struct TransactionRow {
    pub id: Uuid,
    pub kind: String,
    pub title: String,
    pub amount: f64,
    pub tag: Option<String>,
    pub payment_method: String,
    pub description: Option<String>,
    pub month: String,
    pub owner_email: String,
    pub created_at: OffsetDateTime,
}

impl TryFrom<TransactionRow> for Transaction {
    type Error = anyhow::Error;

    fn try_from(r: TransactionRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: r.id,
            kind: r.kind.parse()?,
            title: r.title,
            amount: Amount::Float(r.amount).normalized(),
            tag: r.tag,
            payment_method: r.payment_method.parse()?,
            description: r.description,
            month: r.month,
            owner: r.owner_email,
            created_at: r.created_at,
        })
    }
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Income => "Income",
            TransactionKind::Expense => "Expense",
            TransactionKind::Investment => "Investment",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Income" => Ok(TransactionKind::Income),
            "Expense" => Ok(TransactionKind::Expense),
            "Investment" => Ok(TransactionKind::Investment),
            other => anyhow::bail!("unknown transaction kind {other:?}"),
        }
    }
}

impl PaymentMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Upi => "UPI",
            PaymentMethod::Bank => "Bank",
            PaymentMethod::Card => "Card",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Cash" => Ok(PaymentMethod::Cash),
            "UPI" => Ok(PaymentMethod::Upi),
            "Bank" => Ok(PaymentMethod::Bank),
            "Card" => Ok(PaymentMethod::Card),
            other => anyhow::bail!("unknown payment method {other:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_accepts_int_and_float_json() {
        let a: Amount = serde_json::from_str("5000").unwrap();
        let b: Amount = serde_json::from_str("12.5").unwrap();
        assert_eq!(a, Amount::Int(5000));
        assert_eq!(b, Amount::Float(12.5));
        assert_eq!(a.as_f64(), 5000.0);
    }

    #[test]
    fn negative_amounts_are_invalid() {
        assert!(!Amount::Int(-1).is_valid());
        assert!(!Amount::Float(-0.01).is_valid());
        assert!(!Amount::Float(f64::NAN).is_valid());
        assert!(Amount::Int(0).is_valid());
    }

    #[test]
    fn amounts_above_the_cap_are_invalid() {
        assert!(Amount::Float(MAX_AMOUNT).is_valid());
        assert!(!Amount::Float(1e308).is_valid());
        assert!(!Amount::Int(i64::MAX).is_valid());
        assert!(!Amount::Float(f64::INFINITY).is_valid());
    }

    #[test]
    fn whole_floats_normalize_to_int() {
        assert_eq!(Amount::Float(5000.0).normalized(), Amount::Int(5000));
        assert_eq!(Amount::Float(12.5).normalized(), Amount::Float(12.5));
        assert_eq!(Amount::Int(7).normalized(), Amount::Int(7));
        assert_eq!(serde_json::to_string(&Amount::Float(42.0).normalized()).unwrap(), "42");
    }

    #[test]
    fn new_records_are_stamped_in_whole_microseconds() {
        let t = Transaction::new(
            "a@x.com",
            TransactionInput {
                kind: TransactionKind::Income,
                title: "salary".into(),
                amount: Amount::Int(1),
                tag: None,
                payment_method: PaymentMethod::Cash,
                description: None,
                month: "2024-01".into(),
            },
        );
        assert_eq!(t.created_at.nanosecond() % 1_000, 0);
    }

    #[test]
    fn payment_method_uses_upper_case_upi() {
        let json = serde_json::to_string(&PaymentMethod::Upi).unwrap();
        assert_eq!(json, "\"UPI\"");
        assert_eq!("UPI".parse::<PaymentMethod>().unwrap(), PaymentMethod::Upi);
        assert_eq!(PaymentMethod::default(), PaymentMethod::Cash);
    }

    #[test]
    fn row_with_unknown_kind_fails_conversion() {
        let row = TransactionRow {
            id: Uuid::new_v4(),
            kind: "Gift".into(),
            title: "t".into(),
            amount: 1.0,
            tag: None,
            payment_method: "Cash".into(),
            description: None,
            month: "2024-01".into(),
            owner_email: "a@x.com".into(),
            created_at: now_micros(),
        };
        assert!(Transaction::try_from(row).is_err());
    }

    #[test]
    fn apply_keeps_identity_fields() {
        let mut t = Transaction::new(
            "a@x.com",
            TransactionInput {
                kind: TransactionKind::Income,
                title: "salary".into(),
                amount: Amount::Int(100),
                tag: None,
                payment_method: PaymentMethod::Bank,
                description: None,
                month: "2024-01".into(),
            },
        );
        let (id, created_at) = (t.id, t.created_at);
        t.apply(TransactionInput {
            kind: TransactionKind::Expense,
            title: "rent".into(),
            amount: Amount::Float(50.5),
            tag: Some("home".into()),
            payment_method: PaymentMethod::Card,
            description: Some("march".into()),
            month: "2024-03".into(),
        });
        assert_eq!(t.id, id);
        assert_eq!(t.created_at, created_at);
        assert_eq!(t.owner, "a@x.com");
        assert_eq!(t.kind, TransactionKind::Expense);
        assert_eq!(t.month, "2024-03");
    }
}
