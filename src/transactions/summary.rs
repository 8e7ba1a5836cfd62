//! Reduction of a user's transactions to dashboard totals.
//!
//! Amounts are summed as `f64`. Float rounding drift on long sequences is a
//! known limitation and is not corrected here.

use serde::{Deserialize, Serialize};

use super::repo_types::{Transaction, TransactionKind};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub income: f64,
    pub expense: f64,
    pub investment: f64,
    pub balance: f64,
}

/// Sums amounts per kind; `balance = income - expense - investment`.
/// The caller has already scoped `transactions` to one owner.
pub fn summarize(transactions: &[Transaction]) -> Summary {
    let mut income = 0.0_f64;
    let mut expense = 0.0_f64;
    let mut investment = 0.0_f64;

    for t in transactions {
        let amount = t.amount.as_f64();
        match t.kind {
            TransactionKind::Income => income += amount,
            TransactionKind::Expense => expense += amount,
            TransactionKind::Investment => investment += amount,
        }
    }

    Summary {
        income,
        expense,
        investment,
        balance: income - expense - investment,
    }
}
