//! Transaction Model (ledger entry)

use crate::util::{new_id, now_millis};
use serde::{Deserialize, Serialize};

/// Ledger entry kind
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    Income,
    Expense,
}

/// Ledger entry.
///
/// Rows tied to an order are created and deleted only by transition
/// commits; once written they are never edited by this engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: String,
    pub kind: TransactionKind,
    /// Amount in currency unit, always positive
    pub amount: f64,
    pub category: String,
    pub description: String,
    /// Entry date, UTC millis
    pub date: i64,
    /// Back-reference to the originating order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
}

impl Transaction {
    /// Income entry tied to an order.
    pub fn income(
        amount: f64,
        category: impl Into<String>,
        description: impl Into<String>,
        order_id: impl Into<String>,
    ) -> Self {
        Self {
            id: new_id(),
            kind: TransactionKind::Income,
            amount,
            category: category.into(),
            description: description.into(),
            date: now_millis(),
            order_id: Some(order_id.into()),
        }
    }

    /// Expense entry tied to an order.
    pub fn expense(
        amount: f64,
        category: impl Into<String>,
        description: impl Into<String>,
        order_id: impl Into<String>,
    ) -> Self {
        Self {
            id: new_id(),
            kind: TransactionKind::Expense,
            amount,
            category: category.into(),
            description: description.into(),
            date: now_millis(),
            order_id: Some(order_id.into()),
        }
    }
}
