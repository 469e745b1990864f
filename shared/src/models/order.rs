//! Order Model

use crate::fulfillment::OrderStatus;
use crate::util::{new_id, now_millis};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Order entity, the aggregate root of the fulfillment pipeline.
///
/// Status and the revenue/expense bookkeeping fields are mutated only
/// through the transition controller; everything else is edited via the
/// update surface. Orders are never deleted by this engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    /// Server-assigned UUID
    pub id: String,
    /// Human-facing sequential code, e.g. `PED00042`
    pub number: String,
    pub status: OrderStatus,
    pub client_id: String,
    pub client_name: String,
    /// Total amount in currency unit
    pub total: f64,
    /// True once income has been recognized for this order
    pub revenue_added: bool,
    /// Income ledger row currently recognized for this order.
    /// Set together with `revenue_added`; cleared when revenue is removed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue_transaction_id: Option<String>,
    /// Most recent production expense row, the one a rollback to
    /// `creating_art` deletes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub production_expense_id: Option<String>,
    /// Free text, never parsed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Production reference link
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_link: Option<String>,
    /// Read by an external notification collaborator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<NaiveDate>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Order {
    /// Create a fresh order at the start of the pipeline.
    pub fn new(
        number: impl Into<String>,
        client_id: impl Into<String>,
        client_name: impl Into<String>,
        total: f64,
    ) -> Self {
        let now = now_millis();
        Self {
            id: new_id(),
            number: number.into(),
            status: OrderStatus::AwaitingPayment,
            client_id: client_id.into(),
            client_name: client_name.into(),
            total,
            revenue_added: false,
            revenue_transaction_id: None,
            production_expense_id: None,
            notes: None,
            reference_link: None,
            scheduled_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the order has reached the end of the pipeline.
    pub fn is_delivered(&self) -> bool {
        self.status == OrderStatus::Delivered
    }
}

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    pub client_id: String,
    pub client_name: String,
    /// Total amount in currency unit
    pub total: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<NaiveDate>,
}

/// Update order payload (non-pipeline fields only)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<NaiveDate>,
}
