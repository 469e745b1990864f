//! Request and outcome DTOs for the transition API

use super::event::CollectionKind;
use super::status::OrderStatus;
use crate::models::Order;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Board drop request: move an order to a new column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DropRequest {
    pub order_id: String,
    pub to: OrderStatus,
}

/// Input collected while a transition is suspended.
///
/// Expense tickets read `amount` and `reference_link`; tracking tickets read
/// `tracking_code` and `estimated_delivery`. Fields for the other kind are
/// ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectionInput {
    /// Production expense amount.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    /// Reference link stored on the order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_link: Option<String>,
    /// Carrier tracking code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking_code: Option<String>,
    /// Estimated delivery date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_delivery: Option<NaiveDate>,
}

impl CollectionInput {
    /// Expense input for a production entry.
    pub fn expense(amount: f64) -> Self {
        Self {
            amount: Some(amount),
            ..Default::default()
        }
    }

    /// Expense input carrying a reference link.
    pub fn expense_with_link(amount: f64, link: impl Into<String>) -> Self {
        Self {
            amount: Some(amount),
            reference_link: Some(link.into()),
            ..Default::default()
        }
    }

    /// Tracking input for a shipping entry.
    pub fn tracking(code: impl Into<String>) -> Self {
        Self {
            tracking_code: Some(code.into()),
            ..Default::default()
        }
    }

    /// Tracking input with an estimated delivery date.
    pub fn tracking_with_estimate(code: impl Into<String>, estimate: NaiveDate) -> Self {
        Self {
            tracking_code: Some(code.into()),
            estimated_delivery: Some(estimate),
            ..Default::default()
        }
    }
}

/// Result of a transition attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransitionOutcome {
    /// The transition committed (or was a same-status no-op).
    Completed { order: Order },
    /// The controller is waiting for input; answer with confirm/skip/cancel.
    InputRequired {
        ticket: String,
        kind: CollectionKind,
    },
}

impl TransitionOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, TransitionOutcome::Completed { .. })
    }

    /// Ticket id when input is required.
    pub fn ticket(&self) -> Option<&str> {
        match self {
            TransitionOutcome::InputRequired { ticket, .. } => Some(ticket),
            TransitionOutcome::Completed { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_input_constructors() {
        let e = CollectionInput::expense(80.0);
        assert_eq!(e.amount, Some(80.0));
        assert!(e.tracking_code.is_none());

        let t = CollectionInput::tracking("AA123456789BR");
        assert_eq!(t.tracking_code.as_deref(), Some("AA123456789BR"));
        assert!(t.amount.is_none());
        assert!(t.estimated_delivery.is_none());

        let estimate = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();
        let t = CollectionInput::tracking_with_estimate("AA123456789BR", estimate);
        assert_eq!(t.estimated_delivery, Some(estimate));
    }

    #[test]
    fn test_outcome_tagging() {
        let outcome = TransitionOutcome::InputRequired {
            ticket: "t-1".to_string(),
            kind: CollectionKind::Tracking,
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["outcome"], "INPUT_REQUIRED");
        assert_eq!(outcome.ticket(), Some("t-1"));
        assert!(!outcome.is_completed());
    }
}
