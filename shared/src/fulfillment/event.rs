//! Engine-to-UI event stream types
//!
//! The fulfillment engine broadcasts one event per resolved transition
//! attempt. Subscribers (board UI, console, tests) receive them over a
//! tokio broadcast channel; the payloads here are also what a wire layer
//! would serialize.

use super::status::OrderStatus;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of input the controller is waiting for before a transition commits.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CollectionKind {
    /// Production entry: expense amount plus optional reference link.
    Expense,
    /// Shipping entry: tracking code plus optional estimated delivery.
    Tracking,
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectionKind::Expense => write!(f, "EXPENSE"),
            CollectionKind::Tracking => write!(f, "TRACKING"),
        }
    }
}

/// Events emitted by the transition controller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FulfillmentEvent {
    /// A transition committed; the board entry for `order_id` is final.
    TransitionSucceeded {
        order_id: String,
        from: OrderStatus,
        to: OrderStatus,
        /// False when tracking input was supplied but the insert failed
        /// (the status commit stands regardless) or when the step was
        /// skipped.
        tracking_created: bool,
    },
    /// A transition failed at the persistence boundary; the board entry
    /// was rolled back to its pre-transition value.
    TransitionFailed {
        order_id: String,
        from: OrderStatus,
        to: OrderStatus,
        reason: String,
    },
    /// The controller suspended waiting for input; answer via the ticket.
    CollectionRequired {
        order_id: String,
        ticket: String,
        kind: CollectionKind,
    },
}

impl FulfillmentEvent {
    /// Order this event refers to.
    pub fn order_id(&self) -> &str {
        match self {
            FulfillmentEvent::TransitionSucceeded { order_id, .. }
            | FulfillmentEvent::TransitionFailed { order_id, .. }
            | FulfillmentEvent::CollectionRequired { order_id, .. } => order_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serde_tagging() {
        let event = FulfillmentEvent::CollectionRequired {
            order_id: "o1".to_string(),
            ticket: "t1".to_string(),
            kind: CollectionKind::Expense,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "COLLECTION_REQUIRED");
        assert_eq!(json["kind"], "EXPENSE");

        let back: FulfillmentEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_order_id_accessor() {
        let event = FulfillmentEvent::TransitionFailed {
            order_id: "o9".to_string(),
            from: OrderStatus::Production,
            to: OrderStatus::Shipping,
            reason: "storage unavailable".to_string(),
        };
        assert_eq!(event.order_id(), "o9");
    }
}
