//! Pipeline status for fulfillment orders
//!
//! Orders move through a fixed five-column pipeline. The board allows
//! arbitrary drag targets, so any status may transition to any other; the
//! side effects of a move are derived from the (from, to) pair by the
//! transition planner, never from the target alone.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Order pipeline status, in board column order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    AwaitingPayment,
    CreatingArt,
    Production,
    Shipping,
    Delivered,
}

impl OrderStatus {
    /// All statuses in pipeline order. Board columns render in this order.
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::AwaitingPayment,
        OrderStatus::CreatingArt,
        OrderStatus::Production,
        OrderStatus::Shipping,
        OrderStatus::Delivered,
    ];

    /// Position within the pipeline (0-based).
    pub fn pipeline_index(&self) -> usize {
        match self {
            OrderStatus::AwaitingPayment => 0,
            OrderStatus::CreatingArt => 1,
            OrderStatus::Production => 2,
            OrderStatus::Shipping => 3,
            OrderStatus::Delivered => 4,
        }
    }

    /// Stable string form, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::AwaitingPayment => "AWAITING_PAYMENT",
            OrderStatus::CreatingArt => "CREATING_ART",
            OrderStatus::Production => "PRODUCTION",
            OrderStatus::Shipping => "SHIPPING",
            OrderStatus::Delivered => "DELIVERED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when parsing an unknown status string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidStatus(pub String);

impl fmt::Display for InvalidStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid order status: {}", self.0)
    }
}

impl std::error::Error for InvalidStatus {}

impl FromStr for OrderStatus {
    type Err = InvalidStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AWAITING_PAYMENT" => Ok(OrderStatus::AwaitingPayment),
            "CREATING_ART" => Ok(OrderStatus::CreatingArt),
            "PRODUCTION" => Ok(OrderStatus::Production),
            "SHIPPING" => Ok(OrderStatus::Shipping),
            "DELIVERED" => Ok(OrderStatus::Delivered),
            other => Err(InvalidStatus(other.to_string())),
        }
    }
}
