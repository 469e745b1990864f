//! Quote Model

use crate::util::{new_id, now_millis};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Quote entity: an order proposal with its own numbering, convertible
/// exactly once into an order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Quote {
    pub id: String,
    /// Human-facing sequential code, e.g. `ORC00013`
    pub number: String,
    pub client_id: String,
    pub client_name: String,
    /// Total amount in currency unit
    pub total: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<NaiveDate>,
    pub converted: bool,
    /// Order produced by conversion
    #[serde(skip_serializing_if = "Option::is_none")]
    pub converted_order_id: Option<String>,
    pub created_at: i64,
}

impl Quote {
    pub fn new(
        number: impl Into<String>,
        client_id: impl Into<String>,
        client_name: impl Into<String>,
        total: f64,
    ) -> Self {
        Self {
            id: new_id(),
            number: number.into(),
            client_id: client_id.into(),
            client_name: client_name.into(),
            total,
            notes: None,
            valid_until: None,
            converted: false,
            converted_order_id: None,
            created_at: now_millis(),
        }
    }
}

/// Create quote payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteCreate {
    pub client_id: String,
    pub client_name: String,
    /// Total amount in currency unit
    pub total: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_quote_not_converted() {
        let quote = Quote::new("ORC00001", "c1", "Carla Dias", 420.0);
        assert!(!quote.converted);
        assert!(quote.converted_order_id.is_none());
    }
}
