//! Tracking Record Model

use crate::util::{new_id, now_millis};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Shipment tracking status, advanced by an external polling collaborator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrackingStatus {
    #[default]
    Pending,
    InTransit,
    Delivered,
    Failed,
}

/// One event on the shipment timeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrackingEvent {
    /// UTC millis
    pub timestamp: i64,
    pub location: String,
    pub description: String,
}

/// Shipment tracking record, created once on entry into shipping.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrackingRecord {
    pub id: String,
    pub order_id: String,
    pub order_number: String,
    pub client_name: String,
    pub tracking_code: String,
    pub carrier: String,
    pub status: TrackingStatus,
    /// Ordered shipment events, empty at creation
    pub events: Vec<TrackingEvent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_delivery: Option<NaiveDate>,
    pub created_at: i64,
}

impl TrackingRecord {
    /// Fresh record in `Pending` with an empty event timeline.
    pub fn new(
        order_id: impl Into<String>,
        order_number: impl Into<String>,
        client_name: impl Into<String>,
        tracking_code: impl Into<String>,
        carrier: impl Into<String>,
        estimated_delivery: Option<NaiveDate>,
    ) -> Self {
        Self {
            id: new_id(),
            order_id: order_id.into(),
            order_number: order_number.into(),
            client_name: client_name.into(),
            tracking_code: tracking_code.into(),
            carrier: carrier.into(),
            status: TrackingStatus::Pending,
            events: Vec::new(),
            estimated_delivery,
            created_at: now_millis(),
        }
    }
}
