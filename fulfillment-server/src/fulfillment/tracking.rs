//! Tracking record creation on shipping entry
//!
//! Runs only after the status commit and never feeds back into it: a
//! failed insert is logged and reported through the success event's
//! `tracking_created` flag, the committed status stands.

use std::sync::Arc;

use chrono::NaiveDate;
use shared::error::AppResult;
use shared::models::{Order, TrackingRecord};

use super::store::FulfillmentStore;

/// Carrier recorded on every tracking record
pub const HOUSE_CARRIER: &str = "Correios";

pub struct TrackingCreator {
    store: Arc<dyn FulfillmentStore>,
}

impl TrackingCreator {
    pub fn new(store: Arc<dyn FulfillmentStore>) -> Self {
        Self { store }
    }

    /// Insert the tracking record for an order that entered shipping
    pub async fn create(
        &self,
        order: &Order,
        tracking_code: &str,
        estimated_delivery: Option<NaiveDate>,
    ) -> AppResult<TrackingRecord> {
        let record = TrackingRecord::new(
            order.id.as_str(),
            order.number.as_str(),
            order.client_name.as_str(),
            tracking_code,
            HOUSE_CARRIER,
            estimated_delivery,
        );
        self.store.insert_tracking(&record).await?;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fulfillment::storage::FulfillmentStorage;
    use shared::models::TrackingStatus;

    #[tokio::test]
    async fn test_create_inserts_pending_record() {
        let store: Arc<dyn FulfillmentStore> =
            Arc::new(FulfillmentStorage::open_in_memory().unwrap());
        let creator = TrackingCreator::new(store.clone());

        let order = Order::new("PED00009", "c1", "Ana Souza", 250.0);
        let record = creator
            .create(&order, "AA123456789BR", None)
            .await
            .unwrap();

        assert_eq!(record.status, TrackingStatus::Pending);
        assert_eq!(record.carrier, HOUSE_CARRIER);
        assert!(record.events.is_empty());
        assert_eq!(record.order_number, "PED00009");

        let stored = store.list_tracking().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].tracking_code, "AA123456789BR");
    }
}
