//! Document numbering generator
//!
//! Human-facing document codes (`PED00042`, `ORC00013`) come from
//! storage-backed counters, one per prefix. Each draw increments the
//! counter in its own committed transaction, so concurrent creations
//! always receive distinct numbers; numbers are never computed from a
//! scan at issue time. The first use of a prefix seeds its counter from
//! the highest suffix among existing numbers, which migrates databases
//! created before the counters table existed.

use std::sync::Arc;

use shared::error::AppResult;

use super::store::FulfillmentStore;

/// Prefix for order numbers
pub const ORDER_PREFIX: &str = "PED";

/// Prefix for quote numbers
pub const QUOTE_PREFIX: &str = "ORC";

/// Render a document number: prefix + zero-padded sequence
///
/// Width is five digits; sequences past 99999 widen naturally.
pub fn format_number(prefix: &str, seq: u64) -> String {
    format!("{prefix}{seq:05}")
}

/// Issues order and quote numbers backed by the store's counters
#[derive(Clone)]
pub struct DocumentNumbers {
    store: Arc<dyn FulfillmentStore>,
}

impl DocumentNumbers {
    pub fn new(store: Arc<dyn FulfillmentStore>) -> Self {
        Self { store }
    }

    /// Seed both counters from pre-existing document numbers
    ///
    /// Called once at startup; a no-op for every prefix that already has
    /// a counter.
    pub async fn seed(&self) -> AppResult<()> {
        self.store.seed_document_seq(ORDER_PREFIX).await?;
        self.store.seed_document_seq(QUOTE_PREFIX).await?;
        Ok(())
    }

    /// Draw the next order number
    pub async fn next_order_number(&self) -> AppResult<String> {
        let seq = self.store.next_document_seq(ORDER_PREFIX).await?;
        Ok(format_number(ORDER_PREFIX, seq))
    }

    /// Draw the next quote number
    pub async fn next_quote_number(&self) -> AppResult<String> {
        let seq = self.store.next_document_seq(QUOTE_PREFIX).await?;
        Ok(format_number(QUOTE_PREFIX, seq))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fulfillment::storage::FulfillmentStorage;
    use std::collections::HashSet;

    #[test]
    fn test_format_number_padding() {
        assert_eq!(format_number(ORDER_PREFIX, 1), "PED00001");
        assert_eq!(format_number(ORDER_PREFIX, 42), "PED00042");
        assert_eq!(format_number(QUOTE_PREFIX, 13), "ORC00013");
        assert_eq!(format_number(ORDER_PREFIX, 99999), "PED99999");
        // Past five digits the width grows, nothing truncates
        assert_eq!(format_number(ORDER_PREFIX, 100000), "PED100000");
    }

    #[tokio::test]
    async fn test_sequences_are_independent_per_prefix() {
        let store: Arc<dyn FulfillmentStore> =
            Arc::new(FulfillmentStorage::open_in_memory().unwrap());
        let numbers = DocumentNumbers::new(store);

        assert_eq!(numbers.next_order_number().await.unwrap(), "PED00001");
        assert_eq!(numbers.next_order_number().await.unwrap(), "PED00002");
        assert_eq!(numbers.next_quote_number().await.unwrap(), "ORC00001");
        assert_eq!(numbers.next_order_number().await.unwrap(), "PED00003");
    }

    #[tokio::test]
    async fn test_concurrent_draws_are_distinct() {
        let store: Arc<dyn FulfillmentStore> =
            Arc::new(FulfillmentStorage::open_in_memory().unwrap());
        let numbers = DocumentNumbers::new(store);

        let draws = (0..32).map(|_| {
            let numbers = numbers.clone();
            tokio::spawn(async move { numbers.next_order_number().await.unwrap() })
        });
        let drawn: Vec<String> = futures::future::join_all(draws)
            .await
            .into_iter()
            .map(|r| r.unwrap())
            .collect();

        let unique: HashSet<&String> = drawn.iter().collect();
        assert_eq!(unique.len(), 32);
    }

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let store: Arc<dyn FulfillmentStore> =
            Arc::new(FulfillmentStorage::open_in_memory().unwrap());
        let numbers = DocumentNumbers::new(store);

        numbers.seed().await.unwrap();
        assert_eq!(numbers.next_order_number().await.unwrap(), "PED00001");

        numbers.seed().await.unwrap();
        assert_eq!(numbers.next_order_number().await.unwrap(), "PED00002");
    }
}
