//! Persistence boundary for the fulfillment engine
//!
//! The engine and the transition controller only ever talk to
//! [`FulfillmentStore`]; the redb implementation lives in
//! [`storage`](super::storage). Tests swap in wrappers that inject
//! failures at chosen calls to exercise rollback paths.

use async_trait::async_trait;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Order, Quote, TrackingRecord, Transaction};

use super::storage::{FulfillmentStorage, StorageError, TransitionWrite};

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::OrderNotFound(id) => AppError::order_not_found(id),
            StorageError::QuoteNotFound(id) => {
                AppError::new(ErrorCode::QuoteNotFound).with_detail("quote_id", id)
            }
            StorageError::QuoteAlreadyConverted(id) => {
                AppError::new(ErrorCode::QuoteAlreadyConverted).with_detail("quote_id", id)
            }
            StorageError::NumberTaken(number) => AppError::numbering_collision(number),
            StorageError::StatusConflict { ref order_id, .. } => {
                AppError::with_message(ErrorCode::TransitionConflict, err.to_string())
                    .with_detail("order_id", order_id.clone())
            }
            other => AppError::database(other.to_string()),
        }
    }
}

/// Store operations the fulfillment engine relies on
#[async_trait]
pub trait FulfillmentStore: Send + Sync {
    // Orders
    async fn insert_order(&self, order: &Order) -> AppResult<()>;
    async fn update_order(&self, order: &Order) -> AppResult<()>;
    async fn get_order(&self, order_id: &str) -> AppResult<Option<Order>>;
    async fn list_orders(&self) -> AppResult<Vec<Order>>;

    /// Apply one pipeline transition atomically (status + ledger rows)
    async fn commit_transition(&self, write: &TransitionWrite) -> AppResult<Order>;

    // Ledger
    async fn insert_transaction(&self, row: &Transaction) -> AppResult<()>;
    async fn delete_transaction(&self, transaction_id: &str) -> AppResult<()>;
    async fn list_transactions(&self) -> AppResult<Vec<Transaction>>;

    // Tracking
    async fn insert_tracking(&self, record: &TrackingRecord) -> AppResult<()>;
    async fn list_tracking(&self) -> AppResult<Vec<TrackingRecord>>;

    // Quotes
    async fn insert_quote(&self, quote: &Quote) -> AppResult<()>;
    async fn get_quote(&self, quote_id: &str) -> AppResult<Option<Quote>>;
    async fn list_quotes(&self) -> AppResult<Vec<Quote>>;
    async fn mark_quote_converted(&self, quote_id: &str, order: &Order) -> AppResult<Quote>;

    // Document numbering
    async fn next_document_seq(&self, prefix: &str) -> AppResult<u64>;
    async fn peek_document_seq(&self, prefix: &str) -> AppResult<u64>;
    async fn seed_document_seq(&self, prefix: &str) -> AppResult<u64>;
    async fn list_document_numbers(&self, prefix: &str) -> AppResult<Vec<String>>;
}

#[async_trait]
impl FulfillmentStore for FulfillmentStorage {
    async fn insert_order(&self, order: &Order) -> AppResult<()> {
        Ok(FulfillmentStorage::insert_order(self, order)?)
    }

    async fn update_order(&self, order: &Order) -> AppResult<()> {
        Ok(FulfillmentStorage::update_order(self, order)?)
    }

    async fn get_order(&self, order_id: &str) -> AppResult<Option<Order>> {
        Ok(FulfillmentStorage::get_order(self, order_id)?)
    }

    async fn list_orders(&self) -> AppResult<Vec<Order>> {
        Ok(FulfillmentStorage::list_orders(self)?)
    }

    async fn commit_transition(&self, write: &TransitionWrite) -> AppResult<Order> {
        Ok(FulfillmentStorage::commit_transition(self, write)?)
    }

    async fn insert_transaction(&self, row: &Transaction) -> AppResult<()> {
        Ok(FulfillmentStorage::insert_transaction(self, row)?)
    }

    async fn delete_transaction(&self, transaction_id: &str) -> AppResult<()> {
        Ok(FulfillmentStorage::delete_transaction(self, transaction_id)?)
    }

    async fn list_transactions(&self) -> AppResult<Vec<Transaction>> {
        Ok(FulfillmentStorage::list_transactions(self)?)
    }

    async fn insert_tracking(&self, record: &TrackingRecord) -> AppResult<()> {
        Ok(FulfillmentStorage::insert_tracking(self, record)?)
    }

    async fn list_tracking(&self) -> AppResult<Vec<TrackingRecord>> {
        Ok(FulfillmentStorage::list_tracking(self)?)
    }

    async fn insert_quote(&self, quote: &Quote) -> AppResult<()> {
        Ok(FulfillmentStorage::insert_quote(self, quote)?)
    }

    async fn get_quote(&self, quote_id: &str) -> AppResult<Option<Quote>> {
        Ok(FulfillmentStorage::get_quote(self, quote_id)?)
    }

    async fn list_quotes(&self) -> AppResult<Vec<Quote>> {
        Ok(FulfillmentStorage::list_quotes(self)?)
    }

    async fn mark_quote_converted(&self, quote_id: &str, order: &Order) -> AppResult<Quote> {
        Ok(FulfillmentStorage::mark_quote_converted(self, quote_id, order)?)
    }

    async fn next_document_seq(&self, prefix: &str) -> AppResult<u64> {
        Ok(FulfillmentStorage::next_document_seq(self, prefix)?)
    }

    async fn peek_document_seq(&self, prefix: &str) -> AppResult<u64> {
        Ok(FulfillmentStorage::peek_document_seq(self, prefix)?)
    }

    async fn seed_document_seq(&self, prefix: &str) -> AppResult<u64> {
        Ok(FulfillmentStorage::seed_document_seq(self, prefix)?)
    }

    async fn list_document_numbers(&self, prefix: &str) -> AppResult<Vec<String>> {
        Ok(FulfillmentStorage::list_document_numbers(self, prefix)?)
    }
}
