//! redb-based storage layer for the fulfillment engine
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `orders` | `order_id` | `Order` | Order rows |
//! | `document_numbers` | `number` | `document_id` | Uniqueness index for PED/ORC numbers |
//! | `transactions` | `transaction_id` | `Transaction` | Ledger rows |
//! | `tracking` | `tracking_id` | `TrackingRecord` | Shipment tracking records |
//! | `quotes` | `quote_id` | `Quote` | Quote rows |
//! | `counters` | `prefix` | `u64` | Last issued sequence per document prefix |
//!
//! # Durability
//!
//! redb commits are durable as soon as `commit()` returns (copy-on-write with
//! atomic pointer swap), so a crash never leaves a half-applied transition.
//! The status write and its ledger rows always land in one transaction.

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use shared::OrderStatus;
use shared::models::{Order, Quote, TrackingRecord, Transaction};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Table for orders: key = order_id, value = JSON-serialized Order
const ORDERS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("orders");

/// Table for the number uniqueness index: key = document number, value = document id
const DOCUMENT_NUMBERS_TABLE: TableDefinition<&str, &str> =
    TableDefinition::new("document_numbers");

/// Table for ledger rows: key = transaction_id, value = JSON-serialized Transaction
const TRANSACTIONS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("transactions");

/// Table for tracking records: key = tracking_id, value = JSON-serialized TrackingRecord
const TRACKING_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("tracking");

/// Table for quotes: key = quote_id, value = JSON-serialized Quote
const QUOTES_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("quotes");

/// Table for document sequence counters: key = prefix ("PED", "ORC"), value = last issued
const COUNTERS_TABLE: TableDefinition<&str, u64> = TableDefinition::new("counters");

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Quote not found: {0}")]
    QuoteNotFound(String),

    #[error("Quote already converted: {0}")]
    QuoteAlreadyConverted(String),

    #[error("Document number already taken: {0}")]
    NumberTaken(String),

    #[error("Order {order_id} moved by another session: expected {expected}, found {actual}")]
    StatusConflict {
        order_id: String,
        expected: OrderStatus,
        actual: OrderStatus,
    },
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Everything one pipeline transition writes, applied atomically
///
/// The status change and its ledger side effects commit together or not at
/// all. `from` is re-checked against the stored row inside the transaction,
/// so a transition raced by another session fails with [`StorageError::StatusConflict`]
/// instead of silently overwriting.
#[derive(Debug, Clone)]
pub struct TransitionWrite {
    pub order_id: String,
    pub from: OrderStatus,
    pub to: OrderStatus,
    /// Ledger rows to insert
    pub inserts: Vec<Transaction>,
    /// Ledger row ids to delete
    pub deletes: Vec<String>,
    /// Value of `revenue_added` after the transition
    pub revenue_added: bool,
    /// Income row currently recognized for the order, if any
    pub revenue_transaction_id: Option<String>,
    /// Expense row tracked for the current production pass, if any
    pub production_expense_id: Option<String>,
    /// Reference link collected with the production expense (set when present)
    pub reference_link: Option<String>,
}

/// Fulfillment storage backed by redb
#[derive(Clone)]
pub struct FulfillmentStorage {
    db: Arc<Database>,
}

impl FulfillmentStorage {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;

        // Create all tables up front so later read transactions never miss one
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(ORDERS_TABLE)?;
            let _ = write_txn.open_table(DOCUMENT_NUMBERS_TABLE)?;
            let _ = write_txn.open_table(TRANSACTIONS_TABLE)?;
            let _ = write_txn.open_table(TRACKING_TABLE)?;
            let _ = write_txn.open_table(QUOTES_TABLE)?;
            let _ = write_txn.open_table(COUNTERS_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Open an in-memory database (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;

        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(ORDERS_TABLE)?;
            let _ = write_txn.open_table(DOCUMENT_NUMBERS_TABLE)?;
            let _ = write_txn.open_table(TRANSACTIONS_TABLE)?;
            let _ = write_txn.open_table(TRACKING_TABLE)?;
            let _ = write_txn.open_table(QUOTES_TABLE)?;
            let _ = write_txn.open_table(COUNTERS_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    // ========== Order Operations ==========

    /// Insert a new order, registering its number in the uniqueness index
    ///
    /// Fails with [`StorageError::NumberTaken`] when another document already
    /// holds the number. The row and the index entry commit together.
    pub fn insert_order(&self, order: &Order) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut numbers = txn.open_table(DOCUMENT_NUMBERS_TABLE)?;
            if numbers.get(order.number.as_str())?.is_some() {
                return Err(StorageError::NumberTaken(order.number.clone()));
            }
            numbers.insert(order.number.as_str(), order.id.as_str())?;

            let mut orders = txn.open_table(ORDERS_TABLE)?;
            let value = serde_json::to_vec(order)?;
            orders.insert(order.id.as_str(), value.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Overwrite an existing order row
    pub fn update_order(&self, order: &Order) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut orders = txn.open_table(ORDERS_TABLE)?;
            if orders.get(order.id.as_str())?.is_none() {
                return Err(StorageError::OrderNotFound(order.id.clone()));
            }
            let value = serde_json::to_vec(order)?;
            orders.insert(order.id.as_str(), value.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Get an order by id
    pub fn get_order(&self, order_id: &str) -> StorageResult<Option<Order>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;

        match table.get(order_id)? {
            Some(value) => {
                let order: Order = serde_json::from_slice(value.value())?;
                Ok(Some(order))
            }
            None => Ok(None),
        }
    }

    /// Get all orders, newest first
    pub fn list_orders(&self) -> StorageResult<Vec<Order>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;

        let mut orders = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            let order: Order = serde_json::from_slice(value.value())?;
            orders.push(order);
        }

        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    // ========== Transition Commit ==========

    /// Apply one pipeline transition atomically
    ///
    /// Re-reads the order inside the write transaction and checks its stored
    /// status against `write.from`; a mismatch aborts with
    /// [`StorageError::StatusConflict`] and nothing is written. On success the
    /// status, the revenue/expense bookkeeping fields, and every ledger
    /// insert/delete are committed in the same transaction.
    pub fn commit_transition(&self, write: &TransitionWrite) -> StorageResult<Order> {
        let txn = self.db.begin_write()?;
        let updated = {
            let mut orders = txn.open_table(ORDERS_TABLE)?;

            let stored = match orders.get(write.order_id.as_str())? {
                Some(value) => serde_json::from_slice::<Order>(value.value())?,
                None => return Err(StorageError::OrderNotFound(write.order_id.clone())),
            };
            if stored.status != write.from {
                return Err(StorageError::StatusConflict {
                    order_id: write.order_id.clone(),
                    expected: write.from,
                    actual: stored.status,
                });
            }

            let mut updated = stored;
            updated.status = write.to;
            updated.revenue_added = write.revenue_added;
            updated.revenue_transaction_id = write.revenue_transaction_id.clone();
            updated.production_expense_id = write.production_expense_id.clone();
            if let Some(link) = &write.reference_link {
                updated.reference_link = Some(link.clone());
            }
            updated.updated_at = shared::util::now_millis();

            let value = serde_json::to_vec(&updated)?;
            orders.insert(write.order_id.as_str(), value.as_slice())?;

            let mut transactions = txn.open_table(TRANSACTIONS_TABLE)?;
            for row in &write.inserts {
                let value = serde_json::to_vec(row)?;
                transactions.insert(row.id.as_str(), value.as_slice())?;
            }
            for id in &write.deletes {
                transactions.remove(id.as_str())?;
            }

            updated
        };
        txn.commit()?;
        Ok(updated)
    }

    // ========== Ledger Operations ==========

    /// Insert a ledger row
    pub fn insert_transaction(&self, row: &Transaction) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(TRANSACTIONS_TABLE)?;
            let value = serde_json::to_vec(row)?;
            table.insert(row.id.as_str(), value.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Delete a ledger row (no-op when absent)
    pub fn delete_transaction(&self, transaction_id: &str) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(TRANSACTIONS_TABLE)?;
            table.remove(transaction_id)?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Get a ledger row by id
    pub fn get_transaction(&self, transaction_id: &str) -> StorageResult<Option<Transaction>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(TRANSACTIONS_TABLE)?;

        match table.get(transaction_id)? {
            Some(value) => {
                let row: Transaction = serde_json::from_slice(value.value())?;
                Ok(Some(row))
            }
            None => Ok(None),
        }
    }

    /// Get all ledger rows, newest first
    pub fn list_transactions(&self) -> StorageResult<Vec<Transaction>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(TRANSACTIONS_TABLE)?;

        let mut rows = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            let row: Transaction = serde_json::from_slice(value.value())?;
            rows.push(row);
        }

        rows.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(rows)
    }

    // ========== Tracking Operations ==========

    /// Insert a tracking record
    pub fn insert_tracking(&self, record: &TrackingRecord) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(TRACKING_TABLE)?;
            let value = serde_json::to_vec(record)?;
            table.insert(record.id.as_str(), value.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Get all tracking records, newest first
    pub fn list_tracking(&self) -> StorageResult<Vec<TrackingRecord>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(TRACKING_TABLE)?;

        let mut records = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            let record: TrackingRecord = serde_json::from_slice(value.value())?;
            records.push(record);
        }

        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    // ========== Quote Operations ==========

    /// Insert a new quote, registering its number in the uniqueness index
    pub fn insert_quote(&self, quote: &Quote) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut numbers = txn.open_table(DOCUMENT_NUMBERS_TABLE)?;
            if numbers.get(quote.number.as_str())?.is_some() {
                return Err(StorageError::NumberTaken(quote.number.clone()));
            }
            numbers.insert(quote.number.as_str(), quote.id.as_str())?;

            let mut quotes = txn.open_table(QUOTES_TABLE)?;
            let value = serde_json::to_vec(quote)?;
            quotes.insert(quote.id.as_str(), value.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Get a quote by id
    pub fn get_quote(&self, quote_id: &str) -> StorageResult<Option<Quote>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(QUOTES_TABLE)?;

        match table.get(quote_id)? {
            Some(value) => {
                let quote: Quote = serde_json::from_slice(value.value())?;
                Ok(Some(quote))
            }
            None => Ok(None),
        }
    }

    /// Get all quotes, newest first
    pub fn list_quotes(&self) -> StorageResult<Vec<Quote>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(QUOTES_TABLE)?;

        let mut quotes = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            let quote: Quote = serde_json::from_slice(value.value())?;
            quotes.push(quote);
        }

        quotes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(quotes)
    }

    /// Convert a quote: insert the new order and mark the quote, atomically
    ///
    /// Fails with [`StorageError::QuoteAlreadyConverted`] when the quote was
    /// converted before; neither write happens in that case.
    pub fn mark_quote_converted(&self, quote_id: &str, order: &Order) -> StorageResult<Quote> {
        let txn = self.db.begin_write()?;
        let converted = {
            let mut quotes = txn.open_table(QUOTES_TABLE)?;

            let stored = match quotes.get(quote_id)? {
                Some(value) => serde_json::from_slice::<Quote>(value.value())?,
                None => return Err(StorageError::QuoteNotFound(quote_id.to_string())),
            };
            if stored.converted {
                return Err(StorageError::QuoteAlreadyConverted(quote_id.to_string()));
            }

            let mut converted = stored;
            converted.converted = true;
            converted.converted_order_id = Some(order.id.clone());

            let value = serde_json::to_vec(&converted)?;
            quotes.insert(quote_id, value.as_slice())?;

            let mut numbers = txn.open_table(DOCUMENT_NUMBERS_TABLE)?;
            if numbers.get(order.number.as_str())?.is_some() {
                return Err(StorageError::NumberTaken(order.number.clone()));
            }
            numbers.insert(order.number.as_str(), order.id.as_str())?;

            let mut orders = txn.open_table(ORDERS_TABLE)?;
            let value = serde_json::to_vec(order)?;
            orders.insert(order.id.as_str(), value.as_slice())?;

            converted
        };
        txn.commit()?;
        Ok(converted)
    }

    // ========== Document Sequence Counters ==========

    /// Increment and return the sequence for a document prefix
    ///
    /// The increment commits in its own transaction, so concurrent draws
    /// always yield distinct values.
    pub fn next_document_seq(&self, prefix: &str) -> StorageResult<u64> {
        let txn = self.db.begin_write()?;
        let next = {
            let mut table = txn.open_table(COUNTERS_TABLE)?;
            let current = table.get(prefix)?.map(|g| g.value()).unwrap_or(0);
            let next = current + 1;
            table.insert(prefix, next)?;
            next
        };
        txn.commit()?;
        Ok(next)
    }

    /// Get the current sequence for a prefix without incrementing
    pub fn peek_document_seq(&self, prefix: &str) -> StorageResult<u64> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(COUNTERS_TABLE)?;
        Ok(table.get(prefix)?.map(|g| g.value()).unwrap_or(0))
    }

    /// Seed the counter for a prefix from existing document numbers
    ///
    /// One-time migration for databases that predate the counters table: when
    /// no counter exists for `prefix`, scans the number index for the highest
    /// integer suffix and stores it. Once a counter exists this is a no-op,
    /// and sequence draws never consult the scan again.
    pub fn seed_document_seq(&self, prefix: &str) -> StorageResult<u64> {
        let txn = self.db.begin_write()?;
        let seeded = {
            let mut counters = txn.open_table(COUNTERS_TABLE)?;
            let existing = counters.get(prefix)?.map(|g| g.value());

            match existing {
                Some(value) => value,
                None => {
                    let numbers = txn.open_table(DOCUMENT_NUMBERS_TABLE)?;
                    let mut max_seq = 0u64;
                    for result in numbers.iter()? {
                        let (key, _value) = result?;
                        if let Some(suffix) = key.value().strip_prefix(prefix)
                            && let Ok(seq) = suffix.parse::<u64>()
                        {
                            max_seq = max_seq.max(seq);
                        }
                    }
                    counters.insert(prefix, max_seq)?;
                    max_seq
                }
            }
        };
        txn.commit()?;
        Ok(seeded)
    }

    /// List all document numbers with the given prefix
    pub fn list_document_numbers(&self, prefix: &str) -> StorageResult<Vec<String>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(DOCUMENT_NUMBERS_TABLE)?;

        let mut numbers = Vec::new();
        for result in table.iter()? {
            let (key, _value) = result?;
            if key.value().starts_with(prefix) {
                numbers.push(key.value().to_string());
            }
        }
        Ok(numbers)
    }
}
