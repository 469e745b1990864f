//! Order Fulfillment Engine
//!
//! This module implements the fulfillment pipeline and its financial
//! reconciliation:
//!
//! - **engine**: Facade owning the store, board, controller, and numbering
//! - **transitions**: Pair-derived side effects and commit orchestration
//! - **ledger**: Translation of a transition plan into ledger writes
//! - **board**: Optimistic working copy with in-flight tracking
//! - **numbering**: Prefixed sequential document numbers
//! - **tracking**: Post-commit shipment record creation
//! - **storage**: redb-based persistence layer
//! - **store**: Persistence trait the engine programs against
//! - **money**: Decimal-backed amount validation
//!
//! # Architecture
//!
//! ```text
//! Drop → TransitionController → TransitionPlan → LedgerOps
//!              ↓                                     ↓
//!        Board (optimistic)              commit_transition (atomic)
//!              ↓                                     ↓
//!        finalize / rollback  ←----  success / failure
//!              ↓
//!        Broadcast event (+ best-effort tracking insert)
//! ```
//!
//! # Data Flow
//!
//! 1. The API hands a drop `(order_id, to)` to the controller
//! 2. The plan is derived from the (from, to) pair; same-status is a no-op
//! 3. Plans needing input suspend into a ticket (confirm / skip / cancel)
//! 4. The board entry is claimed under one lock and moves optimistically,
//!    pre-image retained
//! 5. Status, revenue flag, and ledger rows commit in one transaction
//! 6. Tracking record is inserted best-effort after the commit
//! 7. The board finalizes (or rolls back) and an event is broadcast

pub mod board;
pub mod engine;
pub mod ledger;
pub mod money;
pub mod numbering;
pub mod storage;
pub mod store;
pub mod tracking;
pub mod transitions;

// Re-exports
pub use board::{BoardEvent, BoardState, BoardStore, BoardView, StartClaim};
pub use engine::{Engine, QuoteConversion};
pub use numbering::DocumentNumbers;
pub use storage::{FulfillmentStorage, StorageError, StorageResult, TransitionWrite};
pub use store::FulfillmentStore;
pub use transitions::{TransitionController, TransitionPlan};

// Re-export shared types for convenience
pub use shared::fulfillment::{
    CollectionInput, CollectionKind, DropRequest, FulfillmentEvent, OrderStatus, TransitionOutcome,
};
