//! API Routing Module
//!
//! # Structure
//!
//! - [`health`] - Health check
//! - [`orders`] - Order CRUD
//! - [`board`] - Board view, refresh and drop
//! - [`transitions`] - Suspended-transition tickets (confirm/skip/cancel)
//! - [`transactions`] - Financial ledger queries
//! - [`tracking`] - Shipment tracking queries
//! - [`quotes`] - Quotes and quote conversion

use axum::Router;

use crate::core::ServerState;

pub mod health;

// Fulfillment API
pub mod board;
pub mod orders;
pub mod quotes;
pub mod tracking;
pub mod transactions;
pub mod transitions;

// Re-export common types for handlers
pub use crate::utils::{ApiResponse, AppResult};

/// Build the Axum router (without state)
pub fn build_app() -> Router<ServerState> {
    Router::<ServerState>::new()
        // Core APIs
        .merge(health::router())
        // Fulfillment APIs
        .merge(orders::router())
        .merge(board::router())
        .merge(transitions::router())
        .merge(transactions::router())
        .merge(tracking::router())
        .merge(quotes::router())
}
