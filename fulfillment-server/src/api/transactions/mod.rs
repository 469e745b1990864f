//! Transaction API Module
//!
//! Read-only access to the financial ledger. Rows are written and deleted
//! by transition commits only.

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

/// Transaction router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/transactions", routes())
}

fn routes() -> Router<ServerState> {
    Router::new().route("/", get(handler::list))
}
