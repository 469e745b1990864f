//! Tracking API Module
//!
//! Read-only access to shipment tracking records; the controller writes
//! them when an order enters shipping.

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

/// Tracking router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/tracking", routes())
}

fn routes() -> Router<ServerState> {
    Router::new().route("/", get(handler::list))
}
