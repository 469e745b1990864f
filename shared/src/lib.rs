//! Shared types for the Atelier fulfillment stack
//!
//! Common types used by the fulfillment server and its clients: domain
//! models, pipeline status and event types, error types, and response
//! structures.

pub mod error;
pub mod fulfillment;
pub mod models;
pub mod util;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};

// Fulfillment re-exports (for convenient access)
pub use fulfillment::{CollectionKind, FulfillmentEvent, OrderStatus};
pub use models::{Order, Quote, TrackingRecord, Transaction};
