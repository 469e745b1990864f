//! Data models
//!
//! Shared between fulfillment-server and frontend (via API).
//! All IDs are UUID v4 strings; money amounts are currency-unit `f64`.

pub mod order;
pub mod quote;
pub mod tracking;
pub mod transaction;

// Re-exports
pub use order::*;
pub use quote::*;
pub use tracking::*;
pub use transaction::*;
