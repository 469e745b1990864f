//! Fulfillment pipeline types shared across the API boundary
//!
//! - [`OrderStatus`]: the five-column pipeline status
//! - [`FulfillmentEvent`] / [`CollectionKind`]: engine-to-UI event stream
//! - [`DropRequest`] / [`CollectionInput`] / [`TransitionOutcome`]: transition DTOs

pub mod event;
pub mod input;
pub mod status;

pub use event::{CollectionKind, FulfillmentEvent};
pub use input::{CollectionInput, DropRequest, TransitionOutcome};
pub use status::{InvalidStatus, OrderStatus};
