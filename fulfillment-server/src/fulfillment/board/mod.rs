//! Optimistic view store for the fulfillment board
//!
//! - [`state`]: the pure reducer over the working copy and in-flight set
//! - [`store`]: the lock-wrapped instance shared across the server

pub mod state;
pub mod store;

pub use state::{BoardEvent, BoardState, BoardView};
pub use store::{BoardStore, StartClaim};
