//! Pipeline transition handling
//!
//! - [`plan`]: pure derivation of side effects from the (from, to) pair
//! - [`controller`]: validation, input collection, commit orchestration

pub mod controller;
pub mod plan;

pub use controller::{PendingTransition, TransitionController};
pub use plan::{ExpenseAction, RevenueAction, TransitionPlan};
