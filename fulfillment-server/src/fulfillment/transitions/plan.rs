//! Pure side-effect derivation for pipeline moves
//!
//! The board allows arbitrary drag targets, so every effect is derived
//! from the (from, to) pair. The target state alone decides nothing:
//! `production → shipping` collects a tracking code, while
//! `shipping → shipping` is a complete no-op.

use shared::OrderStatus;
use shared::fulfillment::CollectionKind;
use shared::models::Order;

/// What happens to recognized revenue on this move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevenueAction {
    /// Recognize income for the order total
    Add,
    /// Delete the recognized income row and clear the flag
    Remove,
}

/// What happens to the production expense on this move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpenseAction {
    /// Collect an amount (and optional reference link) and insert a row
    Collect,
    /// Delete the tracked expense row
    Remove,
}

/// Derived effects of one pipeline move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionPlan {
    pub from: OrderStatus,
    pub to: OrderStatus,
    pub revenue: Option<RevenueAction>,
    pub expense: Option<ExpenseAction>,
    /// Entering shipping: collect a tracking code (skippable)
    pub collect_tracking: bool,
}

impl TransitionPlan {
    /// Derive the plan for moving `order` to `to`
    ///
    /// Returns `None` for a same-status drop: nothing is persisted and no
    /// events fire.
    pub fn derive(order: &Order, to: OrderStatus) -> Option<TransitionPlan> {
        let from = order.status;
        if from == to {
            return None;
        }

        let revenue = if from == OrderStatus::AwaitingPayment && !order.revenue_added {
            Some(RevenueAction::Add)
        } else if to == OrderStatus::AwaitingPayment && order.revenue_added {
            Some(RevenueAction::Remove)
        } else {
            None
        };

        let expense = if to == OrderStatus::Production {
            Some(ExpenseAction::Collect)
        } else if from == OrderStatus::Production && to == OrderStatus::CreatingArt {
            Some(ExpenseAction::Remove)
        } else {
            None
        };

        Some(TransitionPlan {
            from,
            to,
            revenue,
            expense,
            collect_tracking: to == OrderStatus::Shipping,
        })
    }

    /// Input the controller must collect before this plan can commit
    pub fn collection_kind(&self) -> Option<CollectionKind> {
        if self.expense == Some(ExpenseAction::Collect) {
            Some(CollectionKind::Expense)
        } else if self.collect_tracking {
            Some(CollectionKind::Tracking)
        } else {
            None
        }
    }
}
