//! Pure board state reducer
//!
//! The board holds a working copy of all orders plus the set of orders
//! with a write in flight. Every mutation is an event folded through
//! [`BoardState::apply`], which keeps the update rules independently
//! testable and makes the no-clobber refresh rule explicit.

use serde::Serialize;
use shared::OrderStatus;
use shared::models::Order;
use std::collections::HashMap;

/// Events folded into the board's working copy
#[derive(Debug, Clone)]
pub enum BoardEvent {
    /// Optimistically move an order; the pre-image is retained for rollback
    TransitionStarted { order_id: String, to: OrderStatus },
    /// The commit succeeded; the server-confirmed row replaces the entry
    TransitionCommitted { order: Order },
    /// The commit failed; the entry snaps back to its pre-image
    TransitionFailed { order_id: String },
    /// Background re-pull from storage
    Refreshed { orders: Vec<Order> },
    /// Creation and edit flows
    Upserted { order: Order },
}

/// Serializable snapshot of the board for the API
#[derive(Debug, Clone, Serialize)]
pub struct BoardView {
    pub orders: Vec<Order>,
    pub in_flight: Vec<String>,
}

/// Working copy of orders plus in-flight pre-images
#[derive(Debug, Clone, Default)]
pub struct BoardState {
    orders: HashMap<String, Order>,
    in_flight: HashMap<String, Order>,
}

impl BoardState {
    /// Fold one event into the state
    pub fn apply(mut self, event: BoardEvent) -> BoardState {
        match event {
            BoardEvent::TransitionStarted { order_id, to } => {
                if let Some(current) = self.orders.get(&order_id).cloned() {
                    self.in_flight.insert(order_id.clone(), current.clone());
                    let mut optimistic = current;
                    optimistic.status = to;
                    self.orders.insert(order_id, optimistic);
                }
            }
            BoardEvent::TransitionCommitted { order } => {
                self.in_flight.remove(&order.id);
                self.orders.insert(order.id.clone(), order);
            }
            BoardEvent::TransitionFailed { order_id } => {
                if let Some(pre_image) = self.in_flight.remove(&order_id) {
                    self.orders.insert(order_id, pre_image);
                }
            }
            BoardEvent::Refreshed { orders } => {
                let mut next: HashMap<String, Order> =
                    orders.into_iter().map(|o| (o.id.clone(), o)).collect();
                // In-flight entries keep their optimistic value, even when
                // the refresh carries a stale row or omits them entirely
                for order_id in self.in_flight.keys() {
                    if let Some(current) = self.orders.get(order_id) {
                        next.insert(order_id.clone(), current.clone());
                    }
                }
                self.orders = next;
            }
            BoardEvent::Upserted { order } => {
                self.orders.insert(order.id.clone(), order);
            }
        }
        self
    }

    pub fn get(&self, order_id: &str) -> Option<&Order> {
        self.orders.get(order_id)
    }

    pub fn is_in_flight(&self, order_id: &str) -> bool {
        self.in_flight.contains_key(order_id)
    }

    /// Pre-transition row for an in-flight order
    pub fn pre_image(&self, order_id: &str) -> Option<&Order> {
        self.in_flight.get(order_id)
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Snapshot for the API: orders newest first plus in-flight ids
    pub fn view(&self) -> BoardView {
        let mut orders: Vec<Order> = self.orders.values().cloned().collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let mut in_flight: Vec<String> = self.in_flight.keys().cloned().collect();
        in_flight.sort();
        BoardView { orders, in_flight }
    }
}
