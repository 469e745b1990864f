//! Shared wrapper around the board reducer
//!
//! One instance is shared by the transition controller and the API. The
//! lock is only ever held for the duration of a fold or a read, never
//! across an await point.

use parking_lot::RwLock;
use shared::OrderStatus;
use shared::models::Order;

use super::state::{BoardEvent, BoardState, BoardView};

/// Outcome of [`BoardStore::try_start`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartClaim {
    /// Claimed; the board shows the optimistic row
    Started,
    /// Another commit holds the order
    InFlight,
    /// The board row moved past the caller's read of the order
    StaleRow { found: OrderStatus },
}

#[derive(Default)]
pub struct BoardStore {
    state: RwLock<BoardState>,
}

impl BoardStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one event into the shared state
    pub fn apply(&self, event: BoardEvent) {
        let mut guard = self.state.write();
        *guard = std::mem::take(&mut *guard).apply(event);
    }

    /// Atomically claim an order for a commit
    ///
    /// The in-flight check and the optimistic marking happen under one
    /// write lock, so two concurrent commits for the same order cannot
    /// both pass. `seed` is the freshly read stored row; it becomes the
    /// retained pre-image. A board row whose status no longer matches
    /// the seed means the caller lost a race to a finished commit, and
    /// the claim is refused before anything is touched.
    pub fn try_start(&self, seed: &Order, to: OrderStatus) -> StartClaim {
        let mut guard = self.state.write();
        if guard.is_in_flight(&seed.id) {
            return StartClaim::InFlight;
        }
        if let Some(current) = guard.get(&seed.id)
            && current.status != seed.status
        {
            return StartClaim::StaleRow {
                found: current.status,
            };
        }
        let state = std::mem::take(&mut *guard)
            .apply(BoardEvent::Upserted {
                order: seed.clone(),
            })
            .apply(BoardEvent::TransitionStarted {
                order_id: seed.id.clone(),
                to,
            });
        *guard = state;
        StartClaim::Started
    }

    pub fn get(&self, order_id: &str) -> Option<Order> {
        self.state.read().get(order_id).cloned()
    }

    pub fn is_in_flight(&self, order_id: &str) -> bool {
        self.state.read().is_in_flight(order_id)
    }

    /// Snapshot for the API
    pub fn view(&self) -> BoardView {
        self.state.read().view()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::OrderStatus;

    #[test]
    fn test_apply_and_read_through_lock() {
        let store = BoardStore::new();
        let order = Order::new("PED00001", "c1", "Ana Souza", 250.0);

        store.apply(BoardEvent::Upserted {
            order: order.clone(),
        });
        store.apply(BoardEvent::TransitionStarted {
            order_id: order.id.clone(),
            to: OrderStatus::CreatingArt,
        });

        assert!(store.is_in_flight(&order.id));
        assert_eq!(store.get(&order.id).unwrap().status, OrderStatus::CreatingArt);
        assert_eq!(store.view().in_flight.len(), 1);
    }

    #[test]
    fn test_try_start_claims_once() {
        let store = BoardStore::new();
        let order = Order::new("PED00001", "c1", "Ana Souza", 250.0);

        assert_eq!(
            store.try_start(&order, OrderStatus::CreatingArt),
            StartClaim::Started
        );
        assert!(store.is_in_flight(&order.id));
        assert_eq!(store.get(&order.id).unwrap().status, OrderStatus::CreatingArt);

        // A second claim while the first is open changes nothing
        assert_eq!(
            store.try_start(&order, OrderStatus::Production),
            StartClaim::InFlight
        );
        assert_eq!(store.get(&order.id).unwrap().status, OrderStatus::CreatingArt);
    }

    #[test]
    fn test_try_start_refuses_stale_seed() {
        let store = BoardStore::new();
        let order = Order::new("PED00001", "c1", "Ana Souza", 250.0);

        // A finished commit left the board ahead of the caller's read
        let mut committed = order.clone();
        committed.status = OrderStatus::CreatingArt;
        committed.revenue_added = true;
        store.apply(BoardEvent::Upserted { order: committed });

        assert_eq!(
            store.try_start(&order, OrderStatus::Production),
            StartClaim::StaleRow {
                found: OrderStatus::CreatingArt
            }
        );

        // The committed row is untouched and nothing is in flight
        let row = store.get(&order.id).unwrap();
        assert_eq!(row.status, OrderStatus::CreatingArt);
        assert!(row.revenue_added);
        assert!(!store.is_in_flight(&order.id));
    }

    #[test]
    fn test_try_start_released_by_commit_and_rollback() {
        let store = BoardStore::new();
        let order = Order::new("PED00001", "c1", "Ana Souza", 250.0);

        assert_eq!(
            store.try_start(&order, OrderStatus::CreatingArt),
            StartClaim::Started
        );
        store.apply(BoardEvent::TransitionFailed {
            order_id: order.id.clone(),
        });
        assert!(!store.is_in_flight(&order.id));
        assert_eq!(
            store.get(&order.id).unwrap().status,
            OrderStatus::AwaitingPayment
        );

        // Rolled back, so the slot is free for the next claim
        assert_eq!(
            store.try_start(&order, OrderStatus::CreatingArt),
            StartClaim::Started
        );

        let mut confirmed = order.clone();
        confirmed.status = OrderStatus::CreatingArt;
        store.apply(BoardEvent::TransitionCommitted {
            order: confirmed.clone(),
        });
        assert!(!store.is_in_flight(&order.id));

        // Committed as well; the next claim starts from the confirmed row
        assert_eq!(
            store.try_start(&confirmed, OrderStatus::Production),
            StartClaim::Started
        );
    }
}
