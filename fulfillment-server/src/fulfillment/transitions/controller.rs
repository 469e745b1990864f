//! Status transition controller
//!
//! Owns the full life of a pipeline move: validation, side-effect
//! derivation, the blocking input-collection step, the optimistic board
//! update, the atomic storage commit, and the best-effort tracking
//! insert. Suspended transitions live in a ticket registry; the engine
//! never holds a task hostage waiting for input.

use std::sync::Arc;

use dashmap::DashMap;
use shared::OrderStatus;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::fulfillment::{CollectionInput, CollectionKind, FulfillmentEvent, TransitionOutcome};
use shared::models::Order;
use shared::util::{new_id, now_millis};
use tokio::sync::broadcast;

use crate::fulfillment::board::{BoardEvent, BoardStore, StartClaim};
use crate::fulfillment::ledger::LedgerOps;
use crate::fulfillment::money;
use crate::fulfillment::storage::TransitionWrite;
use crate::fulfillment::store::FulfillmentStore;
use crate::fulfillment::tracking::TrackingCreator;

use super::plan::{ExpenseAction, TransitionPlan};

/// A transition suspended waiting for collected input
#[derive(Debug, Clone)]
pub struct PendingTransition {
    pub order_id: String,
    pub plan: TransitionPlan,
    pub kind: CollectionKind,
    pub created_at: i64,
}

pub struct TransitionController {
    store: Arc<dyn FulfillmentStore>,
    board: Arc<BoardStore>,
    tracking: TrackingCreator,
    event_tx: broadcast::Sender<FulfillmentEvent>,
    /// Open tickets, keyed by ticket id. Single-use; a newer attempt for
    /// the same order supersedes any open ticket.
    pending: DashMap<String, PendingTransition>,
}

impl TransitionController {
    pub fn new(
        store: Arc<dyn FulfillmentStore>,
        board: Arc<BoardStore>,
        event_tx: broadcast::Sender<FulfillmentEvent>,
    ) -> Self {
        let tracking = TrackingCreator::new(store.clone());
        Self {
            store,
            board,
            tracking,
            event_tx,
            pending: DashMap::new(),
        }
    }

    /// Attempt to move an order to a new pipeline state
    ///
    /// Input-free moves commit before returning. Moves that need collected
    /// input return a ticket and emit `collection_required`; nothing is
    /// persisted or optimistically applied until the ticket resolves. A
    /// same-status drop returns the order untouched with no events.
    pub async fn attempt(&self, order_id: &str, to: OrderStatus) -> AppResult<TransitionOutcome> {
        let order = self
            .store
            .get_order(order_id)
            .await?
            .ok_or_else(|| AppError::order_not_found(order_id))?;

        // Fast reject; the commit claim re-checks under the board lock
        if self.board.is_in_flight(order_id) {
            return Err(AppError::transition_in_flight(order_id));
        }
        self.supersede(order_id);

        let Some(plan) = TransitionPlan::derive(&order, to) else {
            return Ok(TransitionOutcome::Completed { order });
        };

        match plan.collection_kind() {
            None => {
                let updated = self.commit(order, plan, CollectionInput::default()).await?;
                Ok(TransitionOutcome::Completed { order: updated })
            }
            Some(kind) => {
                let ticket = new_id();
                self.pending.insert(
                    ticket.clone(),
                    PendingTransition {
                        order_id: order.id.clone(),
                        plan,
                        kind,
                        created_at: now_millis(),
                    },
                );
                self.emit(FulfillmentEvent::CollectionRequired {
                    order_id: order.id.clone(),
                    ticket: ticket.clone(),
                    kind,
                });
                tracing::info!(order_id = %order.id, %kind, "Transition suspended for input collection");
                Ok(TransitionOutcome::InputRequired { ticket, kind })
            }
        }
    }

    /// Supply the collected input for a suspended transition and commit
    ///
    /// Validation happens before the ticket is consumed, so a rejected
    /// input leaves the ticket open for another try.
    pub async fn confirm(&self, ticket: &str, input: CollectionInput) -> AppResult<Order> {
        let pending = self
            .pending
            .get(ticket)
            .map(|p| p.value().clone())
            .ok_or_else(|| AppError::ticket_not_found(ticket))?;

        let input = match pending.kind {
            CollectionKind::Expense => {
                let amount = input
                    .amount
                    .ok_or_else(|| AppError::new(ErrorCode::ExpenseAmountRequired))?;
                let amount = money::validate_amount(amount, "amount")?;
                CollectionInput {
                    amount: Some(amount),
                    reference_link: input.reference_link.filter(|l| !l.trim().is_empty()),
                    ..Default::default()
                }
            }
            CollectionKind::Tracking => {
                let code = input
                    .tracking_code
                    .as_deref()
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .ok_or_else(|| AppError::new(ErrorCode::TrackingCodeRequired))?;
                CollectionInput {
                    tracking_code: Some(code.to_string()),
                    estimated_delivery: input.estimated_delivery,
                    ..Default::default()
                }
            }
        };

        self.resolve(ticket, input).await
    }

    /// Commit a suspended shipping transition without tracking data
    pub async fn skip(&self, ticket: &str) -> AppResult<Order> {
        let pending = self
            .pending
            .get(ticket)
            .map(|p| p.value().clone())
            .ok_or_else(|| AppError::ticket_not_found(ticket))?;
        if pending.kind != CollectionKind::Tracking {
            return Err(AppError::new(ErrorCode::SkipNotAllowed));
        }
        self.resolve(ticket, CollectionInput::default()).await
    }

    /// Discard a suspended transition before any persistence or board
    /// mutation; no side effects, no events
    pub fn cancel(&self, ticket: &str) -> AppResult<()> {
        match self.pending.remove(ticket) {
            Some((_, pending)) => {
                tracing::debug!(order_id = %pending.order_id, "Pending transition cancelled");
                Ok(())
            }
            None => Err(AppError::ticket_not_found(ticket)),
        }
    }

    /// Open tickets held for an order (used by tests and diagnostics)
    pub fn pending_for(&self, order_id: &str) -> Vec<PendingTransition> {
        self.pending
            .iter()
            .filter(|entry| entry.value().order_id == order_id)
            .map(|entry| entry.value().clone())
            .collect()
    }

    fn emit(&self, event: FulfillmentEvent) {
        if self.event_tx.send(event).is_err() {
            tracing::warn!("Event broadcast failed: no active receivers");
        }
    }

    /// A newer attempt for an order invalidates its open tickets
    fn supersede(&self, order_id: &str) {
        self.pending.retain(|_, p| p.order_id != order_id);
    }

    /// Consume the ticket and run the commit sequence
    async fn resolve(&self, ticket: &str, input: CollectionInput) -> AppResult<Order> {
        let Some((_, pending)) = self.pending.remove(ticket) else {
            // Lost a race with a concurrent resolve or a superseding attempt
            return Err(AppError::ticket_not_found(ticket));
        };

        let order = self
            .store
            .get_order(&pending.order_id)
            .await?
            .ok_or_else(|| AppError::order_not_found(&pending.order_id))?;
        if order.status != pending.plan.from {
            return Err(AppError::with_message(
                ErrorCode::TransitionConflict,
                format!(
                    "Order {} moved while input was collected: expected {}, found {}",
                    order.id, pending.plan.from, order.status
                ),
            )
            .with_detail("order_id", order.id.clone()));
        }

        self.commit(order, pending.plan, input).await
    }

    /// The commit sequence: board claim, atomic storage commit,
    /// best-effort tracking, finalize or roll back
    async fn commit(
        &self,
        order: Order,
        plan: TransitionPlan,
        input: CollectionInput,
    ) -> AppResult<Order> {
        let ops = LedgerOps::for_plan(&order, &plan, &input)?;
        let reference_link = if plan.expense == Some(ExpenseAction::Collect) {
            input.reference_link.clone()
        } else {
            None
        };
        let write = TransitionWrite {
            order_id: order.id.clone(),
            from: plan.from,
            to: plan.to,
            inserts: ops.inserts,
            deletes: ops.deletes,
            revenue_added: ops.revenue_added_after,
            revenue_transaction_id: ops.revenue_transaction_id_after,
            production_expense_id: ops.production_expense_id_after,
            reference_link,
        };

        // Claim the order under one board lock: the in-flight check and
        // the optimistic marking cannot be split by a rival commit, and a
        // claim seeded from a stale read is refused outright
        match self.board.try_start(&order, plan.to) {
            StartClaim::Started => {}
            StartClaim::InFlight => {
                return Err(AppError::transition_in_flight(&order.id));
            }
            StartClaim::StaleRow { found } => {
                return Err(AppError::with_message(
                    ErrorCode::TransitionConflict,
                    format!(
                        "Order {} moved before the commit: expected {}, found {}",
                        order.id, plan.from, found
                    ),
                )
                .with_detail("order_id", order.id.clone()));
            }
        }

        let updated = match self.store.commit_transition(&write).await {
            Ok(updated) => updated,
            Err(err) => {
                self.board.apply(BoardEvent::TransitionFailed {
                    order_id: order.id.clone(),
                });
                self.emit(FulfillmentEvent::TransitionFailed {
                    order_id: order.id.clone(),
                    from: plan.from,
                    to: plan.to,
                    reason: err.to_string(),
                });
                tracing::error!(
                    order_id = %order.id,
                    from = %plan.from,
                    to = %plan.to,
                    error = %err,
                    "Transition commit failed, board rolled back"
                );
                return Err(err);
            }
        };

        // Tracking is best-effort once the status is durable
        let mut tracking_created = false;
        if plan.collect_tracking
            && let Some(code) = input.tracking_code.as_deref()
        {
            match self
                .tracking
                .create(&updated, code, input.estimated_delivery)
                .await
            {
                Ok(_) => tracking_created = true,
                Err(err) => {
                    tracing::warn!(
                        order_id = %updated.id,
                        error = %err,
                        "Tracking record creation failed after commit"
                    );
                }
            }
        }

        self.board.apply(BoardEvent::TransitionCommitted {
            order: updated.clone(),
        });
        self.emit(FulfillmentEvent::TransitionSucceeded {
            order_id: updated.id.clone(),
            from: plan.from,
            to: plan.to,
            tracking_created,
        });
        tracing::info!(order_id = %updated.id, from = %plan.from, to = %plan.to, "Transition committed");
        Ok(updated)
    }
}
