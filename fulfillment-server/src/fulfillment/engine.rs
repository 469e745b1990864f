//! Fulfillment engine
//!
//! Owns the store, the board, the transition controller, the document
//! numbering generator, and the event channel. Everything the API layer
//! does goes through here.

use std::sync::Arc;

use serde::Serialize;
use shared::OrderStatus;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::fulfillment::{CollectionInput, FulfillmentEvent, TransitionOutcome};
use shared::models::{
    Order, OrderCreate, OrderUpdate, Quote, QuoteCreate, TrackingRecord, Transaction,
    TransactionKind,
};
use shared::util::now_millis;
use tokio::sync::broadcast;

use super::board::{BoardEvent, BoardStore, BoardView};
use super::money;
use super::numbering::DocumentNumbers;
use super::store::FulfillmentStore;
use super::transitions::TransitionController;

/// Result of converting a quote into an order
#[derive(Debug, Clone, Serialize)]
pub struct QuoteConversion {
    pub quote: Quote,
    pub order: Order,
}

pub struct Engine {
    store: Arc<dyn FulfillmentStore>,
    board: Arc<BoardStore>,
    controller: TransitionController,
    numbers: DocumentNumbers,
    event_tx: broadcast::Sender<FulfillmentEvent>,
}

impl Engine {
    /// Build the engine: seed the numbering counters and load the board
    pub async fn new(store: Arc<dyn FulfillmentStore>, event_capacity: usize) -> AppResult<Self> {
        let (event_tx, _) = broadcast::channel(event_capacity);
        let board = Arc::new(BoardStore::new());
        let numbers = DocumentNumbers::new(store.clone());
        numbers.seed().await?;

        let controller = TransitionController::new(store.clone(), board.clone(), event_tx.clone());
        let engine = Self {
            store,
            board,
            controller,
            numbers,
            event_tx,
        };
        engine.refresh_board().await?;
        Ok(engine)
    }

    /// Subscribe to the engine event stream
    pub fn subscribe(&self) -> broadcast::Receiver<FulfillmentEvent> {
        self.event_tx.subscribe()
    }

    // ========== Board ==========

    /// Current board snapshot
    pub fn board_view(&self) -> BoardView {
        self.board.view()
    }

    /// Re-pull all orders from storage through the reducer
    ///
    /// In-flight entries keep their optimistic value; see the board rules.
    pub async fn refresh_board(&self) -> AppResult<BoardView> {
        let orders = self.store.list_orders().await?;
        self.board.apply(BoardEvent::Refreshed { orders });
        Ok(self.board.view())
    }

    // ========== Orders ==========

    pub async fn create_order(&self, create: OrderCreate) -> AppResult<Order> {
        let total = money::validate_amount(create.total, "total")?;
        let client_id = required_field(&create.client_id, "client_id")?;
        let client_name = required_field(&create.client_name, "client_name")?;

        match self
            .insert_new_order(&create, &client_id, &client_name, total)
            .await
        {
            Err(err) if err.code == ErrorCode::NumberingCollision => {
                tracing::warn!(message = %err, "Order number collision, retrying with a fresh number");
                self.insert_new_order(&create, &client_id, &client_name, total)
                    .await
            }
            other => other,
        }
    }

    async fn insert_new_order(
        &self,
        create: &OrderCreate,
        client_id: &str,
        client_name: &str,
        total: f64,
    ) -> AppResult<Order> {
        let number = self.numbers.next_order_number().await?;
        let mut order = Order::new(number, client_id, client_name, total);
        order.notes = create.notes.clone();
        order.scheduled_date = create.scheduled_date;

        self.store.insert_order(&order).await?;
        self.board.apply(BoardEvent::Upserted {
            order: order.clone(),
        });
        tracing::info!(order_id = %order.id, number = %order.number, "Order created");
        Ok(order)
    }

    pub async fn get_order(&self, order_id: &str) -> AppResult<Order> {
        self.store
            .get_order(order_id)
            .await?
            .ok_or_else(|| AppError::order_not_found(order_id))
    }

    pub async fn list_orders(&self) -> AppResult<Vec<Order>> {
        self.store.list_orders().await
    }

    /// Edit non-pipeline fields of an order
    ///
    /// Status and the bookkeeping fields are out of reach here; they move
    /// only through transitions. Rejected while the order has a write in
    /// flight so the edit cannot race a commit.
    pub async fn update_order(&self, order_id: &str, update: OrderUpdate) -> AppResult<Order> {
        if self.board.is_in_flight(order_id) {
            return Err(AppError::transition_in_flight(order_id));
        }
        let mut order = self.get_order(order_id).await?;

        if let Some(client_name) = update.client_name {
            order.client_name = required_field(&client_name, "client_name")?;
        }
        if let Some(total) = update.total {
            let total = money::validate_amount(total, "total")?;
            if order.revenue_added && !money::money_eq(order.total, total) {
                tracing::warn!(
                    order_id = %order.id,
                    old_total = order.total,
                    new_total = total,
                    "Total edited after revenue recognition; the booked income keeps the original amount"
                );
            }
            order.total = total;
        }
        if let Some(notes) = update.notes {
            order.notes = Some(notes);
        }
        if let Some(link) = update.reference_link {
            order.reference_link = Some(link);
        }
        if let Some(date) = update.scheduled_date {
            order.scheduled_date = Some(date);
        }
        order.updated_at = now_millis();

        self.store.update_order(&order).await?;
        self.board.apply(BoardEvent::Upserted {
            order: order.clone(),
        });
        Ok(order)
    }

    // ========== Transitions ==========

    pub async fn attempt(&self, order_id: &str, to: OrderStatus) -> AppResult<TransitionOutcome> {
        self.controller.attempt(order_id, to).await
    }

    pub async fn confirm(&self, ticket: &str, input: CollectionInput) -> AppResult<Order> {
        self.controller.confirm(ticket, input).await
    }

    pub async fn skip(&self, ticket: &str) -> AppResult<Order> {
        self.controller.skip(ticket).await
    }

    pub fn cancel(&self, ticket: &str) -> AppResult<()> {
        self.controller.cancel(ticket)
    }

    // ========== Finance ==========

    pub async fn list_transactions(
        &self,
        order_id: Option<&str>,
        kind: Option<TransactionKind>,
    ) -> AppResult<Vec<Transaction>> {
        let mut rows = self.store.list_transactions().await?;
        if let Some(order_id) = order_id {
            rows.retain(|r| r.order_id.as_deref() == Some(order_id));
        }
        if let Some(kind) = kind {
            rows.retain(|r| r.kind == kind);
        }
        Ok(rows)
    }

    // ========== Tracking ==========

    pub async fn list_tracking(&self, order_id: Option<&str>) -> AppResult<Vec<TrackingRecord>> {
        let mut records = self.store.list_tracking().await?;
        if let Some(order_id) = order_id {
            records.retain(|r| r.order_id == order_id);
        }
        Ok(records)
    }

    // ========== Quotes ==========

    pub async fn create_quote(&self, create: QuoteCreate) -> AppResult<Quote> {
        let total = money::validate_amount(create.total, "total")?;
        let client_id = required_field(&create.client_id, "client_id")?;
        let client_name = required_field(&create.client_name, "client_name")?;

        match self
            .insert_new_quote(&create, &client_id, &client_name, total)
            .await
        {
            Err(err) if err.code == ErrorCode::NumberingCollision => {
                tracing::warn!(message = %err, "Quote number collision, retrying with a fresh number");
                self.insert_new_quote(&create, &client_id, &client_name, total)
                    .await
            }
            other => other,
        }
    }

    async fn insert_new_quote(
        &self,
        create: &QuoteCreate,
        client_id: &str,
        client_name: &str,
        total: f64,
    ) -> AppResult<Quote> {
        let number = self.numbers.next_quote_number().await?;
        let mut quote = Quote::new(number, client_id, client_name, total);
        quote.notes = create.notes.clone();
        quote.valid_until = create.valid_until;

        self.store.insert_quote(&quote).await?;
        tracing::info!(quote_id = %quote.id, number = %quote.number, "Quote created");
        Ok(quote)
    }

    pub async fn list_quotes(&self) -> AppResult<Vec<Quote>> {
        self.store.list_quotes().await
    }

    /// Convert a quote into a fresh order at the start of the pipeline
    pub async fn convert_quote(&self, quote_id: &str) -> AppResult<QuoteConversion> {
        let quote = self
            .store
            .get_quote(quote_id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::QuoteNotFound).with_detail("quote_id", quote_id))?;
        if quote.converted {
            return Err(
                AppError::new(ErrorCode::QuoteAlreadyConverted).with_detail("quote_id", quote_id)
            );
        }

        match self.insert_converted_order(&quote).await {
            Err(err) if err.code == ErrorCode::NumberingCollision => {
                tracing::warn!(message = %err, "Order number collision, retrying with a fresh number");
                self.insert_converted_order(&quote).await
            }
            other => other,
        }
    }

    async fn insert_converted_order(&self, quote: &Quote) -> AppResult<QuoteConversion> {
        let number = self.numbers.next_order_number().await?;
        let mut order = Order::new(
            number,
            quote.client_id.as_str(),
            quote.client_name.as_str(),
            quote.total,
        );
        order.notes = quote.notes.clone();

        let converted = self.store.mark_quote_converted(&quote.id, &order).await?;
        self.board.apply(BoardEvent::Upserted {
            order: order.clone(),
        });
        tracing::info!(
            quote_id = %quote.id,
            order_id = %order.id,
            number = %order.number,
            "Quote converted to order"
        );
        Ok(QuoteConversion {
            quote: converted,
            order,
        })
    }
}

fn required_field(value: &str, field: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::new(ErrorCode::RequiredField).with_detail("field", field));
    }
    Ok(trimmed.to_string())
}
