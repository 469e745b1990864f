//! End-to-end transition flows over a real on-disk database
//!
//! Initializes the full server state (work dir, redb, engine) and drives
//! the pipeline the way the HTTP surface would: drops, collection tickets,
//! ledger and tracking queries, quote conversion, restart.

use chrono::NaiveDate;
use fulfillment_server::{Config, ServerState};
use shared::OrderStatus;
use shared::fulfillment::{CollectionInput, CollectionKind, FulfillmentEvent, TransitionOutcome};
use shared::models::{Order, OrderCreate, QuoteCreate, TrackingStatus, TransactionKind};

async fn state_in(dir: &std::path::Path) -> ServerState {
    let config = Config::with_overrides(dir.to_string_lossy(), 0);
    ServerState::initialize(&config)
        .await
        .expect("server state should initialize")
}

fn order_create(client_name: &str, total: f64) -> OrderCreate {
    OrderCreate {
        client_id: format!("client-{}", client_name.to_lowercase()),
        client_name: client_name.to_string(),
        total,
        notes: None,
        scheduled_date: None,
    }
}

/// Drop expecting an immediate commit.
async fn drop_now(state: &ServerState, order_id: &str, to: OrderStatus) -> Order {
    match state.engine.attempt(order_id, to).await.expect("attempt") {
        TransitionOutcome::Completed { order } => order,
        TransitionOutcome::InputRequired { kind, .. } => {
            panic!("unexpected {} collection moving to {}", kind, to)
        }
    }
}

/// Drop expecting a suspension; returns the ticket.
async fn drop_for_ticket(
    state: &ServerState,
    order_id: &str,
    to: OrderStatus,
    expected: CollectionKind,
) -> String {
    match state.engine.attempt(order_id, to).await.expect("attempt") {
        TransitionOutcome::InputRequired { ticket, kind } => {
            assert_eq!(kind, expected);
            ticket
        }
        TransitionOutcome::Completed { .. } => {
            panic!("expected a {} collection moving to {}", expected, to)
        }
    }
}

fn drain(rx: &mut tokio::sync::broadcast::Receiver<FulfillmentEvent>) -> Vec<FulfillmentEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

#[tokio::test(flavor = "multi_thread")]
async fn test_full_pipeline_books_revenue_expense_and_tracking() {
    let dir = tempfile::tempdir().unwrap();
    let state = state_in(dir.path()).await;

    // Six filler orders so the scenario order draws PED00007
    for i in 1..=6 {
        state
            .engine
            .create_order(order_create(&format!("Cliente {}", i), 100.0))
            .await
            .unwrap();
    }
    let order = state
        .engine
        .create_order(order_create("Ana Souza", 250.0))
        .await
        .unwrap();
    assert_eq!(order.number, "PED00007");

    let mut rx = state.engine.subscribe();

    // awaiting_payment -> creating_art recognizes revenue immediately
    let order = drop_now(&state, &order.id, OrderStatus::CreatingArt).await;
    assert_eq!(order.status, OrderStatus::CreatingArt);
    assert!(order.revenue_added);
    assert!(order.revenue_transaction_id.is_some());

    let incomes = state
        .engine
        .list_transactions(Some(&order.id), Some(TransactionKind::Income))
        .await
        .unwrap();
    assert_eq!(incomes.len(), 1);
    assert_eq!(incomes[0].amount, 250.0);
    assert_eq!(incomes[0].category, "vendas");
    assert_eq!(incomes[0].description, "Receita do pedido PED00007");

    // creating_art -> production suspends for the expense amount
    let ticket =
        drop_for_ticket(&state, &order.id, OrderStatus::Production, CollectionKind::Expense).await;
    let order = state
        .engine
        .confirm(
            &ticket,
            CollectionInput::expense_with_link(80.0, "https://drive.example.com/arts/ped7"),
        )
        .await
        .unwrap();
    assert_eq!(order.status, OrderStatus::Production);
    assert!(order.production_expense_id.is_some());
    assert_eq!(
        order.reference_link.as_deref(),
        Some("https://drive.example.com/arts/ped7")
    );

    let expenses = state
        .engine
        .list_transactions(Some(&order.id), Some(TransactionKind::Expense))
        .await
        .unwrap();
    assert_eq!(expenses.len(), 1);
    assert_eq!(expenses[0].amount, 80.0);
    assert_eq!(expenses[0].category, "produção");

    // production -> shipping suspends for the tracking code
    let ticket =
        drop_for_ticket(&state, &order.id, OrderStatus::Shipping, CollectionKind::Tracking).await;
    let order = state
        .engine
        .confirm(&ticket, CollectionInput::tracking("AA123456789BR"))
        .await
        .unwrap();
    assert_eq!(order.status, OrderStatus::Shipping);

    let records = state.engine.list_tracking(Some(&order.id)).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].tracking_code, "AA123456789BR");
    assert_eq!(records[0].carrier, "Correios");
    assert_eq!(records[0].status, TrackingStatus::Pending);
    assert!(records[0].events.is_empty());
    assert!(records[0].estimated_delivery.is_none());

    // shipping -> delivered has no side effects
    let order = drop_now(&state, &order.id, OrderStatus::Delivered).await;
    assert_eq!(order.status, OrderStatus::Delivered);

    // Ledger for the order: exactly one income and one expense overall
    let rows = state
        .engine
        .list_transactions(Some(&order.id), None)
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);

    // Event stream saw two suspensions and four commits
    let events = drain(&mut rx);
    assert_eq!(events.len(), 6);
    let collections = events
        .iter()
        .filter(|e| matches!(e, FulfillmentEvent::CollectionRequired { .. }))
        .count();
    assert_eq!(collections, 2);
    assert!(events.iter().all(|e| e.order_id() == order.id));
    assert!(matches!(
        events.last(),
        Some(FulfillmentEvent::TransitionSucceeded {
            to: OrderStatus::Delivered,
            tracking_created: false,
            ..
        })
    ));
    let shipping_commit = events.iter().find(|e| {
        matches!(
            e,
            FulfillmentEvent::TransitionSucceeded {
                to: OrderStatus::Shipping,
                ..
            }
        )
    });
    assert!(matches!(
        shipping_commit,
        Some(FulfillmentEvent::TransitionSucceeded {
            tracking_created: true,
            ..
        })
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_estimated_delivery_lands_on_the_tracking_record() {
    let dir = tempfile::tempdir().unwrap();
    let state = state_in(dir.path()).await;

    let order = state
        .engine
        .create_order(order_create("Karen Luz", 180.0))
        .await
        .unwrap();
    drop_now(&state, &order.id, OrderStatus::CreatingArt).await;

    let ticket =
        drop_for_ticket(&state, &order.id, OrderStatus::Shipping, CollectionKind::Tracking).await;
    let estimate = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();
    let order = state
        .engine
        .confirm(
            &ticket,
            CollectionInput::tracking_with_estimate("BB987654321BR", estimate),
        )
        .await
        .unwrap();
    assert_eq!(order.status, OrderStatus::Shipping);

    let records = state.engine.list_tracking(Some(&order.id)).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].tracking_code, "BB987654321BR");
    assert_eq!(records[0].estimated_delivery, Some(estimate));
    assert_eq!(records[0].status, TrackingStatus::Pending);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_return_to_awaiting_reverses_revenue_but_keeps_expense() {
    let dir = tempfile::tempdir().unwrap();
    let state = state_in(dir.path()).await;

    let order = state
        .engine
        .create_order(order_create("Bruno Lima", 320.0))
        .await
        .unwrap();

    let order = drop_now(&state, &order.id, OrderStatus::CreatingArt).await;
    let ticket =
        drop_for_ticket(&state, &order.id, OrderStatus::Production, CollectionKind::Expense).await;
    let order = state
        .engine
        .confirm(&ticket, CollectionInput::expense(45.5))
        .await
        .unwrap();
    assert!(order.revenue_added);

    // Payment fell through: back to the start of the pipeline
    let order = drop_now(&state, &order.id, OrderStatus::AwaitingPayment).await;
    assert_eq!(order.status, OrderStatus::AwaitingPayment);
    assert!(!order.revenue_added);
    assert!(order.revenue_transaction_id.is_none());

    let incomes = state
        .engine
        .list_transactions(Some(&order.id), Some(TransactionKind::Income))
        .await
        .unwrap();
    assert!(incomes.is_empty());
    let expenses = state
        .engine
        .list_transactions(Some(&order.id), Some(TransactionKind::Expense))
        .await
        .unwrap();
    assert_eq!(expenses.len(), 1, "production cost is a sunk cost");

    // Paid again: revenue is recognized exactly once more
    let order = drop_now(&state, &order.id, OrderStatus::CreatingArt).await;
    assert!(order.revenue_added);
    let incomes = state
        .engine
        .list_transactions(Some(&order.id), Some(TransactionKind::Income))
        .await
        .unwrap();
    assert_eq!(incomes.len(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_skipped_tracking_and_restart_recovery() {
    let dir = tempfile::tempdir().unwrap();

    let shipped_id;
    {
        let state = state_in(dir.path()).await;
        for name in ["Carla Dias", "Diego Ramos", "Elisa Prado"] {
            state
                .engine
                .create_order(order_create(name, 150.0))
                .await
                .unwrap();
        }
        let orders = state.engine.list_orders().await.unwrap();
        assert_eq!(orders.len(), 3);

        // Hand delivery: the tracking step is skipped
        let order = &orders[0];
        drop_now(&state, &order.id, OrderStatus::CreatingArt).await;
        let ticket =
            drop_for_ticket(&state, &order.id, OrderStatus::Shipping, CollectionKind::Tracking)
                .await;
        let shipped = state.engine.skip(&ticket).await.unwrap();
        assert_eq!(shipped.status, OrderStatus::Shipping);
        shipped_id = shipped.id.clone();

        let records = state.engine.list_tracking(None).await.unwrap();
        assert!(records.is_empty());
    }

    // Reopen the same work dir: orders, statuses and numbering survive
    let state = state_in(dir.path()).await;
    let orders = state.engine.list_orders().await.unwrap();
    assert_eq!(orders.len(), 3);
    let shipped = state.engine.get_order(&shipped_id).await.unwrap();
    assert_eq!(shipped.status, OrderStatus::Shipping);
    assert!(shipped.revenue_added);

    assert_eq!(state.engine.board_view().orders.len(), 3);

    let next = state
        .engine
        .create_order(order_create("Fábio Costa", 95.0))
        .await
        .unwrap();
    assert_eq!(next.number, "PED00004");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_quote_conversion_shares_the_order_sequence() {
    let dir = tempfile::tempdir().unwrap();
    let state = state_in(dir.path()).await;

    let first = state
        .engine
        .create_order(order_create("Gina Alves", 60.0))
        .await
        .unwrap();
    assert_eq!(first.number, "PED00001");

    let quote = state
        .engine
        .create_quote(QuoteCreate {
            client_id: "client-helio".to_string(),
            client_name: "Hélio Nunes".to_string(),
            total: 480.0,
            notes: Some("12 canecas personalizadas".to_string()),
            valid_until: None,
        })
        .await
        .unwrap();
    assert_eq!(quote.number, "ORC00001");

    let conversion = state.engine.convert_quote(&quote.id).await.unwrap();
    assert_eq!(conversion.order.number, "PED00002");
    assert_eq!(conversion.order.status, OrderStatus::AwaitingPayment);
    assert_eq!(conversion.order.client_name, "Hélio Nunes");
    assert_eq!(conversion.order.total, 480.0);
    assert_eq!(
        conversion.order.notes.as_deref(),
        Some("12 canecas personalizadas")
    );
    assert!(conversion.quote.converted);
    assert_eq!(
        conversion.quote.converted_order_id.as_deref(),
        Some(conversion.order.id.as_str())
    );

    // Conversion is one-shot
    let err = state.engine.convert_quote(&quote.id).await.unwrap_err();
    assert_eq!(err.code, fulfillment_server::ErrorCode::QuoteAlreadyConverted);

    // Orders keep drawing from the shared PED sequence
    let third = state
        .engine
        .create_order(order_create("Ivan Melo", 75.0))
        .await
        .unwrap();
    assert_eq!(third.number, "PED00003");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_cancel_leaves_no_trace() {
    let dir = tempfile::tempdir().unwrap();
    let state = state_in(dir.path()).await;

    let order = state
        .engine
        .create_order(order_create("Joana Reis", 200.0))
        .await
        .unwrap();
    let order = drop_now(&state, &order.id, OrderStatus::CreatingArt).await;
    let before = state.engine.get_order(&order.id).await.unwrap();

    let ticket =
        drop_for_ticket(&state, &order.id, OrderStatus::Production, CollectionKind::Expense).await;
    state.engine.cancel(&ticket).unwrap();

    let after = state.engine.get_order(&order.id).await.unwrap();
    assert_eq!(after, before);
    let expenses = state
        .engine
        .list_transactions(Some(&order.id), Some(TransactionKind::Expense))
        .await
        .unwrap();
    assert!(expenses.is_empty());
    assert!(!state.engine.board_view().in_flight.contains(&order.id));

    // The ticket is gone for good
    let err = state
        .engine
        .confirm(&ticket, CollectionInput::expense(10.0))
        .await
        .unwrap_err();
    assert_eq!(err.code, fulfillment_server::ErrorCode::TicketNotFound);
}
