//! HTTP surface tests
//!
//! Drives the full router with in-process requests: no sockets, real
//! database underneath.

use axum::Router;
use axum::body::Body;
use fulfillment_server::api::build_app;
use fulfillment_server::{Config, ServerState};
use http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

async fn app_in(dir: &std::path::Path) -> Router {
    let config = Config::with_overrides(dir.to_string_lossy(), 0);
    let state = ServerState::initialize(&config)
        .await
        .expect("server state should initialize");
    build_app().with_state(state)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(v) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(v.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test(flavor = "multi_thread")]
async fn test_health_endpoint() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_in(dir.path()).await;

    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_order_endpoints() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_in(dir.path()).await;

    let (status, order) = send(
        &app,
        "POST",
        "/api/orders",
        Some(json!({"client_id": "c-1", "client_name": "Ana Souza", "total": 250.0})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["number"], "PED00001");
    assert_eq!(order["status"], "AWAITING_PAYMENT");
    let order_id = order["id"].as_str().unwrap().to_string();

    let (status, list) = send(&app, "GET", "/api/orders", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, fetched) = send(&app, "GET", &format!("/api/orders/{}", order_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["id"], order_id.as_str());

    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/api/orders/{}", order_id),
        Some(json!({"notes": "entregar na loja"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["notes"], "entregar na loja");

    // Validation failures come back in the error envelope
    let (status, body) = send(
        &app,
        "POST",
        "/api/orders",
        Some(json!({"client_id": "c-2", "client_name": "Bruno Lima", "total": -5.0})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 5002);

    let (status, body) = send(&app, "GET", "/api/orders/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 4001);
    assert_eq!(body["details"]["order_id"], "nope");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_board_drop_and_ticket_flow() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_in(dir.path()).await;

    let (_, order) = send(
        &app,
        "POST",
        "/api/orders",
        Some(json!({"client_id": "c-1", "client_name": "Ana Souza", "total": 250.0})),
    )
    .await;
    let order_id = order["id"].as_str().unwrap().to_string();

    // Immediate commit: revenue is booked on the way out of awaiting_payment
    let (status, outcome) = send(
        &app,
        "POST",
        "/api/board/drop",
        Some(json!({"order_id": order_id, "to": "CREATING_ART"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["outcome"], "COMPLETED");
    assert_eq!(outcome["order"]["revenue_added"], true);

    // Suspension: production needs the expense amount
    let (status, outcome) = send(
        &app,
        "POST",
        "/api/board/drop",
        Some(json!({"order_id": order_id, "to": "PRODUCTION"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["outcome"], "INPUT_REQUIRED");
    assert_eq!(outcome["kind"], "EXPENSE");
    let ticket = outcome["ticket"].as_str().unwrap().to_string();

    let (status, order) = send(
        &app,
        "POST",
        &format!("/api/transitions/{}/confirm", ticket),
        Some(json!({"amount": 80.0})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["status"], "PRODUCTION");

    // Ledger queries with filters
    let (status, rows) = send(
        &app,
        "GET",
        &format!("/api/transactions?order_id={}", order_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rows.as_array().unwrap().len(), 2);

    let (_, rows) = send(&app, "GET", "/api/transactions?kind=EXPENSE", None).await;
    assert_eq!(rows.as_array().unwrap().len(), 1);
    assert_eq!(rows[0]["amount"], 80.0);

    // Tracking is skippable; no record is written
    let (_, outcome) = send(
        &app,
        "POST",
        "/api/board/drop",
        Some(json!({"order_id": order_id, "to": "SHIPPING"})),
    )
    .await;
    assert_eq!(outcome["kind"], "TRACKING");
    let ticket = outcome["ticket"].as_str().unwrap().to_string();

    let (status, order) = send(
        &app,
        "POST",
        &format!("/api/transitions/{}/skip", ticket),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["status"], "SHIPPING");

    let (_, records) = send(&app, "GET", "/api/tracking", None).await;
    assert!(records.as_array().unwrap().is_empty());

    // Tickets are single-use
    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/transitions/{}/confirm", ticket),
        Some(json!({"tracking_code": "AA123456789BR"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 4005);

    // Board reflects the committed state with nothing in flight
    let (status, board) = send(&app, "GET", "/api/board", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(board["orders"][0]["status"], "SHIPPING");
    assert!(board["in_flight"].as_array().unwrap().is_empty());

    let (status, board) = send(&app, "POST", "/api/board/refresh", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(board["orders"].as_array().unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_quote_endpoints() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_in(dir.path()).await;

    let (status, quote) = send(
        &app,
        "POST",
        "/api/quotes",
        Some(json!({"client_id": "c-9", "client_name": "Carla Dias", "total": 480.0})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(quote["number"], "ORC00001");
    let quote_id = quote["id"].as_str().unwrap().to_string();

    let (_, list) = send(&app, "GET", "/api/quotes", None).await;
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, conversion) = send(
        &app,
        "POST",
        &format!("/api/quotes/{}/convert", quote_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(conversion["order"]["number"], "PED00001");
    assert_eq!(conversion["quote"]["converted"], true);

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/quotes/{}/convert", quote_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 6102);
}
