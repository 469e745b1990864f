//! Board API Module
//!
//! Kanban board view plus the drop endpoint that drives every status
//! transition.

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

/// Board router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/board", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::view))
        .route("/refresh", post(handler::refresh))
        .route("/drop", post(handler::drop_order))
}
