//! Transition Ticket API Module
//!
//! Resolves suspended transitions: confirm with the collected input, skip
//! (tracking tickets only), or cancel.

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

/// Transition ticket router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/transitions", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/{ticket}/confirm", post(handler::confirm))
        .route("/{ticket}/skip", post(handler::skip))
        .route("/{ticket}/cancel", post(handler::cancel))
}
