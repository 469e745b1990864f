//! Board API Handlers

use axum::{Json, extract::State};

use crate::core::ServerState;
use crate::fulfillment::BoardView;
use crate::utils::AppResult;
use shared::fulfillment::{DropRequest, TransitionOutcome};

/// Current board view: working copies plus in-flight order ids
pub async fn view(State(state): State<ServerState>) -> Json<BoardView> {
    Json(state.engine.board_view())
}

/// Re-pull the board from storage through the reducer
pub async fn refresh(State(state): State<ServerState>) -> AppResult<Json<BoardView>> {
    let view = state.engine.refresh_board().await?;
    Ok(Json(view))
}

/// Drop an order onto a new column
///
/// Either commits right away or suspends with a collection ticket; the
/// outcome tells the caller which happened.
pub async fn drop_order(
    State(state): State<ServerState>,
    Json(payload): Json<DropRequest>,
) -> AppResult<Json<TransitionOutcome>> {
    let outcome = state.engine.attempt(&payload.order_id, payload.to).await?;
    Ok(Json(outcome))
}
