//! Transition Ticket API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::utils::{ApiResponse, AppResult};
use shared::fulfillment::CollectionInput;
use shared::models::Order;

/// Confirm a suspended transition with the collected input
pub async fn confirm(
    State(state): State<ServerState>,
    Path(ticket): Path<String>,
    Json(payload): Json<CollectionInput>,
) -> AppResult<Json<Order>> {
    let order = state.engine.confirm(&ticket, payload).await?;
    Ok(Json(order))
}

/// Skip the collection (tracking tickets only) and commit
pub async fn skip(
    State(state): State<ServerState>,
    Path(ticket): Path<String>,
) -> AppResult<Json<Order>> {
    let order = state.engine.skip(&ticket).await?;
    Ok(Json(order))
}

/// Cancel a suspended transition; the order stays untouched
pub async fn cancel(
    State(state): State<ServerState>,
    Path(ticket): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.engine.cancel(&ticket)?;
    Ok(Json(ApiResponse::ok()))
}
