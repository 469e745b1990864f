//! Transaction API Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::utils::AppResult;
use shared::models::{Transaction, TransactionKind};

/// Query params for listing transactions
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub order_id: Option<String>,
    pub kind: Option<TransactionKind>,
}

/// List ledger rows (newest first), optionally filtered
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Transaction>>> {
    let rows = state
        .engine
        .list_transactions(query.order_id.as_deref(), query.kind)
        .await?;
    Ok(Json(rows))
}
