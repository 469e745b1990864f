//! Quote API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::fulfillment::QuoteConversion;
use crate::utils::AppResult;
use shared::models::{Quote, QuoteCreate};

/// List all quotes (newest first)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Quote>>> {
    let quotes = state.engine.list_quotes().await?;
    Ok(Json(quotes))
}

/// Create a quote with a freshly drawn ORC number
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<QuoteCreate>,
) -> AppResult<Json<Quote>> {
    let quote = state.engine.create_quote(payload).await?;
    Ok(Json(quote))
}

/// Convert a quote into an order (once)
pub async fn convert(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<QuoteConversion>> {
    let conversion = state.engine.convert_quote(&id).await?;
    Ok(Json(conversion))
}
