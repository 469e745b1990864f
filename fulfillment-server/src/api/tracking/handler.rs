//! Tracking API Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::utils::AppResult;
use shared::models::TrackingRecord;

/// Query params for listing tracking records
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub order_id: Option<String>,
}

/// List tracking records (newest first), optionally for one order
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<TrackingRecord>>> {
    let records = state.engine.list_tracking(query.order_id.as_deref()).await?;
    Ok(Json(records))
}
