//! Analytics handlers
//!
//! Endpoints for aggregated campaign statistics.

use axum::{
    extract::{Path, State},
    Json,
};
use botcast_service::{AnalyticsService, BroadcastStatsResponse, VariantStatsResponse};

use crate::extractors::{BroadcastIdPath, VariantIdPath};
use crate::response::ApiResult;
use crate::state::AppState;

/// Aggregated statistics for a broadcast
///
/// GET /broadcasts/{broadcast_id}/stats
pub async fn broadcast_stats(
    State(state): State<AppState>,
    Path(path): Path<BroadcastIdPath>,
) -> ApiResult<Json<BroadcastStatsResponse>> {
    let service = AnalyticsService::new(state.service_context());
    let stats = service.broadcast_stats(path.broadcast_id()?).await?;
    Ok(Json(stats))
}

/// Derived statistics for one variant
///
/// GET /variants/{variant_id}/stats
pub async fn variant_stats(
    State(state): State<AppState>,
    Path(path): Path<VariantIdPath>,
) -> ApiResult<Json<VariantStatsResponse>> {
    let service = AnalyticsService::new(state.service_context());
    let stats = service.variant_stats_by_id(path.variant_id()?).await?;
    Ok(Json(stats))
}
