//! Broadcast handlers
//!
//! Endpoints for campaign authoring, dispatch, and winner selection.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use botcast_service::{
    BroadcastResponse, ButtonResponse, CampaignService, CreateBroadcastRequest,
    CreateButtonRequest, DispatchRequest, DispatchResponse, DispatchService, WinnerResponse,
    WinnerService,
};
use serde::Deserialize;

use crate::extractors::{BroadcastIdPath, ValidatedJson};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// Query parameters for listing broadcasts
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    50
}

/// Create broadcast
///
/// POST /broadcasts
pub async fn create_broadcast(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateBroadcastRequest>,
) -> ApiResult<Created<Json<BroadcastResponse>>> {
    let service = CampaignService::new(state.service_context());
    let response = service.create_broadcast(request).await?;
    Ok(Created(Json(response)))
}

/// List recent broadcasts
///
/// GET /broadcasts
pub async fn list_broadcasts(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<BroadcastResponse>>> {
    let service = CampaignService::new(state.service_context());
    let broadcasts = service.list_broadcasts(query.limit).await?;
    Ok(Json(broadcasts))
}

/// Get broadcast by ID
///
/// GET /broadcasts/{broadcast_id}
pub async fn get_broadcast(
    State(state): State<AppState>,
    Path(path): Path<BroadcastIdPath>,
) -> ApiResult<Json<BroadcastResponse>> {
    let service = CampaignService::new(state.service_context());
    let response = service.get_broadcast(path.broadcast_id()?).await?;
    Ok(Json(response))
}

/// Cancel a pending broadcast
///
/// DELETE /broadcasts/{broadcast_id}
pub async fn cancel_broadcast(
    State(state): State<AppState>,
    Path(path): Path<BroadcastIdPath>,
) -> ApiResult<NoContent> {
    let service = CampaignService::new(state.service_context());
    service.cancel_broadcast(path.broadcast_id()?).await?;
    Ok(NoContent)
}

/// Attach a button
///
/// POST /broadcasts/{broadcast_id}/buttons
pub async fn add_button(
    State(state): State<AppState>,
    Path(path): Path<BroadcastIdPath>,
    ValidatedJson(request): ValidatedJson<CreateButtonRequest>,
) -> ApiResult<Created<Json<ButtonResponse>>> {
    let service = CampaignService::new(state.service_context());
    let response = service.add_button(path.broadcast_id()?, request).await?;
    Ok(Created(Json(response)))
}

/// List buttons in render order
///
/// GET /broadcasts/{broadcast_id}/buttons
pub async fn list_buttons(
    State(state): State<AppState>,
    Path(path): Path<BroadcastIdPath>,
) -> ApiResult<Json<Vec<ButtonResponse>>> {
    let service = CampaignService::new(state.service_context());
    let buttons = service.list_buttons(path.broadcast_id()?).await?;
    Ok(Json(buttons))
}

/// Submit a broadcast for dispatch
///
/// POST /broadcasts/{broadcast_id}/dispatch
pub async fn dispatch_broadcast(
    State(state): State<AppState>,
    Path(path): Path<BroadcastIdPath>,
    ValidatedJson(request): ValidatedJson<DispatchRequest>,
) -> ApiResult<Json<DispatchResponse>> {
    let service = DispatchService::new(state.service_context());
    let response = service.dispatch(path.broadcast_id()?, request.vars).await?;
    Ok(Json(response))
}

/// Select the winning variant of a sent broadcast
///
/// POST /broadcasts/{broadcast_id}/winner
pub async fn select_winner(
    State(state): State<AppState>,
    Path(path): Path<BroadcastIdPath>,
) -> ApiResult<Json<WinnerResponse>> {
    let service = WinnerService::new(state.service_context());
    let response = service.select_winner(path.broadcast_id()?).await?;
    Ok(Json(response))
}
