//! Variant handlers
//!
//! Endpoints for A/B test variant authoring.

use axum::{
    extract::{Path, State},
    Json,
};
use botcast_service::{CampaignService, CreateVariantRequest, VariantResponse};

use crate::extractors::{BroadcastIdPath, ValidatedJson};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// Create variant
///
/// POST /broadcasts/{broadcast_id}/variants
pub async fn create_variant(
    State(state): State<AppState>,
    Path(path): Path<BroadcastIdPath>,
    ValidatedJson(request): ValidatedJson<CreateVariantRequest>,
) -> ApiResult<Created<Json<VariantResponse>>> {
    let service = CampaignService::new(state.service_context());
    let response = service.create_variant(path.broadcast_id()?, request).await?;
    Ok(Created(Json(response)))
}

/// List variants in creation order
///
/// GET /broadcasts/{broadcast_id}/variants
pub async fn list_variants(
    State(state): State<AppState>,
    Path(path): Path<BroadcastIdPath>,
) -> ApiResult<Json<Vec<VariantResponse>>> {
    let service = CampaignService::new(state.service_context());
    let variants = service.list_variants(path.broadcast_id()?).await?;
    Ok(Json(variants))
}
