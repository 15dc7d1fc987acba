//! Delivery event webhook handler
//!
//! Inbound surface for the external delivery service. Events arrive
//! at-least-once from multiple transport workers; the ingest service
//! applies them as atomic counter increments.

use axum::extract::State;
use botcast_service::{DeliveryEventRequest, IngestService};

use crate::extractors::ValidatedJson;
use crate::response::{ApiResult, NoContent};
use crate::state::AppState;

/// Record one delivery/engagement event
///
/// POST /events
pub async fn record_event(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<DeliveryEventRequest>,
) -> ApiResult<NoContent> {
    let service = IngestService::new(state.service_context());
    service.record_request(request).await?;
    Ok(NoContent)
}
