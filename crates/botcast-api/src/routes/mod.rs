//! Route definitions
//!
//! All API routes organized by domain and mounted under /api/v1.

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::handlers::{analytics, broadcasts, events, health, preview, variants};
use crate::state::AppState;

/// Create the main API router with all routes
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_routes())
}

/// Health check routes (mounted at the root, outside /api/v1)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// API v1 routes
fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(broadcast_routes())
        .merge(variant_routes())
        .merge(event_routes())
}

/// Broadcast routes
fn broadcast_routes() -> Router<AppState> {
    Router::new()
        // Broadcast CRUD
        .route("/broadcasts", post(broadcasts::create_broadcast))
        .route("/broadcasts", get(broadcasts::list_broadcasts))
        .route("/broadcasts/:broadcast_id", get(broadcasts::get_broadcast))
        .route("/broadcasts/:broadcast_id", delete(broadcasts::cancel_broadcast))
        // Variants
        .route("/broadcasts/:broadcast_id/variants", post(variants::create_variant))
        .route("/broadcasts/:broadcast_id/variants", get(variants::list_variants))
        // Buttons
        .route("/broadcasts/:broadcast_id/buttons", post(broadcasts::add_button))
        .route("/broadcasts/:broadcast_id/buttons", get(broadcasts::list_buttons))
        // Dispatch and winner selection
        .route("/broadcasts/:broadcast_id/dispatch", post(broadcasts::dispatch_broadcast))
        .route("/broadcasts/:broadcast_id/winner", post(broadcasts::select_winner))
        // Analytics
        .route("/broadcasts/:broadcast_id/stats", get(analytics::broadcast_stats))
}

/// Variant routes
fn variant_routes() -> Router<AppState> {
    Router::new().route("/variants/:variant_id/stats", get(analytics::variant_stats))
}

/// Delivery event webhook and preview routes
fn event_routes() -> Router<AppState> {
    Router::new()
        .route("/events", post(events::record_event))
        .route("/preview", post(preview::preview_template))
}
