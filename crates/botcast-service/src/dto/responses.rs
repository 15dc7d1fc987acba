//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.
//! Snowflake IDs are serialized as strings for JavaScript compatibility.

use chrono::{DateTime, Utc};
use serde::Serialize;

use botcast_core::entities::{Broadcast, Button, MediaAttachment, Variant};
use botcast_core::traits::ButtonClickCount;

// ============================================================================
// Broadcast Responses
// ============================================================================

/// Broadcast response
#[derive(Debug, Clone, Serialize)]
pub struct BroadcastResponse {
    pub id: String,
    pub author_id: String,
    pub status: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media: Option<MediaResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segment_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winning_variant_id: Option<String>,
    pub sent: i64,
    pub delivered: i64,
    pub opened: i64,
    pub clicked: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Broadcast> for BroadcastResponse {
    fn from(b: &Broadcast) -> Self {
        Self {
            id: b.id.to_string(),
            author_id: b.author_id.to_string(),
            status: b.status.as_str().to_string(),
            message: b.message.clone(),
            media: b.media.as_ref().map(MediaResponse::from),
            segment_id: b.segment_id.map(|s| s.to_string()),
            winning_variant_id: b.winning_variant_id.map(|s| s.to_string()),
            sent: b.counters.sent,
            delivered: b.counters.delivered,
            opened: b.counters.opened,
            clicked: b.counters.clicked,
            created_at: b.created_at,
            updated_at: b.updated_at,
        }
    }
}

/// Media attachment response
#[derive(Debug, Clone, Serialize)]
pub struct MediaResponse {
    pub url: String,
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

impl From<&MediaAttachment> for MediaResponse {
    fn from(m: &MediaAttachment) -> Self {
        Self {
            url: m.url.clone(),
            kind: m.kind.as_str().to_string(),
            caption: m.caption.clone(),
        }
    }
}

// ============================================================================
// Variant Responses
// ============================================================================

/// Variant response
#[derive(Debug, Clone, Serialize)]
pub struct VariantResponse {
    pub id: String,
    pub broadcast_id: String,
    pub name: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media: Option<MediaResponse>,
    pub sent: i64,
    pub delivered: i64,
    pub opened: i64,
    pub clicked: i64,
    pub is_winner: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Variant> for VariantResponse {
    fn from(v: &Variant) -> Self {
        Self {
            id: v.id.to_string(),
            broadcast_id: v.broadcast_id.to_string(),
            name: v.name.clone(),
            message: v.message.clone(),
            media: v.media.as_ref().map(MediaResponse::from),
            sent: v.counters.sent,
            delivered: v.counters.delivered,
            opened: v.counters.opened,
            clicked: v.counters.clicked,
            is_winner: v.is_winner,
            created_at: v.created_at,
        }
    }
}

// ============================================================================
// Button Responses
// ============================================================================

/// Button response
#[derive(Debug, Clone, Serialize)]
pub struct ButtonResponse {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant_id: Option<String>,
    pub label: String,
    pub action_type: String,
    pub action_value: String,
    pub row: i32,
    pub position: i32,
}

impl From<&Button> for ButtonResponse {
    fn from(b: &Button) -> Self {
        Self {
            id: b.id.to_string(),
            variant_id: b.variant_id.map(|s| s.to_string()),
            label: b.label.clone(),
            action_type: b.action.kind().to_string(),
            action_value: b.action.value().to_string(),
            row: b.row,
            position: b.position,
        }
    }
}

// ============================================================================
// Dispatch Responses
// ============================================================================

/// Outcome of submitting a broadcast for dispatch
#[derive(Debug, Clone, Serialize)]
pub struct DispatchResponse {
    pub broadcast_id: String,
    pub status: String,
    pub attempted: u64,
    pub accepted: u64,
    pub failed: u64,
}

// ============================================================================
// Analytics Responses
// ============================================================================

/// Per-variant engagement statistics
#[derive(Debug, Clone, Serialize)]
pub struct VariantStatsResponse {
    pub id: String,
    pub name: String,
    pub sent: i64,
    pub delivered: i64,
    pub opened: i64,
    pub clicked: i64,
    /// opened / delivered, percent; 0 when nothing was delivered
    pub open_rate: f64,
    /// clicked / delivered, percent; 0 when nothing was delivered
    pub click_rate: f64,
    pub is_winner: bool,
}

/// Raw click total for one button
#[derive(Debug, Clone, Serialize)]
pub struct ButtonClickResponse {
    pub button_id: String,
    pub label: String,
    pub clicks: i64,
}

impl From<&ButtonClickCount> for ButtonClickResponse {
    fn from(c: &ButtonClickCount) -> Self {
        Self {
            button_id: c.button_id.to_string(),
            label: c.label.clone(),
            clicks: c.clicks,
        }
    }
}

/// Campaign-level totals with derived rates
#[derive(Debug, Clone, Serialize)]
pub struct StatsTotals {
    pub sent: i64,
    pub delivered: i64,
    pub opened: i64,
    pub clicked: i64,
    pub open_rate: f64,
    pub click_rate: f64,
}

/// Aggregated statistics for one broadcast
#[derive(Debug, Clone, Serialize)]
pub struct BroadcastStatsResponse {
    pub broadcast_id: String,
    pub status: String,
    pub totals: StatsTotals,
    /// Per-variant rows in creation order
    pub variants: Vec<VariantStatsResponse>,
    /// Button click totals, most clicked first
    pub buttons: Vec<ButtonClickResponse>,
}

/// Outcome of winner selection
#[derive(Debug, Clone, Serialize)]
pub struct WinnerResponse {
    pub broadcast_id: String,
    pub winning_variant_id: String,
    pub name: String,
    pub click_rate: f64,
}

// ============================================================================
// Preview Responses
// ============================================================================

/// Rendered template preview
#[derive(Debug, Clone, Serialize)]
pub struct PreviewResponse {
    pub rendered: String,
}

// ============================================================================
// Health Responses
// ============================================================================

/// Basic health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Health check status for each dependency
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub database: String,
}

impl ReadinessResponse {
    pub fn ready(database_healthy: bool) -> Self {
        Self {
            status: if database_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                database: if database_healthy { "healthy" } else { "unhealthy" }.to_string(),
            },
        }
    }
}
