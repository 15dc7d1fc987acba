//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate` for input
//! validation. IDs travel as strings (Snowflakes serialize as strings).

use std::collections::HashMap;

use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

// ============================================================================
// Broadcast Requests
// ============================================================================

/// Create broadcast request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBroadcastRequest {
    /// Console operator authoring the campaign
    pub author_id: String,

    #[validate(length(min = 1, max = 4096, message = "Message must be 1-4096 characters"))]
    pub message: String,

    /// Segment to target; omit for all recipients
    pub segment_id: Option<String>,

    #[validate(nested)]
    pub media: Option<MediaInput>,
}

/// Media attachment input
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct MediaInput {
    #[validate(url(message = "Invalid media URL"))]
    pub url: String,

    /// One of: photo, video, document
    pub kind: String,

    #[validate(length(max = 1024, message = "Caption must be at most 1024 characters"))]
    pub caption: Option<String>,
}

/// Submit a broadcast for dispatch
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct DispatchRequest {
    /// Template variables shared by every recipient
    #[serde(default)]
    pub vars: HashMap<String, String>,
}

// ============================================================================
// Variant Requests
// ============================================================================

/// Create variant request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateVariantRequest {
    #[validate(length(min = 1, max = 64, message = "Variant name must be 1-64 characters"))]
    pub name: String,

    #[validate(length(min = 1, max = 4096, message = "Message must be 1-4096 characters"))]
    pub message: String,

    #[validate(nested)]
    pub media: Option<MediaInput>,
}

// ============================================================================
// Button Requests
// ============================================================================

/// Attach a button to a broadcast (or to one of its variants)
///
/// Exactly one of `url` / `callback` must be given.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateButtonRequest {
    /// Owning variant; omit for a single-variant broadcast
    pub variant_id: Option<String>,

    #[validate(length(min = 1, max = 64, message = "Label must be 1-64 characters"))]
    pub label: String,

    #[validate(url(message = "Invalid button URL"))]
    pub url: Option<String>,

    #[validate(length(min = 1, max = 128, message = "Callback must be 1-128 characters"))]
    pub callback: Option<String>,

    /// Zero-based layout row
    #[serde(default)]
    #[validate(range(min = 0, max = 9, message = "Row must be 0-9"))]
    pub row: i32,

    /// Ordinal position within the row
    #[serde(default)]
    #[validate(range(min = 0, max = 9, message = "Position must be 0-9"))]
    pub position: i32,
}

// ============================================================================
// Delivery Event Requests
// ============================================================================

/// Inbound delivery/engagement event from the transport webhook
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DeliveryEventRequest {
    pub broadcast_id: String,

    /// Omitted for single-variant broadcasts
    pub variant_id: Option<String>,

    pub recipient_id: String,

    /// One of: delivered, opened, clicked
    pub kind: String,

    /// Required when kind = clicked
    pub button_id: Option<String>,

    /// Caller-supplied idempotency key
    pub event_id: Option<Uuid>,
}

// ============================================================================
// Preview Requests
// ============================================================================

/// Render a template preview with sample variables
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PreviewRequest {
    #[validate(length(min = 1, max = 4096, message = "Template must be 1-4096 characters"))]
    pub template: String,

    #[serde(default)]
    pub vars: HashMap<String, String>,
}
