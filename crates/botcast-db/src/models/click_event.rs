//! Click event database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for the click_events table
#[derive(Debug, Clone, FromRow)]
pub struct ClickEventModel {
    pub id: i64,
    pub button_id: i64,
    pub variant_id: Option<i64>,
    pub broadcast_id: i64,
    pub recipient_id: i64,
    pub button_label: String,
    pub event_id: Option<String>,
    pub clicked_at: DateTime<Utc>,
}

/// Aggregation row: raw clicks per button
#[derive(Debug, Clone, FromRow)]
pub struct ButtonClickRow {
    pub button_id: i64,
    pub label: String,
    pub clicks: i64,
}
