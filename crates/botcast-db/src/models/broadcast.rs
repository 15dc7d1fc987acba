//! Broadcast database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for the broadcasts table
#[derive(Debug, Clone, FromRow)]
pub struct BroadcastModel {
    pub id: i64,
    pub author_id: i64,
    pub status: String,
    pub message: String,
    pub media_url: Option<String>,
    pub media_kind: Option<String>,
    pub media_caption: Option<String>,
    pub segment_id: Option<i64>,
    pub winning_variant_id: Option<i64>,
    pub sent_count: i64,
    pub delivered_count: i64,
    pub opened_count: i64,
    pub clicked_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BroadcastModel {
    /// Check if the campaign reached a terminal state
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.status == "sent" || self.status == "failed"
    }
}
