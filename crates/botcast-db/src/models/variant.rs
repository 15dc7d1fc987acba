//! Variant database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for the variants table
#[derive(Debug, Clone, FromRow)]
pub struct VariantModel {
    pub id: i64,
    pub broadcast_id: i64,
    pub name: String,
    pub message: String,
    pub media_url: Option<String>,
    pub media_kind: Option<String>,
    pub media_caption: Option<String>,
    pub sent_count: i64,
    pub delivered_count: i64,
    pub opened_count: i64,
    pub clicked_count: i64,
    pub is_winner: bool,
    pub created_at: DateTime<Utc>,
}
