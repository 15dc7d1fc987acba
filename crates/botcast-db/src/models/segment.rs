//! Segment database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for the segments table
#[derive(Debug, Clone, FromRow)]
pub struct SegmentModel {
    pub id: i64,
    pub name: String,
    pub member_count: i64,
    pub created_at: DateTime<Utc>,
}
