//! Variant entity - one message alternative under A/B test

use chrono::{DateTime, Utc};

use crate::entities::{DeliveryCounters, MediaAttachment};
use crate::value_objects::Snowflake;

/// Maximum variant name length in characters
pub const MAX_VARIANT_NAME_LEN: usize = 64;

/// One message alternative belonging to exactly one Broadcast
///
/// `is_winner` is mutated only by the winner selector, inside a single
/// transaction that also clears every sibling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    pub id: Snowflake,
    pub broadcast_id: Snowflake,
    /// Human-readable name, unique within the broadcast
    pub name: String,
    pub message: String,
    pub media: Option<MediaAttachment>,
    pub counters: DeliveryCounters,
    pub is_winner: bool,
    pub created_at: DateTime<Utc>,
}

impl Variant {
    /// Create a new Variant
    pub fn new(id: Snowflake, broadcast_id: Snowflake, name: String, message: String) -> Self {
        Self {
            id,
            broadcast_id,
            name,
            message,
            media: None,
            counters: DeliveryCounters::default(),
            is_winner: false,
            created_at: Utc::now(),
        }
    }
}
