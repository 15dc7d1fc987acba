//! Broadcast entity - a mass-message campaign

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Maximum campaign message length in characters
pub const MAX_MESSAGE_LEN: usize = 4096;

/// Campaign lifecycle state
///
/// `Sent` and `Failed` are terminal: a finished campaign is recreated,
/// never resumed, so already-notified recipients are not messaged twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BroadcastStatus {
    Pending,
    Sending,
    Sent,
    Failed,
}

impl BroadcastStatus {
    /// Stable string form, matching the database representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Sending => "sending",
            Self::Sent => "sent",
            Self::Failed => "failed",
        }
    }

    /// Parse the database representation
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "sending" => Some(Self::Sending),
            "sent" => Some(Self::Sent),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }

    /// Check whether this state admits no further transitions
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Sent | Self::Failed)
    }

    /// Check whether `self -> to` is a legal lifecycle transition
    pub fn can_transition(&self, to: BroadcastStatus) -> bool {
        match (self, to) {
            (Self::Pending, Self::Sending) => true,
            (Self::Sending, Self::Sent) => true,
            (Self::Pending | Self::Sending, Self::Failed) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for BroadcastStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of media attached to a campaign message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Photo,
    Video,
    Document,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Photo => "photo",
            Self::Video => "video",
            Self::Document => "document",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "photo" => Some(Self::Photo),
            "video" => Some(Self::Video),
            "document" => Some(Self::Document),
            _ => None,
        }
    }
}

/// Media attached to a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaAttachment {
    pub url: String,
    pub kind: MediaKind,
    pub caption: Option<String>,
}

/// Delivery and engagement counters
///
/// Mutated only by the event ingestor, through atomic increments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeliveryCounters {
    pub sent: i64,
    pub delivered: i64,
    pub opened: i64,
    pub clicked: i64,
}

/// Broadcast entity - one campaign, possibly with competing variants
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Broadcast {
    pub id: Snowflake,
    pub author_id: Snowflake,
    pub status: BroadcastStatus,
    pub message: String,
    pub media: Option<MediaAttachment>,
    pub segment_id: Option<Snowflake>,
    pub winning_variant_id: Option<Snowflake>,
    /// Campaign-level counters, meaningful for single-variant campaigns
    pub counters: DeliveryCounters,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Broadcast {
    /// Create a new pending Broadcast
    pub fn new(id: Snowflake, author_id: Snowflake, message: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            author_id,
            status: BroadcastStatus::Pending,
            message,
            media: None,
            segment_id: None,
            winning_variant_id: None,
            counters: DeliveryCounters::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Check message content against the campaign rules
    ///
    /// Length is counted in characters, not bytes.
    pub fn validate_message(message: &str) -> Result<(), crate::error::DomainError> {
        if message.trim().is_empty() {
            return Err(crate::error::DomainError::EmptyMessage);
        }
        if message.chars().count() > MAX_MESSAGE_LEN {
            return Err(crate::error::DomainError::MessageTooLong {
                max: MAX_MESSAGE_LEN,
            });
        }
        Ok(())
    }

    /// Check if the campaign definition can still be edited
    #[inline]
    pub fn is_editable(&self) -> bool {
        self.status == BroadcastStatus::Pending
    }
}
