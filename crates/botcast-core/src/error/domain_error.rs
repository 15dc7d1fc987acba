//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::entities::BroadcastStatus;
use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Broadcast not found: {0}")]
    BroadcastNotFound(Snowflake),

    #[error("Variant not found: {0}")]
    VariantNotFound(Snowflake),

    #[error("Button not found: {0}")]
    ButtonNotFound(Snowflake),

    #[error("Segment not found: {0}")]
    SegmentNotFound(Snowflake),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Message must not be empty")]
    EmptyMessage,

    #[error("Message too long: max {max} characters")]
    MessageTooLong { max: usize },

    #[error("Invalid media attachment: {0}")]
    InvalidMedia(String),

    #[error("Invalid delivery event: {0}")]
    InvalidEvent(String),

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Variant name already used in this broadcast: {0}")]
    DuplicateVariantName(String),

    #[error("Illegal status transition: {from} -> {to}")]
    InvalidTransition {
        from: BroadcastStatus,
        to: BroadcastStatus,
    },

    #[error("Broadcast is no longer editable: {0}")]
    BroadcastLocked(Snowflake),

    // =========================================================================
    // No-op Outcomes
    // =========================================================================
    #[error("Operation not applicable: {0}")]
    NotApplicable(String),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::BroadcastNotFound(_) => "UNKNOWN_BROADCAST",
            Self::VariantNotFound(_) => "UNKNOWN_VARIANT",
            Self::ButtonNotFound(_) => "UNKNOWN_BUTTON",
            Self::SegmentNotFound(_) => "UNKNOWN_SEGMENT",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::EmptyMessage => "EMPTY_MESSAGE",
            Self::MessageTooLong { .. } => "MESSAGE_TOO_LONG",
            Self::InvalidMedia(_) => "INVALID_MEDIA",
            Self::InvalidEvent(_) => "INVALID_EVENT",

            // Conflict
            Self::DuplicateVariantName(_) => "DUPLICATE_VARIANT_NAME",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::BroadcastLocked(_) => "BROADCAST_LOCKED",

            // No-op
            Self::NotApplicable(_) => "NOT_APPLICABLE",

            // Infrastructure
            Self::Transport(_) => "TRANSPORT_ERROR",
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::BroadcastNotFound(_)
                | Self::VariantNotFound(_)
                | Self::ButtonNotFound(_)
                | Self::SegmentNotFound(_)
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::EmptyMessage
                | Self::MessageTooLong { .. }
                | Self::InvalidMedia(_)
                | Self::InvalidEvent(_)
        )
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::DuplicateVariantName(_)
                | Self::InvalidTransition { .. }
                | Self::BroadcastLocked(_)
        )
    }

    /// Check if this reports a no-op outcome
    pub fn is_not_applicable(&self) -> bool {
        matches!(self, Self::NotApplicable(_))
    }
}

impl From<crate::traits::TransportError> for DomainError {
    fn from(err: crate::traits::TransportError) -> Self {
        Self::Transport(err.to_string())
    }
}
