//! Message transport port
//!
//! The physical delivery mechanism lives outside this engine. The
//! transport owns its own retries; the engine only records terminal
//! outcomes and later receives delivery events through the ingest
//! surface.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::entities::{Button, MediaAttachment};
use crate::value_objects::Snowflake;

/// Fully rendered message, ready for one recipient
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    pub text: String,
    pub media: Option<MediaAttachment>,
    /// Buttons in render order (row by row, left to right)
    pub buttons: Vec<Button>,
}

/// Acknowledgement that the transport accepted a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
    pub recipient_id: Snowflake,
    pub accepted_at: DateTime<Utc>,
}

impl DeliveryReceipt {
    pub fn now(recipient_id: Snowflake) -> Self {
        Self {
            recipient_id,
            accepted_at: Utc::now(),
        }
    }
}

/// Terminal transport failure for one dispatch attempt
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("recipient rejected message: {0}")]
    Rejected(String),

    #[error("transport unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait MessageTransport: Send + Sync {
    /// Hand one rendered message to the delivery service
    async fn dispatch(
        &self,
        message: &RenderedMessage,
        recipient_id: Snowflake,
    ) -> Result<DeliveryReceipt, TransportError>;
}
