//! Default message transport wiring
//!
//! The real delivery service lives outside this repository and is
//! integrated by implementing `MessageTransport`. This logging stand-in
//! lets the server run end-to-end without one: it accepts every message
//! and emits a structured log line per handoff.

use async_trait::async_trait;
use botcast_core::traits::{DeliveryReceipt, MessageTransport, RenderedMessage, TransportError};
use botcast_core::Snowflake;
use tracing::info;

/// Transport that records handoffs in the log instead of delivering
#[derive(Debug, Default, Clone)]
pub struct LoggingTransport;

#[async_trait]
impl MessageTransport for LoggingTransport {
    async fn dispatch(
        &self,
        message: &RenderedMessage,
        recipient_id: Snowflake,
    ) -> Result<DeliveryReceipt, TransportError> {
        info!(
            recipient_id = %recipient_id,
            text_len = message.text.len(),
            buttons = message.buttons.len(),
            has_media = message.media.is_some(),
            "Message handed to transport"
        );
        Ok(DeliveryReceipt::now(recipient_id))
    }
}
