//! Delivery event ingestor
//!
//! Single writer of the delivery counters. Events arrive at-least-once
//! from many transport workers concurrently; every increment is a
//! server-side atomic operation, so arrival order and concurrency
//! cannot lose updates. `opened` and `clicked` are independent signals;
//! neither implies the other.

use chrono::Utc;

use botcast_core::entities::{BroadcastStatus, Button, ClickEvent};
use botcast_core::events::{DeliveryEvent, DeliveryEventKind};
use botcast_core::traits::CounterField;
use botcast_core::{DomainError, Snowflake};
use tracing::{debug, instrument};

use crate::dto::DeliveryEventRequest;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::parse_id;

/// Delivery event ingest service
pub struct IngestService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> IngestService<'a> {
    /// Create a new IngestService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Parse and record one webhook event
    #[instrument(skip(self, request))]
    pub async fn record_request(&self, request: DeliveryEventRequest) -> ServiceResult<()> {
        let kind = DeliveryEventKind::parse(&request.kind).ok_or_else(|| {
            ServiceError::validation("Event kind must be one of: delivered, opened, clicked")
        })?;

        let event = DeliveryEvent {
            broadcast_id: parse_id(&request.broadcast_id, "broadcast_id")?,
            variant_id: request
                .variant_id
                .as_deref()
                .map(|raw| parse_id(raw, "variant_id"))
                .transpose()?,
            recipient_id: parse_id(&request.recipient_id, "recipient_id")?,
            kind,
            button_id: request
                .button_id
                .as_deref()
                .map(|raw| parse_id(raw, "button_id"))
                .transpose()?,
            event_id: request.event_id.map(|u| u.to_string()),
        };

        self.record(event).await
    }

    /// Record one delivery event: bump exactly one counter, and append
    /// a click attribution when the event is a click
    #[instrument(skip(self, event), fields(broadcast_id = %event.broadcast_id, kind = event.kind.as_str()))]
    pub async fn record(&self, event: DeliveryEvent) -> ServiceResult<()> {
        let broadcast = self
            .ctx
            .broadcast_repo()
            .find_by_id(event.broadcast_id)
            .await?
            .ok_or(DomainError::BroadcastNotFound(event.broadcast_id))?;

        // Delivery reports cannot precede the dispatch itself
        if broadcast.status == BroadcastStatus::Pending {
            return Err(DomainError::InvalidEvent(
                "delivery events cannot precede dispatch".to_string(),
            )
            .into());
        }

        // Validate routing before touching any counter, so a malformed
        // event leaves no partial trace
        if let Some(variant_id) = event.variant_id {
            let variant = self
                .ctx
                .variant_repo()
                .find_by_id(variant_id)
                .await?
                .ok_or(DomainError::VariantNotFound(variant_id))?;
            if variant.broadcast_id != event.broadcast_id {
                return Err(DomainError::InvalidEvent(
                    "variant does not belong to this broadcast".to_string(),
                )
                .into());
            }
        }

        let button = match event.kind {
            DeliveryEventKind::Clicked => Some(self.resolve_button(&event).await?),
            _ => None,
        };

        let field = match event.kind {
            DeliveryEventKind::Delivered => CounterField::Delivered,
            DeliveryEventKind::Opened => CounterField::Opened,
            DeliveryEventKind::Clicked => CounterField::Clicked,
        };

        match event.variant_id {
            Some(variant_id) => {
                self.ctx
                    .variant_repo()
                    .increment_counter(variant_id, field)
                    .await?;
            }
            None => {
                self.ctx
                    .broadcast_repo()
                    .increment_counter(event.broadcast_id, field)
                    .await?;
            }
        }

        if let Some(button) = button {
            let click = ClickEvent {
                id: self.ctx.generate_id(),
                button_id: button.id,
                variant_id: event.variant_id,
                broadcast_id: event.broadcast_id,
                recipient_id: event.recipient_id,
                // Snapshot the label now; later edits must not rewrite
                // historical attribution
                button_label: button.label,
                event_id: event.event_id,
                clicked_at: Utc::now(),
            };
            self.ctx.click_repo().append(&click).await?;
        }

        debug!(recipient_id = %event.recipient_id, "Delivery event recorded");
        Ok(())
    }

    async fn resolve_button(&self, event: &DeliveryEvent) -> ServiceResult<Button> {
        let button_id: Snowflake = event.button_id.ok_or_else(|| {
            DomainError::InvalidEvent("clicked event is missing button_id".to_string())
        })?;

        let button = self
            .ctx
            .button_repo()
            .find_by_id(button_id)
            .await?
            .ok_or(DomainError::ButtonNotFound(button_id))?;

        if button.broadcast_id != event.broadcast_id {
            return Err(DomainError::InvalidEvent(
                "button does not belong to this broadcast".to_string(),
            )
            .into());
        }

        Ok(button)
    }
}
