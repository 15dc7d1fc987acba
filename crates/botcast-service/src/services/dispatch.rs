//! Dispatch service
//!
//! Drives a pending campaign through the send loop: resolve the
//! audience, render each variant per recipient, hand messages to the
//! external transport, and close the lifecycle out. Per-recipient
//! transport failures are recorded without failing the whole campaign;
//! only a campaign that reached nobody ends up `failed`.

use botcast_core::entities::{layout, BroadcastStatus, Button, MediaAttachment, Variant};
use botcast_core::template::{self, TemplateVars};
use botcast_core::traits::{CounterField, RenderedMessage};
use botcast_core::{Broadcast, DomainError, Snowflake};
use tracing::{info, instrument, warn};

use crate::dto::DispatchResponse;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::segment::SegmentResolver;

/// Variable injected for every recipient during rendering
const RECIPIENT_VAR: &str = "recipient_id";

/// Dispatch service
pub struct DispatchService<'a> {
    ctx: &'a ServiceContext,
}

/// One send target: a variant, or the broadcast itself when no explicit
/// variants exist (the "single implicit variant" case)
struct SendTarget {
    variant_id: Option<Snowflake>,
    message: String,
    media: Option<MediaAttachment>,
    /// Buttons flattened into render order
    buttons: Vec<Button>,
    /// Whether the message demands a per-recipient render
    per_recipient: bool,
}

impl<'a> DispatchService<'a> {
    /// Create a new DispatchService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Submit a pending broadcast for dispatch
    ///
    /// Once the campaign transitions to `sending` it cannot be
    /// cancelled; recipients already notified stay notified.
    #[instrument(skip(self, vars))]
    pub async fn dispatch(
        &self,
        broadcast_id: Snowflake,
        vars: TemplateVars,
    ) -> ServiceResult<DispatchResponse> {
        let broadcast = self
            .ctx
            .broadcast_repo()
            .find_by_id(broadcast_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Broadcast", broadcast_id.to_string()))?;

        if broadcast.status != BroadcastStatus::Pending {
            return Err(DomainError::InvalidTransition {
                from: broadcast.status,
                to: BroadcastStatus::Sending,
            }
            .into());
        }

        let targets = self.load_targets(&broadcast).await?;
        for target in &targets {
            Broadcast::validate_message(&target.message)?;
        }

        // Resolve the audience before committing to the send; a missing
        // segment aborts while the campaign is still pending
        let resolution = SegmentResolver::new(self.ctx)
            .resolve(broadcast.segment_id)
            .await?;

        let moved = self
            .ctx
            .broadcast_repo()
            .update_status(broadcast.id, BroadcastStatus::Pending, BroadcastStatus::Sending)
            .await?;
        if !moved {
            return Err(ServiceError::conflict(
                "Broadcast was dispatched concurrently",
            ));
        }

        info!(
            broadcast_id = %broadcast.id,
            recipients = resolution.count,
            variants = targets.len(),
            "Dispatch started"
        );

        let mut accepted: u64 = 0;
        let mut failed: u64 = 0;

        for (index, recipient_id) in resolution.recipient_ids.iter().copied().enumerate() {
            // Recipients rotate over variants in creation order
            let target = &targets[index % targets.len()];
            let rendered = render_for(target, recipient_id, &vars);

            match self.ctx.transport().dispatch(&rendered, recipient_id).await {
                Ok(_receipt) => {
                    self.bump_sent(&broadcast, target).await?;
                    accepted += 1;
                }
                Err(err) => {
                    // The transport already exhausted its own retries;
                    // record the terminal outcome and keep going
                    warn!(
                        broadcast_id = %broadcast.id,
                        recipient_id = %recipient_id,
                        error = %err,
                        "Dispatch to recipient failed"
                    );
                    failed += 1;
                }
            }
        }

        let attempted = resolution.count as u64;
        let final_status = if attempted > 0 && accepted == 0 {
            BroadcastStatus::Failed
        } else {
            BroadcastStatus::Sent
        };

        self.ctx
            .broadcast_repo()
            .update_status(broadcast.id, BroadcastStatus::Sending, final_status)
            .await?;

        info!(
            broadcast_id = %broadcast.id,
            attempted,
            accepted,
            failed,
            status = %final_status,
            "Dispatch finished"
        );

        Ok(DispatchResponse {
            broadcast_id: broadcast.id.to_string(),
            status: final_status.as_str().to_string(),
            attempted,
            accepted,
            failed,
        })
    }

    /// Build the send targets: explicit variants, or the broadcast
    /// itself as a single implicit variant
    async fn load_targets(&self, broadcast: &Broadcast) -> ServiceResult<Vec<SendTarget>> {
        let variants = self
            .ctx
            .variant_repo()
            .find_by_broadcast(broadcast.id)
            .await?;

        if variants.is_empty() {
            let buttons = self
                .ctx
                .button_repo()
                .find_by_broadcast(broadcast.id)
                .await?;
            return Ok(vec![SendTarget {
                variant_id: None,
                message: broadcast.message.clone(),
                media: broadcast.media.clone(),
                buttons: flatten_layout(&buttons),
                per_recipient: template::placeholders(&broadcast.message)
                    .contains(RECIPIENT_VAR),
            }]);
        }

        let mut targets = Vec::with_capacity(variants.len());
        for variant in variants {
            let buttons = self.ctx.button_repo().find_by_variant(variant.id).await?;
            targets.push(target_from_variant(variant, &buttons));
        }
        Ok(targets)
    }

    /// Record one accepted handoff on the owning counter row
    async fn bump_sent(&self, broadcast: &Broadcast, target: &SendTarget) -> ServiceResult<()> {
        match target.variant_id {
            Some(variant_id) => {
                self.ctx
                    .variant_repo()
                    .increment_counter(variant_id, CounterField::Sent)
                    .await?;
            }
            None => {
                self.ctx
                    .broadcast_repo()
                    .increment_counter(broadcast.id, CounterField::Sent)
                    .await?;
            }
        }
        Ok(())
    }
}

fn target_from_variant(variant: Variant, buttons: &[Button]) -> SendTarget {
    let per_recipient = template::placeholders(&variant.message).contains(RECIPIENT_VAR);
    SendTarget {
        variant_id: Some(variant.id),
        message: variant.message,
        media: variant.media,
        buttons: flatten_layout(buttons),
        per_recipient,
    }
}

/// Row-major render order for the transport payload
fn flatten_layout(buttons: &[Button]) -> Vec<Button> {
    layout(buttons).into_iter().flatten().collect()
}

/// Render one message; templates without per-recipient placeholders
/// produce identical text for every recipient
fn render_for(target: &SendTarget, recipient_id: Snowflake, vars: &TemplateVars) -> RenderedMessage {
    let text = if target.per_recipient {
        let mut recipient_vars = vars.clone();
        recipient_vars.insert(RECIPIENT_VAR.to_string(), recipient_id.to_string());
        template::render(&target.message, &recipient_vars)
    } else {
        template::render(&target.message, vars)
    };

    RenderedMessage {
        text,
        media: target.media.clone(),
        buttons: target.buttons.clone(),
    }
}
