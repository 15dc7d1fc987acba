//! Winner selector
//!
//! Closes out an A/B test by picking the variant with the highest
//! click-through rate and committing the choice atomically. Selection
//! is deterministic: ties go to the earliest-created variant. Running
//! the selector again is idempotent, though changed counters may
//! legitimately change the winner.

use botcast_core::entities::BroadcastStatus;
use botcast_core::{DomainError, Snowflake};
use tracing::{info, instrument};

use crate::dto::WinnerResponse;

use super::analytics::engagement_rate;
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Winner selection service
pub struct WinnerService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> WinnerService<'a> {
    /// Create a new WinnerService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Select and persist the winning variant of a sent broadcast
    ///
    /// Fewer than two variants is a no-op outcome: a campaign without a
    /// real A/B test cannot carry a winner.
    #[instrument(skip(self))]
    pub async fn select_winner(&self, broadcast_id: Snowflake) -> ServiceResult<WinnerResponse> {
        let broadcast = self
            .ctx
            .broadcast_repo()
            .find_by_id(broadcast_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Broadcast", broadcast_id.to_string()))?;

        if broadcast.status != BroadcastStatus::Sent {
            return Err(ServiceError::conflict(
                "Winner selection requires a sent broadcast",
            ));
        }

        let variants = self
            .ctx
            .variant_repo()
            .find_by_broadcast(broadcast_id)
            .await?;

        if variants.len() < 2 {
            return Err(DomainError::NotApplicable(
                "broadcast has fewer than two variants".to_string(),
            )
            .into());
        }

        // Variants arrive in creation order; only a strictly higher
        // rate displaces the current best, so ties keep the earlier one
        let mut winner = &variants[0];
        let mut best_rate = engagement_rate(winner.counters.clicked, winner.counters.delivered);
        for variant in &variants[1..] {
            let rate = engagement_rate(variant.counters.clicked, variant.counters.delivered);
            if rate > best_rate {
                winner = variant;
                best_rate = rate;
            }
        }

        self.ctx
            .broadcast_repo()
            .commit_winner(broadcast_id, winner.id)
            .await?;

        info!(
            broadcast_id = %broadcast_id,
            variant_id = %winner.id,
            name = %winner.name,
            click_rate = best_rate,
            "Winner selected"
        );

        Ok(WinnerResponse {
            broadcast_id: broadcast_id.to_string(),
            winning_variant_id: winner.id.to_string(),
            name: winner.name.clone(),
            click_rate: best_rate,
        })
    }
}
