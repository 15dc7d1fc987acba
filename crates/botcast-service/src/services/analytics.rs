//! Analytics aggregator
//!
//! Derives per-variant and per-broadcast engagement rates from the
//! counters the ingestor maintains, and groups click attributions per
//! button. Read-only.

use botcast_core::entities::{DeliveryCounters, Variant};
use botcast_core::Snowflake;
use tracing::instrument;

use crate::dto::{
    BroadcastStatsResponse, ButtonClickResponse, StatsTotals, VariantStatsResponse,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Engagement rate as a percentage; 0 when nothing was delivered yet
/// (a campaign with no deliveries has no meaningful rate, and division
/// by zero must never leak into responses)
pub fn engagement_rate(count: i64, delivered: i64) -> f64 {
    if delivered <= 0 {
        0.0
    } else {
        count as f64 / delivered as f64 * 100.0
    }
}

/// Derived statistics for one variant
pub fn variant_stats(variant: &Variant) -> VariantStatsResponse {
    let c = &variant.counters;
    VariantStatsResponse {
        id: variant.id.to_string(),
        name: variant.name.clone(),
        sent: c.sent,
        delivered: c.delivered,
        opened: c.opened,
        clicked: c.clicked,
        open_rate: engagement_rate(c.opened, c.delivered),
        click_rate: engagement_rate(c.clicked, c.delivered),
        is_winner: variant.is_winner,
    }
}

fn totals_from(counters: &DeliveryCounters) -> StatsTotals {
    StatsTotals {
        sent: counters.sent,
        delivered: counters.delivered,
        opened: counters.opened,
        clicked: counters.clicked,
        open_rate: engagement_rate(counters.opened, counters.delivered),
        click_rate: engagement_rate(counters.clicked, counters.delivered),
    }
}

/// Analytics service
pub struct AnalyticsService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AnalyticsService<'a> {
    /// Create a new AnalyticsService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Full statistics for a broadcast: totals, per-variant rows in
    /// creation order, and raw button click totals
    #[instrument(skip(self))]
    pub async fn broadcast_stats(
        &self,
        broadcast_id: Snowflake,
    ) -> ServiceResult<BroadcastStatsResponse> {
        let broadcast = self
            .ctx
            .broadcast_repo()
            .find_by_id(broadcast_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Broadcast", broadcast_id.to_string()))?;

        let variants = self
            .ctx
            .variant_repo()
            .find_by_broadcast(broadcast_id)
            .await?;

        // Single-variant campaigns track counters on the broadcast row;
        // A/B campaigns sum their variants
        let totals = if variants.is_empty() {
            totals_from(&broadcast.counters)
        } else {
            let mut sum = DeliveryCounters::default();
            for v in &variants {
                sum.sent += v.counters.sent;
                sum.delivered += v.counters.delivered;
                sum.opened += v.counters.opened;
                sum.clicked += v.counters.clicked;
            }
            totals_from(&sum)
        };

        let buttons = self
            .ctx
            .click_repo()
            .count_by_button(broadcast_id)
            .await?;

        Ok(BroadcastStatsResponse {
            broadcast_id: broadcast.id.to_string(),
            status: broadcast.status.as_str().to_string(),
            totals,
            variants: variants.iter().map(variant_stats).collect(),
            buttons: buttons.iter().map(ButtonClickResponse::from).collect(),
        })
    }

    /// Derived statistics for one variant
    #[instrument(skip(self))]
    pub async fn variant_stats_by_id(
        &self,
        variant_id: Snowflake,
    ) -> ServiceResult<VariantStatsResponse> {
        let variant = self
            .ctx
            .variant_repo()
            .find_by_id(variant_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Variant", variant_id.to_string()))?;

        Ok(variant_stats(&variant))
    }
}
