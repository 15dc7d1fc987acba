//! Broadcast entity <-> model mapper

use botcast_core::entities::{Broadcast, BroadcastStatus, DeliveryCounters};
use botcast_core::value_objects::Snowflake;
use botcast_core::DomainError;

use crate::models::BroadcastModel;

use super::media_from_parts;

impl TryFrom<BroadcastModel> for Broadcast {
    type Error = DomainError;

    fn try_from(model: BroadcastModel) -> Result<Self, Self::Error> {
        let status = BroadcastStatus::parse(&model.status)
            .ok_or_else(|| DomainError::InternalError("unreadable broadcast status".to_string()))?;
        let media = media_from_parts(model.media_url, model.media_kind, model.media_caption)?;

        Ok(Broadcast {
            id: Snowflake::new(model.id),
            author_id: Snowflake::new(model.author_id),
            status,
            message: model.message,
            media,
            segment_id: model.segment_id.map(Snowflake::new),
            winning_variant_id: model.winning_variant_id.map(Snowflake::new),
            counters: DeliveryCounters {
                sent: model.sent_count,
                delivered: model.delivered_count,
                opened: model.opened_count,
                clicked: model.clicked_count,
            },
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
