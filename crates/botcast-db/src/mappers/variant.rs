//! Variant entity <-> model mapper

use botcast_core::entities::{DeliveryCounters, Variant};
use botcast_core::value_objects::Snowflake;
use botcast_core::DomainError;

use crate::models::VariantModel;

use super::media_from_parts;

impl TryFrom<VariantModel> for Variant {
    type Error = DomainError;

    fn try_from(model: VariantModel) -> Result<Self, Self::Error> {
        let media = media_from_parts(model.media_url, model.media_kind, model.media_caption)?;

        Ok(Variant {
            id: Snowflake::new(model.id),
            broadcast_id: Snowflake::new(model.broadcast_id),
            name: model.name,
            message: model.message,
            media,
            counters: DeliveryCounters {
                sent: model.sent_count,
                delivered: model.delivered_count,
                opened: model.opened_count,
                clicked: model.clicked_count,
            },
            is_winner: model.is_winner,
            created_at: model.created_at,
        })
    }
}
