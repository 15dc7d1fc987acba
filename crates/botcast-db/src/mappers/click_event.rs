//! Click event entity <-> model mapper

use botcast_core::entities::ClickEvent;
use botcast_core::traits::ButtonClickCount;
use botcast_core::value_objects::Snowflake;

use crate::models::{ButtonClickRow, ClickEventModel};

impl From<ClickEventModel> for ClickEvent {
    fn from(model: ClickEventModel) -> Self {
        ClickEvent {
            id: Snowflake::new(model.id),
            button_id: Snowflake::new(model.button_id),
            variant_id: model.variant_id.map(Snowflake::new),
            broadcast_id: Snowflake::new(model.broadcast_id),
            recipient_id: Snowflake::new(model.recipient_id),
            button_label: model.button_label,
            event_id: model.event_id,
            clicked_at: model.clicked_at,
        }
    }
}

impl From<ButtonClickRow> for ButtonClickCount {
    fn from(row: ButtonClickRow) -> Self {
        ButtonClickCount {
            button_id: Snowflake::new(row.button_id),
            label: row.label,
            clicks: row.clicks,
        }
    }
}
