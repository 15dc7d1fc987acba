//! Segment entity <-> model mapper

use botcast_core::entities::Segment;
use botcast_core::value_objects::Snowflake;

use crate::models::SegmentModel;

impl From<SegmentModel> for Segment {
    fn from(model: SegmentModel) -> Self {
        Segment {
            id: Snowflake::new(model.id),
            name: model.name,
            member_count: model.member_count,
            created_at: model.created_at,
        }
    }
}
