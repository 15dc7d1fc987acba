//! Database models with SQLx FromRow derives

mod broadcast;
mod button;
mod click_event;
mod segment;
mod variant;

pub use broadcast::BroadcastModel;
pub use button::ButtonModel;
pub use click_event::{ButtonClickRow, ClickEventModel};
pub use segment::SegmentModel;
pub use variant::VariantModel;
