//! Domain entities - core campaign objects

mod broadcast;
mod button;
mod click_event;
mod segment;
mod variant;

pub use broadcast::{
    Broadcast, BroadcastStatus, DeliveryCounters, MediaAttachment, MediaKind, MAX_MESSAGE_LEN,
};
pub use button::{layout, Button, ButtonAction};
pub use click_event::ClickEvent;
pub use segment::Segment;
pub use variant::{Variant, MAX_VARIANT_NAME_LEN};
