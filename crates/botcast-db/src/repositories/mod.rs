//! PostgreSQL repository implementations

mod broadcast;
mod button;
mod click_event;
mod error;
mod segment;
mod variant;

pub use broadcast::PgBroadcastRepository;
pub use button::PgButtonRepository;
pub use click_event::PgClickEventRepository;
pub use segment::PgSegmentRepository;
pub use variant::PgVariantRepository;
