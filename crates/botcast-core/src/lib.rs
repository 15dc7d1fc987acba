//! # botcast-core
//!
//! Domain layer of the broadcast campaign engine: entities, value
//! objects, ports, and pure domain logic (status lifecycle, button
//! layout, template rendering). This crate has zero dependencies on
//! infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod events;
pub mod template;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    layout, Broadcast, BroadcastStatus, Button, ButtonAction, ClickEvent, DeliveryCounters,
    MediaAttachment, MediaKind, Segment, Variant, MAX_MESSAGE_LEN, MAX_VARIANT_NAME_LEN,
};
pub use error::DomainError;
pub use events::{DeliveryEvent, DeliveryEventKind};
pub use traits::{
    BroadcastRepository, ButtonClickCount, ButtonRepository, ClickEventRepository, CounterField,
    DeliveryReceipt, MessageTransport, RenderedMessage, RepoResult, SegmentRepository,
    TransportError, VariantRepository,
};
pub use value_objects::{Snowflake, SnowflakeGenerator, SnowflakeParseError};
