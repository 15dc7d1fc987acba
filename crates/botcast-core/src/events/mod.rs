//! Inbound events reported by the external delivery service

mod delivery_event;

pub use delivery_event::{DeliveryEvent, DeliveryEventKind};
