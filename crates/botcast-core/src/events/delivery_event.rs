//! Delivery event - one report from the external transport
//!
//! Events arrive at-least-once, out of order, from many workers at
//! once. Counters are additive; callers wanting exactly-once semantics
//! attach an `event_id` of their own.

use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Kind of engagement being reported
///
/// `Opened` and `Clicked` are independently reported signals; the engine
/// never infers one from the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryEventKind {
    Delivered,
    Opened,
    Clicked,
}

impl DeliveryEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Delivered => "delivered",
            Self::Opened => "opened",
            Self::Clicked => "clicked",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "delivered" => Some(Self::Delivered),
            "opened" => Some(Self::Opened),
            "clicked" => Some(Self::Clicked),
            _ => None,
        }
    }
}

/// One inbound delivery/engagement report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryEvent {
    pub broadcast_id: Snowflake,
    /// None when the campaign has a single implicit variant
    pub variant_id: Option<Snowflake>,
    pub recipient_id: Snowflake,
    pub kind: DeliveryEventKind,
    /// Required for `Clicked` events
    pub button_id: Option<Snowflake>,
    /// Caller-supplied idempotency key, recorded with click attributions
    pub event_id: Option<String>,
}
