//! ClickEvent entity - button-click attribution records

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// One recipient clicking one button, once
///
/// The button label is snapshotted at click time so a later edit to the
/// button cannot rewrite historical attribution. Duplicates are kept:
/// aggregation counts raw clicks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    pub id: Snowflake,
    pub button_id: Snowflake,
    /// None when the click targeted a single-variant broadcast
    pub variant_id: Option<Snowflake>,
    pub broadcast_id: Snowflake,
    pub recipient_id: Snowflake,
    /// Button label as it read when the click was recorded
    pub button_label: String,
    /// Caller-supplied identifier for exactly-once processing, if any
    pub event_id: Option<String>,
    pub clicked_at: DateTime<Utc>,
}
