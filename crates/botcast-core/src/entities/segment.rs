//! Segment entity - a named, reusable recipient selection

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// Named recipient-selection rule
///
/// Selection semantics live outside this engine; here a segment is an
/// identifier that resolves, at dispatch time, to a set of recipient ids.
/// Membership is dynamic: two resolutions at different times may differ.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub id: Snowflake,
    pub name: String,
    /// Materialized member count as of the last refresh
    pub member_count: i64,
    pub created_at: DateTime<Utc>,
}
