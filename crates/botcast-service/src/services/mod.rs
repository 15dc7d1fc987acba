//! Business logic services
//!
//! The engine services: campaign authoring, segment resolution,
//! dispatch, delivery event ingestion, analytics, and winner selection.

pub mod analytics;
pub mod campaign;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod ingest;
pub mod segment;
pub mod winner;

// Re-export all services for convenience
pub use analytics::AnalyticsService;
pub use campaign::CampaignService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use dispatch::DispatchService;
pub use error::{ServiceError, ServiceResult};
pub use ingest::IngestService;
pub use segment::{SegmentResolution, SegmentResolver};
pub use winner::WinnerService;

use botcast_core::Snowflake;

/// Parse a string-form Snowflake from a request body
pub(crate) fn parse_id(raw: &str, what: &str) -> ServiceResult<Snowflake> {
    raw.parse()
        .map_err(|_| ServiceError::validation(format!("Invalid {what} format")))
}
