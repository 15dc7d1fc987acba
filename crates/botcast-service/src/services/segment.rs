//! Segment resolver
//!
//! Turns a segment reference into the concrete recipient set valid at
//! resolution time. Membership is dynamic; each dispatch treats its own
//! resolution as authoritative and never reconciles afterwards.

use botcast_core::{DomainError, Snowflake};
use tracing::{instrument, warn};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// The recipient set a dispatch will address
#[derive(Debug, Clone)]
pub struct SegmentResolution {
    pub recipient_ids: Vec<Snowflake>,
    pub count: usize,
}

/// Segment resolver service
pub struct SegmentResolver<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> SegmentResolver<'a> {
    /// Create a new SegmentResolver
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Resolve a segment reference to recipient ids
    ///
    /// `None` means "all known recipients". A dangling reference aborts
    /// the dispatch unless the deployment explicitly opted into the
    /// all-recipients fallback.
    #[instrument(skip(self))]
    pub async fn resolve(
        &self,
        segment_id: Option<Snowflake>,
    ) -> ServiceResult<SegmentResolution> {
        let recipient_ids = match segment_id {
            None => self.ctx.segment_repo().all_recipient_ids().await?,
            Some(id) => match self.ctx.segment_repo().find_by_id(id).await? {
                Some(segment) => self.ctx.segment_repo().member_ids(segment.id).await?,
                None if self.ctx.dispatch_config().fallback_to_all_recipients => {
                    warn!(segment_id = %id, "Segment missing, falling back to all recipients");
                    self.ctx.segment_repo().all_recipient_ids().await?
                }
                None => return Err(DomainError::SegmentNotFound(id).into()),
            },
        };

        let count = recipient_ids.len();
        Ok(SegmentResolution {
            recipient_ids,
            count,
        })
    }
}
