//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs; the infrastructure layer
//! provides the implementation. Counters are deliberately exposed only
//! as increment operations: a plain read-then-write across a process
//! boundary loses updates under concurrent event ingestion.

use async_trait::async_trait;

use crate::entities::{Broadcast, BroadcastStatus, Button, ClickEvent, Segment, Variant};
use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

/// Which delivery counter an increment targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterField {
    Sent,
    Delivered,
    Opened,
    Clicked,
}

// ============================================================================
// Broadcast Repository
// ============================================================================

#[async_trait]
pub trait BroadcastRepository: Send + Sync {
    /// Find broadcast by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Broadcast>>;

    /// List most recent broadcasts, newest first
    async fn list_recent(&self, limit: i64) -> RepoResult<Vec<Broadcast>>;

    /// Create a new broadcast
    async fn create(&self, broadcast: &Broadcast) -> RepoResult<()>;

    /// Compare-and-swap status transition; returns false if the broadcast
    /// was not in `from` (another actor got there first)
    async fn update_status(
        &self,
        id: Snowflake,
        from: BroadcastStatus,
        to: BroadcastStatus,
    ) -> RepoResult<bool>;

    /// Delete a broadcast still in `pending`; returns false if it had
    /// already left that state
    async fn delete_pending(&self, id: Snowflake) -> RepoResult<bool>;

    /// Atomically add one to a campaign-level counter
    async fn increment_counter(&self, id: Snowflake, field: CounterField) -> RepoResult<()>;

    /// Commit the winner selection as one transaction: set `is_winner`
    /// on the chosen variant, clear it on every sibling, and point the
    /// broadcast at the winner. A concurrent reader never observes two
    /// winners or a half-cleared state.
    async fn commit_winner(&self, broadcast_id: Snowflake, variant_id: Snowflake)
        -> RepoResult<()>;
}

// ============================================================================
// Variant Repository
// ============================================================================

#[async_trait]
pub trait VariantRepository: Send + Sync {
    /// Find variant by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Variant>>;

    /// List all variants of a broadcast in creation order
    async fn find_by_broadcast(&self, broadcast_id: Snowflake) -> RepoResult<Vec<Variant>>;

    /// Check if a variant name is already taken within a broadcast
    async fn name_exists(&self, broadcast_id: Snowflake, name: &str) -> RepoResult<bool>;

    /// Create a new variant
    async fn create(&self, variant: &Variant) -> RepoResult<()>;

    /// Atomically add one to a per-variant counter
    async fn increment_counter(&self, id: Snowflake, field: CounterField) -> RepoResult<()>;
}

// ============================================================================
// Button Repository
// ============================================================================

#[async_trait]
pub trait ButtonRepository: Send + Sync {
    /// Find button by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Button>>;

    /// List buttons of a broadcast (row, then position order)
    async fn find_by_broadcast(&self, broadcast_id: Snowflake) -> RepoResult<Vec<Button>>;

    /// List buttons of a variant (row, then position order)
    async fn find_by_variant(&self, variant_id: Snowflake) -> RepoResult<Vec<Button>>;

    /// Create a new button
    async fn create(&self, button: &Button) -> RepoResult<()>;
}

// ============================================================================
// Click Event Repository
// ============================================================================

/// Raw click total for one button, with the label snapshotted at click time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonClickCount {
    pub button_id: Snowflake,
    pub label: String,
    pub clicks: i64,
}

#[async_trait]
pub trait ClickEventRepository: Send + Sync {
    /// Append one click attribution record (duplicates are kept)
    async fn append(&self, event: &ClickEvent) -> RepoResult<()>;

    /// Raw click totals per button for a broadcast, most clicked first
    async fn count_by_button(&self, broadcast_id: Snowflake) -> RepoResult<Vec<ButtonClickCount>>;
}

// ============================================================================
// Segment Repository
// ============================================================================

#[async_trait]
pub trait SegmentRepository: Send + Sync {
    /// Find segment by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Segment>>;

    /// Resolve current segment membership to recipient ids
    async fn member_ids(&self, segment_id: Snowflake) -> RepoResult<Vec<Snowflake>>;

    /// All known recipient ids (the "no segment" universe)
    async fn all_recipient_ids(&self) -> RepoResult<Vec<Snowflake>>;
}
