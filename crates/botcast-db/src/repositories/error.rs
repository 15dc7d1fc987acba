//! Error handling utilities for repositories

use botcast_core::error::DomainError;
use botcast_core::value_objects::Snowflake;
use sqlx::Error as SqlxError;

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Check for unique violation and return appropriate error or fallback
pub fn map_unique_violation<F>(e: SqlxError, on_unique: F) -> DomainError
where
    F: FnOnce() -> DomainError,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return on_unique();
        }
    }
    DomainError::DatabaseError(e.to_string())
}

/// Create a "broadcast not found" error
pub fn broadcast_not_found(id: Snowflake) -> DomainError {
    DomainError::BroadcastNotFound(id)
}

/// Create a "variant not found" error
pub fn variant_not_found(id: Snowflake) -> DomainError {
    DomainError::VariantNotFound(id)
}

/// Create a "button not found" error
pub fn button_not_found(id: Snowflake) -> DomainError {
    DomainError::ButtonNotFound(id)
}

/// Create a "segment not found" error
pub fn segment_not_found(id: Snowflake) -> DomainError {
    DomainError::SegmentNotFound(id)
}
