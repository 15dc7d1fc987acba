//! Path parameter extractors
//!
//! Type-safe extraction of Snowflake IDs from path parameters.

use botcast_core::Snowflake;

use crate::response::ApiError;

/// Path parameters with broadcast_id
#[derive(Debug, serde::Deserialize)]
pub struct BroadcastIdPath {
    pub broadcast_id: String,
}

impl BroadcastIdPath {
    /// Parse broadcast_id as Snowflake
    pub fn broadcast_id(&self) -> Result<Snowflake, ApiError> {
        self.broadcast_id
            .parse()
            .map_err(|_| ApiError::invalid_path("Invalid broadcast_id format"))
    }
}

/// Path parameters with variant_id
#[derive(Debug, serde::Deserialize)]
pub struct VariantIdPath {
    pub variant_id: String,
}

impl VariantIdPath {
    /// Parse variant_id as Snowflake
    pub fn variant_id(&self) -> Result<Snowflake, ApiError> {
        self.variant_id
            .parse()
            .map_err(|_| ApiError::invalid_path("Invalid variant_id format"))
    }
}
