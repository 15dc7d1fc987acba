//! # botcast-db
//!
//! Database layer implementing the core repository traits with
//! PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! - Connection pool management
//! - Database models with SQLx `FromRow` derives
//! - Entity <-> model mappers
//! - Repository implementations
//!
//! Counter mutations are exposed only as single-statement atomic
//! increments, and the winner commit runs inside one transaction; both
//! are correctness requirements under concurrent event ingestion, not
//! optimizations.

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, create_pool_from_env, DatabaseConfig, PgPool};
pub use repositories::{
    PgBroadcastRepository, PgButtonRepository, PgClickEventRepository, PgSegmentRepository,
    PgVariantRepository,
};
