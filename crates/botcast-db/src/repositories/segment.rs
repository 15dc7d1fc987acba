//! PostgreSQL implementation of SegmentRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use botcast_core::entities::Segment;
use botcast_core::traits::{RepoResult, SegmentRepository};
use botcast_core::value_objects::Snowflake;

use crate::models::SegmentModel;

use super::error::map_db_error;

/// PostgreSQL implementation of SegmentRepository
#[derive(Clone)]
pub struct PgSegmentRepository {
    pool: PgPool,
}

impl PgSegmentRepository {
    /// Create a new PgSegmentRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SegmentRepository for PgSegmentRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Segment>> {
        let result = sqlx::query_as::<_, SegmentModel>(
            "SELECT id, name, member_count, created_at FROM segments WHERE id = $1",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Segment::from))
    }

    /// Snapshot of current membership; two calls at different times may
    /// legitimately differ.
    #[instrument(skip(self))]
    async fn member_ids(&self, segment_id: Snowflake) -> RepoResult<Vec<Snowflake>> {
        let rows: Vec<(i64,)> =
            sqlx::query_as("SELECT recipient_id FROM segment_members WHERE segment_id = $1")
                .bind(segment_id.into_inner())
                .fetch_all(&self.pool)
                .await
                .map_err(map_db_error)?;

        Ok(rows.into_iter().map(|(id,)| Snowflake::new(id)).collect())
    }

    #[instrument(skip(self))]
    async fn all_recipient_ids(&self) -> RepoResult<Vec<Snowflake>> {
        let rows: Vec<(i64,)> = sqlx::query_as("SELECT id FROM recipients")
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(rows.into_iter().map(|(id,)| Snowflake::new(id)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgSegmentRepository>();
    }
}
