//! PostgreSQL implementation of BroadcastRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use botcast_core::entities::{Broadcast, BroadcastStatus};
use botcast_core::traits::{BroadcastRepository, CounterField, RepoResult};
use botcast_core::value_objects::Snowflake;

use crate::models::BroadcastModel;

use super::error::map_db_error;

const BROADCAST_COLUMNS: &str = "id, author_id, status, message, media_url, media_kind, \
     media_caption, segment_id, winning_variant_id, sent_count, delivered_count, opened_count, \
     clicked_count, created_at, updated_at";

/// PostgreSQL implementation of BroadcastRepository
#[derive(Clone)]
pub struct PgBroadcastRepository {
    pool: PgPool,
}

impl PgBroadcastRepository {
    /// Create a new PgBroadcastRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BroadcastRepository for PgBroadcastRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Broadcast>> {
        let result = sqlx::query_as::<_, BroadcastModel>(&format!(
            "SELECT {BROADCAST_COLUMNS} FROM broadcasts WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Broadcast::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn list_recent(&self, limit: i64) -> RepoResult<Vec<Broadcast>> {
        let results = sqlx::query_as::<_, BroadcastModel>(&format!(
            "SELECT {BROADCAST_COLUMNS} FROM broadcasts ORDER BY id DESC LIMIT $1"
        ))
        .bind(limit.clamp(1, 100))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results.into_iter().map(Broadcast::try_from).collect()
    }

    #[instrument(skip(self, broadcast))]
    async fn create(&self, broadcast: &Broadcast) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO broadcasts
                (id, author_id, status, message, media_url, media_kind, media_caption,
                 segment_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(broadcast.id.into_inner())
        .bind(broadcast.author_id.into_inner())
        .bind(broadcast.status.as_str())
        .bind(&broadcast.message)
        .bind(broadcast.media.as_ref().map(|m| m.url.as_str()))
        .bind(broadcast.media.as_ref().map(|m| m.kind.as_str()))
        .bind(broadcast.media.as_ref().and_then(|m| m.caption.as_deref()))
        .bind(broadcast.segment_id.map(Snowflake::into_inner))
        .bind(broadcast.created_at)
        .bind(broadcast.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    /// Compare-and-swap so concurrent dispatchers cannot both move the
    /// same broadcast forward.
    #[instrument(skip(self))]
    async fn update_status(
        &self,
        id: Snowflake,
        from: BroadcastStatus,
        to: BroadcastStatus,
    ) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE broadcasts
            SET status = $3, updated_at = NOW()
            WHERE id = $1 AND status = $2
            "#,
        )
        .bind(id.into_inner())
        .bind(from.as_str())
        .bind(to.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn delete_pending(&self, id: Snowflake) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM broadcasts WHERE id = $1 AND status = 'pending'")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    /// Single-statement increment: the database serializes concurrent
    /// writers on the row, so no update is ever lost.
    #[instrument(skip(self))]
    async fn increment_counter(&self, id: Snowflake, field: CounterField) -> RepoResult<()> {
        let sql = match field {
            CounterField::Sent => {
                "UPDATE broadcasts SET sent_count = sent_count + 1, updated_at = NOW() WHERE id = $1"
            }
            CounterField::Delivered => {
                "UPDATE broadcasts SET delivered_count = delivered_count + 1, updated_at = NOW() WHERE id = $1"
            }
            CounterField::Opened => {
                "UPDATE broadcasts SET opened_count = opened_count + 1, updated_at = NOW() WHERE id = $1"
            }
            CounterField::Clicked => {
                "UPDATE broadcasts SET clicked_count = clicked_count + 1, updated_at = NOW() WHERE id = $1"
            }
        };

        sqlx::query(sql)
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(())
    }

    /// The winner flags and the broadcast pointer move in one
    /// transaction; readers see either the old winner set or the new
    /// one, never a mixture.
    #[instrument(skip(self))]
    async fn commit_winner(
        &self,
        broadcast_id: Snowflake,
        variant_id: Snowflake,
    ) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query("UPDATE variants SET is_winner = (id = $2) WHERE broadcast_id = $1")
            .bind(broadcast_id.into_inner())
            .bind(variant_id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        sqlx::query(
            "UPDATE broadcasts SET winning_variant_id = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(broadcast_id.into_inner())
        .bind(variant_id.into_inner())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }
}
