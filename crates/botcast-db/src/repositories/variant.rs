//! PostgreSQL implementation of VariantRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use botcast_core::entities::Variant;
use botcast_core::error::DomainError;
use botcast_core::traits::{CounterField, RepoResult, VariantRepository};
use botcast_core::value_objects::Snowflake;

use crate::models::VariantModel;

use super::error::{map_db_error, map_unique_violation};

const VARIANT_COLUMNS: &str = "id, broadcast_id, name, message, media_url, media_kind, \
     media_caption, sent_count, delivered_count, opened_count, clicked_count, is_winner, \
     created_at";

/// PostgreSQL implementation of VariantRepository
#[derive(Clone)]
pub struct PgVariantRepository {
    pool: PgPool,
}

impl PgVariantRepository {
    /// Create a new PgVariantRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VariantRepository for PgVariantRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Variant>> {
        let result = sqlx::query_as::<_, VariantModel>(&format!(
            "SELECT {VARIANT_COLUMNS} FROM variants WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Variant::try_from).transpose()
    }

    /// Ordered by id, which is creation order - the winner selector's
    /// tie-break relies on this.
    #[instrument(skip(self))]
    async fn find_by_broadcast(&self, broadcast_id: Snowflake) -> RepoResult<Vec<Variant>> {
        let results = sqlx::query_as::<_, VariantModel>(&format!(
            "SELECT {VARIANT_COLUMNS} FROM variants WHERE broadcast_id = $1 ORDER BY id ASC"
        ))
        .bind(broadcast_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results.into_iter().map(Variant::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn name_exists(&self, broadcast_id: Snowflake, name: &str) -> RepoResult<bool> {
        let result: Option<(i64,)> =
            sqlx::query_as("SELECT 1 FROM variants WHERE broadcast_id = $1 AND name = $2 LIMIT 1")
                .bind(broadcast_id.into_inner())
                .bind(name)
                .fetch_optional(&self.pool)
                .await
                .map_err(map_db_error)?;

        Ok(result.is_some())
    }

    #[instrument(skip(self, variant))]
    async fn create(&self, variant: &Variant) -> RepoResult<()> {
        let name = variant.name.clone();
        sqlx::query(
            r#"
            INSERT INTO variants
                (id, broadcast_id, name, message, media_url, media_kind, media_caption,
                 is_winner, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(variant.id.into_inner())
        .bind(variant.broadcast_id.into_inner())
        .bind(&variant.name)
        .bind(&variant.message)
        .bind(variant.media.as_ref().map(|m| m.url.as_str()))
        .bind(variant.media.as_ref().map(|m| m.kind.as_str()))
        .bind(variant.media.as_ref().and_then(|m| m.caption.as_deref()))
        .bind(variant.is_winner)
        .bind(variant.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::DuplicateVariantName(name)))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn increment_counter(&self, id: Snowflake, field: CounterField) -> RepoResult<()> {
        let sql = match field {
            CounterField::Sent => {
                "UPDATE variants SET sent_count = sent_count + 1 WHERE id = $1"
            }
            CounterField::Delivered => {
                "UPDATE variants SET delivered_count = delivered_count + 1 WHERE id = $1"
            }
            CounterField::Opened => {
                "UPDATE variants SET opened_count = opened_count + 1 WHERE id = $1"
            }
            CounterField::Clicked => {
                "UPDATE variants SET clicked_count = clicked_count + 1 WHERE id = $1"
            }
        };

        sqlx::query(sql)
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(())
    }
}
