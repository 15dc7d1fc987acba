//! PostgreSQL implementation of ButtonRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use botcast_core::entities::Button;
use botcast_core::traits::{ButtonRepository, RepoResult};
use botcast_core::value_objects::Snowflake;

use crate::models::ButtonModel;

use super::error::map_db_error;

const BUTTON_COLUMNS: &str =
    "id, broadcast_id, variant_id, label, action_kind, action_value, row_index, ordinal";

/// PostgreSQL implementation of ButtonRepository
#[derive(Clone)]
pub struct PgButtonRepository {
    pool: PgPool,
}

impl PgButtonRepository {
    /// Create a new PgButtonRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ButtonRepository for PgButtonRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Button>> {
        let result = sqlx::query_as::<_, ButtonModel>(&format!(
            "SELECT {BUTTON_COLUMNS} FROM buttons WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Button::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_broadcast(&self, broadcast_id: Snowflake) -> RepoResult<Vec<Button>> {
        let results = sqlx::query_as::<_, ButtonModel>(&format!(
            "SELECT {BUTTON_COLUMNS} FROM buttons WHERE broadcast_id = $1 \
             ORDER BY row_index ASC, ordinal ASC"
        ))
        .bind(broadcast_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results.into_iter().map(Button::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn find_by_variant(&self, variant_id: Snowflake) -> RepoResult<Vec<Button>> {
        let results = sqlx::query_as::<_, ButtonModel>(&format!(
            "SELECT {BUTTON_COLUMNS} FROM buttons WHERE variant_id = $1 \
             ORDER BY row_index ASC, ordinal ASC"
        ))
        .bind(variant_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results.into_iter().map(Button::try_from).collect()
    }

    #[instrument(skip(self, button))]
    async fn create(&self, button: &Button) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO buttons
                (id, broadcast_id, variant_id, label, action_kind, action_value,
                 row_index, ordinal)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(button.id.into_inner())
        .bind(button.broadcast_id.into_inner())
        .bind(button.variant_id.map(Snowflake::into_inner))
        .bind(&button.label)
        .bind(button.action.kind())
        .bind(button.action.value())
        .bind(button.row)
        .bind(button.position)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }
}
