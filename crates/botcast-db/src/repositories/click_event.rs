//! PostgreSQL implementation of ClickEventRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use botcast_core::entities::ClickEvent;
use botcast_core::traits::{ButtonClickCount, ClickEventRepository, RepoResult};
use botcast_core::value_objects::Snowflake;

use crate::models::ButtonClickRow;

use super::error::map_db_error;

/// PostgreSQL implementation of ClickEventRepository
#[derive(Clone)]
pub struct PgClickEventRepository {
    pool: PgPool,
}

impl PgClickEventRepository {
    /// Create a new PgClickEventRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClickEventRepository for PgClickEventRepository {
    #[instrument(skip(self, event))]
    async fn append(&self, event: &ClickEvent) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO click_events
                (id, button_id, variant_id, broadcast_id, recipient_id, button_label,
                 event_id, clicked_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(event.id.into_inner())
        .bind(event.button_id.into_inner())
        .bind(event.variant_id.map(Snowflake::into_inner))
        .bind(event.broadcast_id.into_inner())
        .bind(event.recipient_id.into_inner())
        .bind(&event.button_label)
        .bind(event.event_id.as_deref())
        .bind(event.clicked_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    /// Labels come from the records themselves (snapshotted at click
    /// time), not from a join against the live buttons table.
    #[instrument(skip(self))]
    async fn count_by_button(&self, broadcast_id: Snowflake) -> RepoResult<Vec<ButtonClickCount>> {
        let rows = sqlx::query_as::<_, ButtonClickRow>(
            r#"
            SELECT button_id, MAX(button_label) AS label, COUNT(*) AS clicks
            FROM click_events
            WHERE broadcast_id = $1
            GROUP BY button_id
            ORDER BY clicks DESC, button_id ASC
            "#,
        )
        .bind(broadcast_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(ButtonClickCount::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgClickEventRepository>();
    }
}
