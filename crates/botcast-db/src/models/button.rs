//! Button database model

use sqlx::FromRow;

/// Database model for the buttons table
///
/// `row` is a reserved word in PostgreSQL, hence `row_index`/`ordinal`.
#[derive(Debug, Clone, FromRow)]
pub struct ButtonModel {
    pub id: i64,
    pub broadcast_id: i64,
    pub variant_id: Option<i64>,
    pub label: String,
    pub action_kind: String,
    pub action_value: String,
    pub row_index: i32,
    pub ordinal: i32,
}
