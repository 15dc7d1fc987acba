//! Button entity - inline actions attached to a message

use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Target action of a button press
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum ButtonAction {
    /// Open an external link
    Url(String),
    /// Send a callback payload back to the bot
    Callback(String),
}

impl ButtonAction {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Url(_) => "url",
            Self::Callback(_) => "callback",
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Self::Url(v) | Self::Callback(v) => v,
        }
    }

    /// Rebuild from the database (kind, value) pair
    pub fn from_parts(kind: &str, value: String) -> Option<Self> {
        match kind {
            "url" => Some(Self::Url(value)),
            "callback" => Some(Self::Callback(value)),
            _ => None,
        }
    }
}

/// Inline button attached to a Variant (or to a single-variant Broadcast)
///
/// Immutable once the owning broadcast leaves `pending`: delivered
/// messages must keep matching the definition used to render them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub id: Snowflake,
    pub broadcast_id: Snowflake,
    /// None when the button belongs to a single-variant broadcast
    pub variant_id: Option<Snowflake>,
    pub label: String,
    pub action: ButtonAction,
    /// Zero-based layout row; rows need not be contiguous
    pub row: i32,
    /// Ordinal position within the row, left to right
    pub position: i32,
}

/// Group buttons into render rows: ascending row number, then ascending
/// position within each row.
///
/// Pure function of the button set; gaps in row numbers collapse.
pub fn layout(buttons: &[Button]) -> Vec<Vec<Button>> {
    use std::collections::BTreeMap;

    let mut rows: BTreeMap<i32, Vec<Button>> = BTreeMap::new();
    for button in buttons {
        rows.entry(button.row).or_default().push(button.clone());
    }
    rows.into_values()
        .map(|mut row| {
            row.sort_by_key(|b| b.position);
            row
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn button(id: i64, row: i32, position: i32) -> Button {
        Button {
            id: Snowflake::new(id),
            broadcast_id: Snowflake::new(1),
            variant_id: None,
            label: format!("b{id}"),
            action: ButtonAction::Callback(format!("cb:{id}")),
            row,
            position,
        }
    }

    #[test]
    fn test_action_parts_roundtrip() {
        let url = ButtonAction::Url("https://shop.example".to_string());
        assert_eq!(
            ButtonAction::from_parts(url.kind(), url.value().to_string()),
            Some(url)
        );
        assert_eq!(ButtonAction::from_parts("bogus", String::new()), None);
    }

    #[test]
    fn test_layout_orders_rows_and_positions() {
        // rows [0,0,1], positions [1,0,0]
        let buttons = vec![button(1, 0, 1), button(2, 0, 0), button(3, 1, 0)];
        let rows = layout(&buttons);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][0].id, Snowflake::new(2));
        assert_eq!(rows[0][1].id, Snowflake::new(1));
        assert_eq!(rows[1][0].id, Snowflake::new(3));
    }

    #[test]
    fn test_layout_skipped_rows_collapse() {
        let buttons = vec![button(1, 5, 0), button(2, 2, 0)];
        let rows = layout(&buttons);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][0].id, Snowflake::new(2));
        assert_eq!(rows[1][0].id, Snowflake::new(1));
    }

    #[test]
    fn test_layout_empty() {
        assert!(layout(&[]).is_empty());
    }
}
