//! Button entity <-> model mapper

use botcast_core::entities::{Button, ButtonAction};
use botcast_core::value_objects::Snowflake;
use botcast_core::DomainError;

use crate::models::ButtonModel;

impl TryFrom<ButtonModel> for Button {
    type Error = DomainError;

    fn try_from(model: ButtonModel) -> Result<Self, Self::Error> {
        let action = ButtonAction::from_parts(&model.action_kind, model.action_value)
            .ok_or_else(|| DomainError::InternalError("unreadable button action".to_string()))?;

        Ok(Button {
            id: Snowflake::new(model.id),
            broadcast_id: Snowflake::new(model.broadcast_id),
            variant_id: model.variant_id.map(Snowflake::new),
            label: model.label,
            action,
            row: model.row_index,
            position: model.ordinal,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_mapping() {
        let model = ButtonModel {
            id: 1,
            broadcast_id: 2,
            variant_id: None,
            label: "Open shop".to_string(),
            action_kind: "url".to_string(),
            action_value: "https://shop.example".to_string(),
            row_index: 0,
            ordinal: 0,
        };
        let button = Button::try_from(model).unwrap();
        assert_eq!(
            button.action,
            ButtonAction::Url("https://shop.example".to_string())
        );
    }
}
