//! Entity <-> model mappers
//!
//! Model-to-entity conversions are fallible (`TryFrom`) where stored
//! strings must parse back into domain enums; a row that fails to parse
//! indicates corruption and surfaces as an internal error.

mod broadcast;
mod button;
mod click_event;
mod segment;
mod variant;

use botcast_core::entities::{MediaAttachment, MediaKind};
use botcast_core::DomainError;

/// Rebuild an optional media attachment from its column triplet
pub(crate) fn media_from_parts(
    url: Option<String>,
    kind: Option<String>,
    caption: Option<String>,
) -> Result<Option<MediaAttachment>, DomainError> {
    match url {
        None => Ok(None),
        Some(url) => {
            let kind = kind
                .as_deref()
                .and_then(MediaKind::parse)
                .ok_or_else(|| DomainError::InternalError("unreadable media kind".to_string()))?;
            Ok(Some(MediaAttachment { url, kind, caption }))
        }
    }
}
