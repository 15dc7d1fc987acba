//! Campaign service
//!
//! Authoring and lifecycle of broadcasts, their variants, and buttons.
//! Everything here mutates only campaigns still in `pending`; once a
//! broadcast has been dispatched its definition is frozen.

use botcast_core::entities::{
    Broadcast, Button, ButtonAction, MediaAttachment, MediaKind, Variant, MAX_VARIANT_NAME_LEN,
};
use botcast_core::{DomainError, Snowflake};
use tracing::{info, instrument};

use crate::dto::{
    BroadcastResponse, ButtonResponse, CreateBroadcastRequest, CreateButtonRequest,
    CreateVariantRequest, MediaInput, VariantResponse,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::parse_id;

/// Campaign service
pub struct CampaignService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> CampaignService<'a> {
    /// Create a new CampaignService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a new broadcast
    #[instrument(skip(self, request))]
    pub async fn create_broadcast(
        &self,
        request: CreateBroadcastRequest,
    ) -> ServiceResult<BroadcastResponse> {
        let author_id = parse_id(&request.author_id, "author_id")?;
        Broadcast::validate_message(&request.message)?;

        let segment_id = match request.segment_id.as_deref() {
            Some(raw) => {
                let id = parse_id(raw, "segment_id")?;
                // Fail fast on a dangling segment reference; membership
                // itself is resolved later, at dispatch time
                self.ctx
                    .segment_repo()
                    .find_by_id(id)
                    .await?
                    .ok_or(DomainError::SegmentNotFound(id))?;
                Some(id)
            }
            None => None,
        };

        let mut broadcast = Broadcast::new(self.ctx.generate_id(), author_id, request.message);
        broadcast.segment_id = segment_id;
        broadcast.media = request.media.map(media_from_input).transpose()?;

        self.ctx.broadcast_repo().create(&broadcast).await?;

        info!(broadcast_id = %broadcast.id, "Broadcast created");

        Ok(BroadcastResponse::from(&broadcast))
    }

    /// Get broadcast by ID
    #[instrument(skip(self))]
    pub async fn get_broadcast(&self, id: Snowflake) -> ServiceResult<BroadcastResponse> {
        let broadcast = self
            .ctx
            .broadcast_repo()
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Broadcast", id.to_string()))?;

        Ok(BroadcastResponse::from(&broadcast))
    }

    /// List most recent broadcasts
    #[instrument(skip(self))]
    pub async fn list_broadcasts(&self, limit: i64) -> ServiceResult<Vec<BroadcastResponse>> {
        let broadcasts = self.ctx.broadcast_repo().list_recent(limit).await?;
        Ok(broadcasts.iter().map(BroadcastResponse::from).collect())
    }

    /// Cancel a broadcast that has not been dispatched yet
    ///
    /// A campaign past `pending` cannot be cancelled: recipients already
    /// notified cannot be un-notified.
    #[instrument(skip(self))]
    pub async fn cancel_broadcast(&self, id: Snowflake) -> ServiceResult<()> {
        self.require_broadcast(id).await?;

        if !self.ctx.broadcast_repo().delete_pending(id).await? {
            return Err(ServiceError::conflict(
                "Only pending broadcasts can be cancelled",
            ));
        }

        info!(broadcast_id = %id, "Pending broadcast discarded");
        Ok(())
    }

    /// Add a message variant to a pending broadcast
    #[instrument(skip(self, request))]
    pub async fn create_variant(
        &self,
        broadcast_id: Snowflake,
        request: CreateVariantRequest,
    ) -> ServiceResult<VariantResponse> {
        let broadcast = self.require_editable(broadcast_id).await?;

        Broadcast::validate_message(&request.message)?;
        if request.name.trim().is_empty() || request.name.chars().count() > MAX_VARIANT_NAME_LEN {
            return Err(ServiceError::validation(format!(
                "Variant name must be 1-{MAX_VARIANT_NAME_LEN} characters"
            )));
        }

        if self
            .ctx
            .variant_repo()
            .name_exists(broadcast.id, &request.name)
            .await?
        {
            return Err(DomainError::DuplicateVariantName(request.name).into());
        }

        let mut variant = Variant::new(
            self.ctx.generate_id(),
            broadcast.id,
            request.name,
            request.message,
        );
        variant.media = request.media.map(media_from_input).transpose()?;

        self.ctx.variant_repo().create(&variant).await?;

        info!(
            broadcast_id = %broadcast.id,
            variant_id = %variant.id,
            name = %variant.name,
            "Variant created"
        );

        Ok(VariantResponse::from(&variant))
    }

    /// List variants of a broadcast in creation order
    #[instrument(skip(self))]
    pub async fn list_variants(
        &self,
        broadcast_id: Snowflake,
    ) -> ServiceResult<Vec<VariantResponse>> {
        self.require_broadcast(broadcast_id).await?;

        let variants = self
            .ctx
            .variant_repo()
            .find_by_broadcast(broadcast_id)
            .await?;
        Ok(variants.iter().map(VariantResponse::from).collect())
    }

    /// Attach an inline button to a pending broadcast or one of its variants
    #[instrument(skip(self, request))]
    pub async fn add_button(
        &self,
        broadcast_id: Snowflake,
        request: CreateButtonRequest,
    ) -> ServiceResult<ButtonResponse> {
        let broadcast = self.require_editable(broadcast_id).await?;

        let action = match (request.url, request.callback) {
            (Some(url), None) => ButtonAction::Url(url),
            (None, Some(callback)) => ButtonAction::Callback(callback),
            _ => {
                return Err(ServiceError::validation(
                    "Exactly one of url or callback must be provided",
                ))
            }
        };

        let variant_id = match request.variant_id.as_deref() {
            Some(raw) => {
                let id = parse_id(raw, "variant_id")?;
                let variant = self
                    .ctx
                    .variant_repo()
                    .find_by_id(id)
                    .await?
                    .ok_or(DomainError::VariantNotFound(id))?;
                if variant.broadcast_id != broadcast.id {
                    return Err(ServiceError::validation(
                        "Variant does not belong to this broadcast",
                    ));
                }
                Some(id)
            }
            None => None,
        };

        let button = Button {
            id: self.ctx.generate_id(),
            broadcast_id: broadcast.id,
            variant_id,
            label: request.label,
            action,
            row: request.row,
            position: request.position,
        };

        self.ctx.button_repo().create(&button).await?;

        info!(broadcast_id = %broadcast.id, button_id = %button.id, "Button attached");

        Ok(ButtonResponse::from(&button))
    }

    /// List buttons of a broadcast in render order
    #[instrument(skip(self))]
    pub async fn list_buttons(&self, broadcast_id: Snowflake) -> ServiceResult<Vec<ButtonResponse>> {
        self.require_broadcast(broadcast_id).await?;

        let buttons = self
            .ctx
            .button_repo()
            .find_by_broadcast(broadcast_id)
            .await?;
        Ok(buttons.iter().map(ButtonResponse::from).collect())
    }

    /// Load a broadcast or fail with not-found
    async fn require_broadcast(&self, id: Snowflake) -> ServiceResult<Broadcast> {
        self.ctx
            .broadcast_repo()
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Broadcast", id.to_string()))
    }

    /// Load a broadcast that is still editable (pending)
    async fn require_editable(&self, id: Snowflake) -> ServiceResult<Broadcast> {
        let broadcast = self.require_broadcast(id).await?;
        if !broadcast.is_editable() {
            return Err(DomainError::BroadcastLocked(id).into());
        }
        Ok(broadcast)
    }
}

/// Convert validated media input into the domain attachment
fn media_from_input(input: MediaInput) -> Result<MediaAttachment, ServiceError> {
    let kind = MediaKind::parse(&input.kind).ok_or_else(|| {
        ServiceError::validation("Media kind must be one of: photo, video, document")
    })?;
    Ok(MediaAttachment {
        url: input.url,
        kind,
        caption: input.caption,
    })
}
