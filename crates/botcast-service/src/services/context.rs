//! Service context - dependency container for services
//!
//! Holds the repositories, the message transport, and the ID generator
//! needed by the engine services.

use std::sync::Arc;

use botcast_common::DispatchConfig;
use botcast_core::traits::{
    BroadcastRepository, ButtonRepository, ClickEventRepository, MessageTransport,
    SegmentRepository, VariantRepository,
};
use botcast_core::SnowflakeGenerator;

/// Service context containing all dependencies
///
/// Passed by reference to every service. Provides access to:
/// - Repositories over the persistent store
/// - The external message transport
/// - Snowflake generator for ID generation
/// - Dispatch configuration
#[derive(Clone)]
pub struct ServiceContext {
    broadcast_repo: Arc<dyn BroadcastRepository>,
    variant_repo: Arc<dyn VariantRepository>,
    button_repo: Arc<dyn ButtonRepository>,
    click_repo: Arc<dyn ClickEventRepository>,
    segment_repo: Arc<dyn SegmentRepository>,
    transport: Arc<dyn MessageTransport>,
    snowflake_generator: Arc<SnowflakeGenerator>,
    dispatch_config: DispatchConfig,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        broadcast_repo: Arc<dyn BroadcastRepository>,
        variant_repo: Arc<dyn VariantRepository>,
        button_repo: Arc<dyn ButtonRepository>,
        click_repo: Arc<dyn ClickEventRepository>,
        segment_repo: Arc<dyn SegmentRepository>,
        transport: Arc<dyn MessageTransport>,
        snowflake_generator: Arc<SnowflakeGenerator>,
        dispatch_config: DispatchConfig,
    ) -> Self {
        Self {
            broadcast_repo,
            variant_repo,
            button_repo,
            click_repo,
            segment_repo,
            transport,
            snowflake_generator,
            dispatch_config,
        }
    }

    // === Repositories ===

    /// Get the broadcast repository
    pub fn broadcast_repo(&self) -> &dyn BroadcastRepository {
        self.broadcast_repo.as_ref()
    }

    /// Get the variant repository
    pub fn variant_repo(&self) -> &dyn VariantRepository {
        self.variant_repo.as_ref()
    }

    /// Get the button repository
    pub fn button_repo(&self) -> &dyn ButtonRepository {
        self.button_repo.as_ref()
    }

    /// Get the click event repository
    pub fn click_repo(&self) -> &dyn ClickEventRepository {
        self.click_repo.as_ref()
    }

    /// Get the segment repository
    pub fn segment_repo(&self) -> &dyn SegmentRepository {
        self.segment_repo.as_ref()
    }

    // === Collaborators ===

    /// Get the message transport
    pub fn transport(&self) -> &dyn MessageTransport {
        self.transport.as_ref()
    }

    /// Get the dispatch configuration
    pub fn dispatch_config(&self) -> &DispatchConfig {
        &self.dispatch_config
    }

    /// Generate a new Snowflake ID
    pub fn generate_id(&self) -> botcast_core::Snowflake {
        self.snowflake_generator.generate()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("transport", &"MessageTransport")
            .field("dispatch_config", &self.dispatch_config)
            .finish()
    }
}

/// Builder for creating ServiceContext
pub struct ServiceContextBuilder {
    broadcast_repo: Option<Arc<dyn BroadcastRepository>>,
    variant_repo: Option<Arc<dyn VariantRepository>>,
    button_repo: Option<Arc<dyn ButtonRepository>>,
    click_repo: Option<Arc<dyn ClickEventRepository>>,
    segment_repo: Option<Arc<dyn SegmentRepository>>,
    transport: Option<Arc<dyn MessageTransport>>,
    snowflake_generator: Option<Arc<SnowflakeGenerator>>,
    dispatch_config: DispatchConfig,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self {
            broadcast_repo: None,
            variant_repo: None,
            button_repo: None,
            click_repo: None,
            segment_repo: None,
            transport: None,
            snowflake_generator: None,
            dispatch_config: DispatchConfig::default(),
        }
    }

    pub fn broadcast_repo(mut self, repo: Arc<dyn BroadcastRepository>) -> Self {
        self.broadcast_repo = Some(repo);
        self
    }

    pub fn variant_repo(mut self, repo: Arc<dyn VariantRepository>) -> Self {
        self.variant_repo = Some(repo);
        self
    }

    pub fn button_repo(mut self, repo: Arc<dyn ButtonRepository>) -> Self {
        self.button_repo = Some(repo);
        self
    }

    pub fn click_repo(mut self, repo: Arc<dyn ClickEventRepository>) -> Self {
        self.click_repo = Some(repo);
        self
    }

    pub fn segment_repo(mut self, repo: Arc<dyn SegmentRepository>) -> Self {
        self.segment_repo = Some(repo);
        self
    }

    pub fn transport(mut self, transport: Arc<dyn MessageTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn snowflake_generator(mut self, generator: Arc<SnowflakeGenerator>) -> Self {
        self.snowflake_generator = Some(generator);
        self
    }

    pub fn dispatch_config(mut self, config: DispatchConfig) -> Self {
        self.dispatch_config = config;
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> super::error::ServiceResult<ServiceContext> {
        use super::error::ServiceError;

        Ok(ServiceContext::new(
            self.broadcast_repo
                .ok_or_else(|| ServiceError::validation("broadcast_repo is required"))?,
            self.variant_repo
                .ok_or_else(|| ServiceError::validation("variant_repo is required"))?,
            self.button_repo
                .ok_or_else(|| ServiceError::validation("button_repo is required"))?,
            self.click_repo
                .ok_or_else(|| ServiceError::validation("click_repo is required"))?,
            self.segment_repo
                .ok_or_else(|| ServiceError::validation("segment_repo is required"))?,
            self.transport
                .ok_or_else(|| ServiceError::validation("transport is required"))?,
            self.snowflake_generator
                .unwrap_or_else(|| Arc::new(SnowflakeGenerator::default())),
            self.dispatch_config,
        ))
    }
}

impl Default for ServiceContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
