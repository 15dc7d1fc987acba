//! # botcast-service
//!
//! Application layer: the campaign engine services and their DTOs.

pub mod dto;
pub mod services;

pub use dto::{
    BroadcastResponse, BroadcastStatsResponse, ButtonClickResponse, ButtonResponse,
    CreateBroadcastRequest, CreateButtonRequest, CreateVariantRequest, DeliveryEventRequest,
    DispatchRequest, DispatchResponse, HealthChecks, HealthResponse, MediaInput, MediaResponse,
    PreviewRequest, PreviewResponse, ReadinessResponse, StatsTotals, VariantResponse,
    VariantStatsResponse, WinnerResponse,
};
pub use services::{
    AnalyticsService, CampaignService, DispatchService, IngestService, SegmentResolution,
    SegmentResolver, ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult,
    WinnerService,
};
