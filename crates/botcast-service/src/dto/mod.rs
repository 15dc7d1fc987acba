//! Data transfer objects for API requests and responses

pub mod requests;
pub mod responses;

pub use requests::{
    CreateBroadcastRequest, CreateButtonRequest, CreateVariantRequest, DeliveryEventRequest,
    DispatchRequest, MediaInput, PreviewRequest,
};
pub use responses::{
    BroadcastResponse, BroadcastStatsResponse, ButtonClickResponse, ButtonResponse,
    DispatchResponse, HealthChecks, HealthResponse, MediaResponse, PreviewResponse,
    ReadinessResponse, StatsTotals, VariantResponse, VariantStatsResponse, WinnerResponse,
};
