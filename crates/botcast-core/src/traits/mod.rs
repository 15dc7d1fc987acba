//! Ports - traits implemented by the infrastructure layer

mod repositories;
mod transport;

pub use repositories::{
    BroadcastRepository, ButtonClickCount, ButtonRepository, ClickEventRepository, CounterField,
    RepoResult, SegmentRepository, VariantRepository,
};
pub use transport::{DeliveryReceipt, MessageTransport, RenderedMessage, TransportError};
