//! Axum extractors for request handling

mod path;
mod validated;

pub use path::{BroadcastIdPath, VariantIdPath};
pub use validated::ValidatedJson;
