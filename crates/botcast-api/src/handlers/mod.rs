//! API request handlers

pub mod analytics;
pub mod broadcasts;
pub mod events;
pub mod health;
pub mod preview;
pub mod variants;
