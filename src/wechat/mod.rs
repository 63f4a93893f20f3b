//! Chat channel integration

pub mod client;
pub mod types;

pub use client::{DeliveryResult, WeChatClient};
pub use types::Envelope;
