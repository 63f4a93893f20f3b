//! SonarQube integration
//!
//! Wire types for the analysis webhook and the issue search API, plus the
//! client used to look up open issues.

pub mod client;
pub mod types;

pub use client::SonarClient;
pub use types::WebhookPayload;
