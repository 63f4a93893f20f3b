//! Report normalization and rendering
//!
//! Pure transforms from a raw analysis event to the chat message bodies.
//! No I/O happens in this module.

pub mod extractor;
pub mod grade;
pub mod render;
pub mod types;

pub use extractor::PayloadExtractor;
pub use render::ReportRenderer;
pub use types::{
    CommitInfo, GateStatus, HistoricalCounts, MessageKind, MetricName, MetricResult,
    MetricStatus, QualityReport, RenderedMessage,
};
