pub mod pipeline;
pub mod signature;
pub mod sonarqube;

use axum::{
    response::Json,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
pub use pipeline::{NotificationPipeline, PipelineOutcome};

pub fn router(config: AppConfig, pipeline: Arc<NotificationPipeline>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/webhooks/sonarqube", post(sonarqube::handle_webhook))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .into_inner(),
        )
        .with_state((config, pipeline))
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "quality-notifier",
        "timestamp": chrono::Utc::now()
    }))
}
