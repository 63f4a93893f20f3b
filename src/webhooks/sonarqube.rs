use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::error::NotifierError;
use crate::webhooks::pipeline::{NotificationPipeline, PipelineOutcome};
use crate::webhooks::signature::{verify_signature, SIGNATURE_HEADER};

/// Analysis-complete webhook. Always answers with the plain status line.
pub async fn handle_webhook(
    State((config, pipeline)): State<(AppConfig, Arc<NotificationPipeline>)>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, String) {
    let request_id = Uuid::new_v4();
    let span = info_span!("sonar_webhook", %request_id);

    async move {
        info!("Received quality webhook ({} bytes)", body.len());

        match process(&config, &pipeline, &headers, &body).await {
            Ok(outcome) => {
                info!(
                    "Notification complete: gate {:?}, reminder sent: {}",
                    outcome.gate_status,
                    outcome.reminder.is_some()
                );
                (StatusCode::OK, StatusCode::OK.to_string())
            }
            Err(e) => {
                let status = e.status_code();
                if let NotifierError::MalformedPayload(_) = e {
                    warn!("{}; payload: {}", e, String::from_utf8_lossy(&body));
                } else {
                    error!("Webhook processing failed: {}", e);
                }
                (status, status.to_string())
            }
        }
    }
    .instrument(span)
    .await
}

async fn process(
    config: &AppConfig,
    pipeline: &NotificationPipeline,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<PipelineOutcome, NotifierError> {
    if let Some(secret) = config.webhook_secret.as_deref().filter(|s| !s.is_empty()) {
        let signature = headers
            .get(SIGNATURE_HEADER)
            .and_then(|v| v.to_str().ok());
        verify_signature(secret, body, signature)?;
    }

    let payload: Value = serde_json::from_slice(body)
        .map_err(|e| NotifierError::MalformedPayload(format!("body is not JSON: {}", e)))?;

    pipeline.run(&payload).await
}
