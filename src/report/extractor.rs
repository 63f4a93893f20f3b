use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

use super::types::{CommitInfo, GateStatus, MetricName, MetricResult, MetricStatus, QualityReport};
use crate::config::PipelineConfig;
use crate::error::NotifierError;
use crate::sonar::types::{QualityGate, WebhookPayload};

const PROP_PROJECT_PATH: &str = "sonar.analysis.CI_PROJECT_PATH";
const PROP_BRANCH_NAME: &str = "sonar.analysis.CI_COMMIT_REF_NAME";
const PROP_USER_NAME: &str = "sonar.analysis.GITLAB_USER_NAME";
const PROP_USER_EMAIL: &str = "sonar.analysis.GITLAB_USER_EMAIL";

pub struct PayloadExtractor;

impl PayloadExtractor {
    /// Turn a raw webhook body into commit metadata and the gate report.
    ///
    /// `project` and `qualityGate` are required; every other absent field
    /// falls back to an empty value.
    pub fn extract(
        payload: &Value,
        config: &PipelineConfig,
    ) -> Result<(CommitInfo, QualityReport), NotifierError> {
        let payload: WebhookPayload = serde_json::from_value(payload.clone())
            .map_err(|e| NotifierError::MalformedPayload(e.to_string()))?;

        let project = payload
            .project
            .as_ref()
            .ok_or_else(|| NotifierError::missing_field("project"))?;
        let quality_gate = payload
            .quality_gate
            .as_ref()
            .ok_or_else(|| NotifierError::missing_field("qualityGate"))?;

        let commit = Self::commit_info(&payload);

        let report = QualityReport {
            project_key: project.key.clone(),
            analysis_timestamp: payload.analysed_at.clone().unwrap_or_default(),
            dashboard_url: project.url.clone().unwrap_or_default(),
            overall_status: GateStatus::parse(&quality_gate.status),
            metrics: Self::metrics(quality_gate, config),
        };

        Ok((commit, report))
    }

    fn commit_info(payload: &WebhookPayload) -> CommitInfo {
        let property = |key: &str| {
            payload
                .properties
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        CommitInfo {
            project_path: property(PROP_PROJECT_PATH),
            branch_name: property(PROP_BRANCH_NAME),
            user_name: property(PROP_USER_NAME),
            user_email: property(PROP_USER_EMAIL),
        }
    }

    fn metrics(gate: &QualityGate, config: &PipelineConfig) -> BTreeMap<MetricName, MetricResult> {
        let mut metrics = BTreeMap::new();

        for condition in &gate.conditions {
            let Some(metric) = MetricName::from_payload_key(&condition.metric) else {
                debug!("Ignoring unrecognized condition metric {}", condition.metric);
                continue;
            };
            if !config.recognizes(metric) {
                continue;
            }

            let mut raw_value = condition.value.clone().unwrap_or_default();
            if metric == MetricName::Duplication && config.format_duplication {
                raw_value = format_duplication(&raw_value);
            }

            metrics.insert(
                metric,
                MetricResult {
                    raw_value,
                    status: MetricStatus::parse(&condition.status),
                },
            );
        }

        metrics
    }
}

/// Keep two decimals and append `%` for long decimal densities
/// (`"2.345"` becomes `"2.34%"`). Shorter values are left alone.
pub fn format_duplication(value: &str) -> String {
    let Some(dot) = value.find('.') else {
        return value.to_string();
    };
    if value.len() <= 4 {
        return value.to_string();
    }

    let end = (dot + 3).min(value.len());
    match value.get(..end) {
        Some(truncated) => format!("{}%", truncated),
        None => value.to_string(),
    }
}
