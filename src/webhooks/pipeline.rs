//! Notification pipeline
//!
//! extract → open-issue lookup → render → report delivery → reminder
//! delivery (failed gates only). Each run owns its data; the pipeline itself
//! only holds configuration and HTTP client handles, so one instance can
//! serve concurrent requests.

use serde_json::Value;
use std::time::Duration;
use tracing::{error, info};

use crate::config::{AppConfig, PipelineConfig};
use crate::error::NotifierError;
use crate::report::{GateStatus, PayloadExtractor, ReportRenderer};
use crate::sonar::SonarClient;
use crate::wechat::{DeliveryResult, WeChatClient};

pub struct NotificationPipeline {
    config: PipelineConfig,
    renderer: ReportRenderer,
    sonar: SonarClient,
    chat: WeChatClient,
}

#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub gate_status: GateStatus,
    pub report: DeliveryResult,
    pub reminder: Option<DeliveryResult>,
}

impl NotificationPipeline {
    pub fn new(
        config: PipelineConfig,
        link_host: String,
        sonar: SonarClient,
        chat: WeChatClient,
    ) -> Self {
        let renderer = ReportRenderer::new(&config, link_host);
        Self {
            config,
            renderer,
            sonar,
            chat,
        }
    }

    pub fn from_app_config(app: &AppConfig) -> Result<Self, NotifierError> {
        let timeout = Duration::from_secs(app.http_timeout_secs);
        let config = app.pipeline_config();
        let link_host = config.link_host.resolve(&app.sonar_host);

        let sonar = SonarClient::new(app.sonar_base_url(), app.sonar_token.clone(), timeout)?;
        let chat = WeChatClient::new(app.chat_webhook_url.clone(), timeout, app.dry_run)?;

        Ok(Self::new(config, link_host, sonar, chat))
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub async fn run(&self, payload: &Value) -> Result<PipelineOutcome, NotifierError> {
        let (commit, report) = PayloadExtractor::extract(payload, &self.config)?;
        info!(
            "Analysis of {} on {} by {}: gate {:?}, {} metrics",
            commit.project_path,
            commit.branch_name,
            commit.user_name,
            report.overall_status,
            report.metrics.len()
        );

        // A failed lookup aborts the run rather than reporting zero issues.
        let history = if self.config.include_history {
            Some(self.sonar.fetch_open_issue_counts(&report.project_key).await?)
        } else {
            None
        };

        let message = self.renderer.render(&commit, &report, history.as_ref())?;

        let report_delivery = self.chat.dispatch(&message).await;
        match &report_delivery {
            Ok(result) => info!("Report delivered for {} (status {})", report.project_key, result.status),
            Err(e) => error!("Report delivery failed for {}: {}", report.project_key, e),
        }

        let reminder_delivery = if report.overall_status.is_ok() {
            None
        } else {
            let reminder = self.renderer.render_reminder(&commit);
            let delivery = self.chat.dispatch(&reminder).await;
            match &delivery {
                Ok(result) => info!("Reminder delivered to {:?} (status {})", reminder.mentions, result.status),
                Err(e) => error!("Reminder delivery failed for {:?}: {}", reminder.mentions, e),
            }
            Some(delivery)
        };

        let report_result = report_delivery?;
        let reminder_result = reminder_delivery.transpose()?;

        Ok(PipelineOutcome {
            gate_status: report.overall_status,
            report: report_result,
            reminder: reminder_result,
        })
    }
}
