use std::fmt::Write;

use super::grade::{classify_grade, classify_status_color, StyleTag};
use super::types::{
    CommitInfo, GateStatus, HistoricalCounts, MessageKind, MetricName, MetricResult,
    MetricStatus, QualityReport, RenderedMessage,
};
use crate::config::PipelineConfig;
use crate::error::NotifierError;

pub const REMINDER_TEXT: &str = "Quality gate failed, please fix the reported issues promptly.";

const EMPTY_MARKER: &str = "empty";

/// Builds the chat bodies for one pipeline configuration.
#[derive(Debug, Clone)]
pub struct ReportRenderer {
    title: String,
    metrics: Vec<MetricName>,
    link_host: String,
}

impl ReportRenderer {
    pub fn new(config: &PipelineConfig, link_host: String) -> Self {
        Self {
            title: config.report_title.clone(),
            metrics: config.metrics.clone(),
            link_host,
        }
    }

    /// Full report, mentioning the committer by display name. The open
    /// issues section is only written when `history` is present.
    pub fn render(
        &self,
        commit: &CommitInfo,
        report: &QualityReport,
        history: Option<&HistoricalCounts>,
    ) -> Result<RenderedMessage, NotifierError> {
        let mut body = String::new();

        writeln!(body, "### {}", self.title)?;
        writeln!(body, "- Analysis result")?;
        writeln!(body, "> **Project**: {}", commit.project_path)?;
        writeln!(body, "> **Branch**: {}", commit.branch_name)?;
        writeln!(body, "> **Committer**: {} / {}", commit.user_name, commit.user_email)?;
        writeln!(body, "> **Analysed at**: {}", report.analysis_timestamp)?;
        writeln!(body, "> **Quality gate**: {}", gate_cell(report.overall_status))?;

        for metric in &self.metrics {
            writeln!(
                body,
                "> **{}**: {}",
                metric.label(),
                metric_cell(report.metrics.get(metric))
            )?;
        }

        if let Some(history) = history {
            writeln!(body, "- Open issues")?;
            writeln!(body, "> **Bugs**: {}", count_cell(history.bugs))?;
            writeln!(body, "> **Vulnerabilities**: {}", count_cell(history.vulnerabilities))?;
            writeln!(body, "> **Code smells**: {}", count_cell(history.code_smells))?;
        }

        writeln!(body, "---")?;
        write!(
            body,
            "[View full analysis]({})",
            rewrite_link(&report.dashboard_url, &self.link_host)
        )?;

        Ok(RenderedMessage::new(MessageKind::Markdown, body, &commit.user_name))
    }

    /// Plain-text nudge, mentioning the committer by email local part.
    pub fn render_reminder(&self, commit: &CommitInfo) -> RenderedMessage {
        RenderedMessage::new(
            MessageKind::Text,
            REMINDER_TEXT.to_string(),
            commit.email_local_part(),
        )
    }
}

fn gate_cell(status: GateStatus) -> String {
    match status {
        GateStatus::Ok => StyleTag::Pass.wrap("Passed"),
        GateStatus::Error => StyleTag::Fail.wrap("Failed"),
    }
}

fn metric_cell(result: Option<&MetricResult>) -> String {
    let Some(result) = result.filter(|r| r.status != MetricStatus::NoValue) else {
        return StyleTag::Empty.wrap(EMPTY_MARKER);
    };

    classify_status_color(result.status).wrap(&classify_grade(&result.raw_value))
}

fn count_cell(count: u64) -> String {
    if count == 0 {
        count.to_string()
    } else {
        StyleTag::Warning.wrap(&count.to_string())
    }
}

/// The quality service reports its own URL as `localhost`; swap in the host
/// chat readers can reach.
pub fn rewrite_link(url: &str, host: &str) -> String {
    if host.is_empty() {
        return url.to_string();
    }
    url.replace("localhost", host)
}
