use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Quality dimensions the notifier knows how to report on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricName {
    Reliability,
    Security,
    Maintainability,
    Coverage,
    Duplication,
    HotspotsReviewed,
}

impl MetricName {
    pub const ALL: [MetricName; 6] = [
        MetricName::Reliability,
        MetricName::Security,
        MetricName::Maintainability,
        MetricName::Coverage,
        MetricName::Duplication,
        MetricName::HotspotsReviewed,
    ];

    /// Condition `metric` key as sent in the quality-gate payload.
    pub fn payload_key(&self) -> &'static str {
        match self {
            MetricName::Reliability => "new_reliability_rating",
            MetricName::Security => "new_security_rating",
            MetricName::Maintainability => "new_maintainability_rating",
            MetricName::Coverage => "new_coverage",
            MetricName::Duplication => "new_duplicated_lines_density",
            MetricName::HotspotsReviewed => "new_security_hotspots_reviewed",
        }
    }

    pub fn from_payload_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.payload_key() == key)
    }

    pub fn label(&self) -> &'static str {
        match self {
            MetricName::Reliability => "Reliability (Bugs)",
            MetricName::Security => "Security (Vulnerabilities)",
            MetricName::Maintainability => "Maintainability (Code Smells)",
            MetricName::Coverage => "Coverage",
            MetricName::Duplication => "Duplication",
            MetricName::HotspotsReviewed => "Hotspots Reviewed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MetricStatus {
    Ok,
    Error,
    NoValue,
}

impl MetricStatus {
    pub fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("OK") {
            MetricStatus::Ok
        } else if raw.eq_ignore_ascii_case("NO_VALUE") {
            MetricStatus::NoValue
        } else {
            MetricStatus::Error
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GateStatus {
    Ok,
    Error,
}

impl GateStatus {
    /// Only an exact `OK` passes; any other verdict gets a reminder.
    pub fn parse(raw: &str) -> Self {
        if raw == "OK" {
            GateStatus::Ok
        } else {
            GateStatus::Error
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, GateStatus::Ok)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricResult {
    pub raw_value: String,
    pub status: MetricStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CommitInfo {
    pub project_path: String,
    pub branch_name: String,
    pub user_name: String,
    pub user_email: String,
}

impl CommitInfo {
    /// Email portion before the first `@`, or the whole address when it has none.
    pub fn email_local_part(&self) -> &str {
        match self.user_email.find('@') {
            Some(idx) => &self.user_email[..idx],
            None => &self.user_email,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QualityReport {
    pub project_key: String,
    pub analysis_timestamp: String,
    pub dashboard_url: String,
    pub overall_status: GateStatus,
    pub metrics: BTreeMap<MetricName, MetricResult>,
}

/// Open issues on the project at the time of the notification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricalCounts {
    pub bugs: u64,
    pub vulnerabilities: u64,
    pub code_smells: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MessageKind {
    Markdown,
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedMessage {
    pub kind: MessageKind,
    pub body: String,
    pub mentions: Vec<String>,
}

impl RenderedMessage {
    pub fn new(kind: MessageKind, body: String, mention: &str) -> Self {
        let mentions = if mention.is_empty() {
            Vec::new()
        } else {
            vec![mention.to_string()]
        };

        Self {
            kind,
            body,
            mentions,
        }
    }
}
