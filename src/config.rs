use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use tracing::info;

use crate::error::NotifierError;
use crate::report::MetricName;

const DEFAULT_CONFIG_PATH: &str = "quality-notifier.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub chat_webhook_url: String,
    pub sonar_host: String,
    #[serde(default)]
    pub sonar_token: Option<String>,
    #[serde(default)]
    pub public_host: Option<String>,
    #[serde(default)]
    pub webhook_secret: Option<String>,
    pub server_host: String,
    pub server_port: u16,
    pub http_timeout_secs: u64,
    pub dry_run: bool,
    pub profile: PipelineProfile,
    #[serde(default)]
    pub report: ReportOverrides,
}

/// Which of the two known deployment shapes the pipeline starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineProfile {
    Standard,
    Extended,
}

/// Per-field overrides applied on top of the selected profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportOverrides {
    pub title: Option<String>,
    pub metrics: Option<Vec<MetricName>>,
    pub include_history: Option<bool>,
    pub format_duplication: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkHost {
    /// Host part of `sonar_host`, port stripped.
    DerivedFromSonarHost,
    Public(String),
}

impl LinkHost {
    pub fn resolve(&self, sonar_host: &str) -> String {
        match self {
            LinkHost::Public(host) => host.clone(),
            LinkHost::DerivedFromSonarHost => host_without_port(sonar_host).to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub report_title: String,
    pub metrics: Vec<MetricName>,
    pub include_history: bool,
    pub format_duplication: bool,
    pub link_host: LinkHost,
}

impl PipelineConfig {
    /// Rating metrics plus duplication, with the open-issue section.
    pub fn standard() -> Self {
        Self {
            report_title: "Code Quality Report".to_string(),
            metrics: vec![
                MetricName::Reliability,
                MetricName::Security,
                MetricName::Maintainability,
                MetricName::Duplication,
            ],
            include_history: true,
            format_duplication: true,
            link_host: LinkHost::DerivedFromSonarHost,
        }
    }

    /// Every recognized metric, no open-issue lookup.
    pub fn extended() -> Self {
        Self {
            report_title: "Code Quality Report".to_string(),
            metrics: MetricName::ALL.to_vec(),
            include_history: false,
            format_duplication: false,
            link_host: LinkHost::DerivedFromSonarHost,
        }
    }

    pub fn recognizes(&self, metric: MetricName) -> bool {
        self.metrics.contains(&metric)
    }
}

impl AppConfig {
    /// Load from `QUALITY_NOTIFIER_CONFIG` (or `quality-notifier.toml`) and
    /// `NOTIFIER_*` environment variables.
    pub fn load() -> Result<Self, NotifierError> {
        let path = env::var("QUALITY_NOTIFIER_CONFIG")
            .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(Path::new(&path))
    }

    pub fn load_from(path: &Path) -> Result<Self, NotifierError> {
        info!("Loading configuration from {:?} and environment", path);

        let settings = Config::builder()
            .set_default("chat_webhook_url", "")?
            .set_default("sonar_host", "localhost:9000")?
            .set_default("server_host", "0.0.0.0")?
            .set_default("server_port", 8080_i64)?
            .set_default("http_timeout_secs", 5_i64)?
            .set_default("dry_run", false)?
            .set_default("profile", "standard")?
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix("NOTIFIER").try_parsing(true))
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), NotifierError> {
        if !self.dry_run && self.chat_webhook_url.trim().is_empty() {
            return Err(NotifierError::ConfigError(
                "chat_webhook_url is required unless dry_run is enabled".to_string(),
            ));
        }

        if self.sonar_host.trim().is_empty() {
            return Err(NotifierError::ConfigError(
                "sonar_host cannot be empty".to_string(),
            ));
        }

        if self.server_port == 0 {
            return Err(NotifierError::ConfigError(
                "server_port must be non-zero".to_string(),
            ));
        }

        if self.http_timeout_secs == 0 {
            return Err(NotifierError::ConfigError(
                "http_timeout_secs must be greater than zero".to_string(),
            ));
        }

        if let Some(metrics) = &self.report.metrics {
            if metrics.is_empty() {
                return Err(NotifierError::ConfigError(
                    "report.metrics cannot be an empty list".to_string(),
                ));
            }
        }

        Ok(())
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        let mut pipeline = match self.profile {
            PipelineProfile::Standard => PipelineConfig::standard(),
            PipelineProfile::Extended => PipelineConfig::extended(),
        };

        if let Some(title) = &self.report.title {
            pipeline.report_title = title.clone();
        }
        if let Some(metrics) = &self.report.metrics {
            pipeline.metrics = metrics.clone();
        }
        if let Some(include_history) = self.report.include_history {
            pipeline.include_history = include_history;
        }
        if let Some(format_duplication) = self.report.format_duplication {
            pipeline.format_duplication = format_duplication;
        }
        if let Some(host) = self.public_host.as_deref().filter(|h| !h.trim().is_empty()) {
            pipeline.link_host = LinkHost::Public(host.to_string());
        }

        pipeline
    }

    /// Base URL for quality-service API calls; `http://` is assumed when the
    /// host is configured without a scheme.
    pub fn sonar_base_url(&self) -> String {
        let host = self.sonar_host.trim_end_matches('/');
        if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("http://{}", host)
        }
    }
}

fn host_without_port(host: &str) -> &str {
    let host = host
        .trim_start_matches("http://")
        .trim_start_matches("https://");
    let host = host.split('/').next().unwrap_or(host);
    host.split(':').next().unwrap_or(host)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> AppConfig {
        AppConfig {
            chat_webhook_url: "https://chat.example.com/hook".to_string(),
            sonar_host: "10.1.2.3:9000".to_string(),
            sonar_token: None,
            public_host: None,
            webhook_secret: None,
            server_host: "0.0.0.0".to_string(),
            server_port: 8080,
            http_timeout_secs: 5,
            dry_run: false,
            profile: PipelineProfile::Standard,
            report: ReportOverrides::default(),
        }
    }

    #[test]
    fn test_link_host_derived_strips_port() {
        let link = LinkHost::DerivedFromSonarHost;
        assert_eq!(link.resolve("10.1.2.3:9000"), "10.1.2.3");
        assert_eq!(link.resolve("sonar.internal"), "sonar.internal");
        assert_eq!(link.resolve("http://sonar.internal:9000/"), "sonar.internal");
    }

    #[test]
    fn test_public_host_override() {
        let mut config = base_config();
        config.public_host = Some("sonar.example.com".to_string());

        let pipeline = config.pipeline_config();
        assert_eq!(pipeline.link_host, LinkHost::Public("sonar.example.com".to_string()));
        assert_eq!(pipeline.link_host.resolve(&config.sonar_host), "sonar.example.com");
    }

    #[test]
    fn test_profiles() {
        let standard = PipelineConfig::standard();
        assert!(standard.include_history);
        assert!(standard.format_duplication);
        assert!(!standard.recognizes(MetricName::Coverage));

        let extended = PipelineConfig::extended();
        assert!(!extended.include_history);
        assert_eq!(extended.metrics.len(), MetricName::ALL.len());
    }

    #[test]
    fn test_overrides_apply_on_top_of_profile() {
        let mut config = base_config();
        config.profile = PipelineProfile::Extended;
        config.report.include_history = Some(true);
        config.report.title = Some("Nightly scan".to_string());

        let pipeline = config.pipeline_config();
        assert!(pipeline.include_history);
        assert_eq!(pipeline.report_title, "Nightly scan");
        assert!(pipeline.recognizes(MetricName::HotspotsReviewed));
    }

    #[test]
    fn test_validation() {
        assert!(base_config().validate().is_ok());

        let mut missing_url = base_config();
        missing_url.chat_webhook_url = String::new();
        assert!(missing_url.validate().is_err());

        missing_url.dry_run = true;
        assert!(missing_url.validate().is_ok());

        let mut bad_timeout = base_config();
        bad_timeout.http_timeout_secs = 0;
        assert!(bad_timeout.validate().is_err());

        let mut empty_metrics = base_config();
        empty_metrics.report.metrics = Some(Vec::new());
        assert!(empty_metrics.validate().is_err());
    }

    #[test]
    fn test_sonar_base_url() {
        let mut config = base_config();
        assert_eq!(config.sonar_base_url(), "http://10.1.2.3:9000");

        config.sonar_host = "https://sonar.example.com/".to_string();
        assert_eq!(config.sonar_base_url(), "https://sonar.example.com");
    }
}
