//! SonarQube Web API client
//!
//! Read-only lookups against the quality service that sent the webhook.

use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::types::IssueSearchResponse;
use crate::error::NotifierError;
use crate::report::HistoricalCounts;

pub struct SonarClient {
    base_url: String,
    token: Option<String>,
    http_client: Client,
}

impl SonarClient {
    pub fn new(
        base_url: String,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, NotifierError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                NotifierError::ConfigError(format!("Failed to build SonarQube HTTP client: {}", e))
            })?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            http_client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Count unresolved issues of the project, bucketed by issue type.
    pub async fn fetch_open_issue_counts(
        &self,
        project_key: &str,
    ) -> Result<HistoricalCounts, NotifierError> {
        let url = format!("{}/api/issues/search", self.base_url);
        debug!("Fetching open issues for {} from {}", project_key, url);

        let mut request = self.http_client.get(&url).query(&[
            ("facets", "types"),
            ("resolved", "false"),
            ("componentKeys", project_key),
        ]);
        if let Some(token) = &self.token {
            request = request.basic_auth(token, None::<&str>);
        }

        let response = request
            .send()
            .await
            .map_err(|e| NotifierError::HistoricalFetchFailed(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            warn!("Issue search for {} returned {}", project_key, status);
            return Err(NotifierError::HistoricalFetchFailed(
                NotifierError::unexpected_status("issue search", status),
            ));
        }

        let body: IssueSearchResponse = response.json().await.map_err(|e| {
            NotifierError::HistoricalFetchFailed(format!("invalid issue search response: {}", e))
        })?;

        let counts = count_by_type(&body);
        info!(
            "Open issues for {}: {} bugs, {} vulnerabilities, {} code smells",
            project_key, counts.bugs, counts.vulnerabilities, counts.code_smells
        );
        Ok(counts)
    }
}

/// Bucket the first facet's values. Unknown types are ignored.
pub fn count_by_type(response: &IssueSearchResponse) -> HistoricalCounts {
    let mut counts = HistoricalCounts::default();

    let Some(facet) = response.facets.first() else {
        return counts;
    };

    for value in &facet.values {
        match value.val.as_str() {
            "BUG" => counts.bugs = value.count,
            "VULNERABILITY" => counts.vulnerabilities = value.count,
            "CODE_SMELL" => counts.code_smells = value.count,
            _ => {}
        }
    }

    counts
}
