#![allow(dead_code)]

use quality_notifier::config::{AppConfig, PipelineProfile, ReportOverrides};
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const CHAT_PATH: &str = "/cgi-bin/webhook/send";
pub const ISSUES_PATH: &str = "/api/issues/search";
pub const PROJECT_KEY: &str = "group:demo";

/// Config pointing both outbound integrations at mock servers.
pub fn test_config(sonar: &MockServer, chat: &MockServer) -> AppConfig {
    AppConfig {
        chat_webhook_url: format!("{}{}?key=test-key", chat.uri(), CHAT_PATH),
        sonar_host: sonar.address().to_string(),
        sonar_token: None,
        public_host: None,
        webhook_secret: None,
        server_host: "127.0.0.1".to_string(),
        server_port: 8080,
        http_timeout_secs: 2,
        dry_run: false,
        profile: PipelineProfile::Standard,
        report: ReportOverrides::default(),
    }
}

pub async fn mount_issue_counts(server: &MockServer, bugs: u64, vulnerabilities: u64, code_smells: u64) {
    Mock::given(method("GET"))
        .and(path(ISSUES_PATH))
        .and(query_param("facets", "types"))
        .and(query_param("resolved", "false"))
        .and(query_param("componentKeys", PROJECT_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(issue_search_body(
            bugs,
            vulnerabilities,
            code_smells,
        )))
        .expect(1)
        .mount(server)
        .await;
}

pub async fn mount_chat_ok(server: &MockServer, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"errcode": 0, "errmsg": "ok"})))
        .expect(expected_calls)
        .mount(server)
        .await;
}

/// Bodies of every request the server saw, in arrival order.
pub async fn received_json(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|request| serde_json::from_slice(&request.body).expect("request body is JSON"))
        .collect()
}

pub fn issue_search_body(bugs: u64, vulnerabilities: u64, code_smells: u64) -> Value {
    json!({
        "total": bugs + vulnerabilities + code_smells,
        "p": 1,
        "ps": 100,
        "issues": [],
        "facets": [{
            "property": "types",
            "values": [
                {"val": "CODE_SMELL", "count": code_smells},
                {"val": "BUG", "count": bugs},
                {"val": "VULNERABILITY", "count": vulnerabilities},
                {"val": "SECURITY_HOTSPOT", "count": 0}
            ]
        }]
    })
}

/// Analysis webhook as sent for a GitLab CI scan.
pub fn analysis_payload(gate_status: &str, condition_status: &str) -> Value {
    json!({
        "serverUrl": "http://localhost:9000",
        "taskId": "AVh21JS2JepAEhwQ-b3u",
        "status": "SUCCESS",
        "analysedAt": "2020-10-26T09:44:00+0800",
        "revision": "c739069ec7105e01303e8b3065a81141aad9f129",
        "project": {
            "key": PROJECT_KEY,
            "name": "demo",
            "url": "http://localhost:9000/dashboard?id=group%3Ademo"
        },
        "properties": {
            "sonar.analysis.CI_PROJECT_PATH": "group/demo",
            "sonar.analysis.CI_COMMIT_REF_NAME": "feature/login",
            "sonar.analysis.GITLAB_USER_NAME": "Jane Doe",
            "sonar.analysis.GITLAB_USER_EMAIL": "jane.doe@example.com"
        },
        "qualityGate": {
            "name": "Sonar way",
            "status": gate_status,
            "conditions": [
                {"metric": "new_reliability_rating", "operator": "GREATER_THAN", "value": "1", "status": condition_status, "errorThreshold": "1"},
                {"metric": "new_security_rating", "operator": "GREATER_THAN", "value": "1", "status": condition_status, "errorThreshold": "1"},
                {"metric": "new_maintainability_rating", "operator": "GREATER_THAN", "value": "1", "status": condition_status, "errorThreshold": "1"},
                {"metric": "new_coverage", "operator": "LESS_THAN", "value": "85.0", "status": condition_status, "errorThreshold": "80"},
                {"metric": "new_duplicated_lines_density", "operator": "GREATER_THAN", "value": "2.345", "status": condition_status, "errorThreshold": "3"},
                {"metric": "new_security_hotspots_reviewed", "operator": "LESS_THAN", "status": "NO_VALUE", "errorThreshold": "100"}
            ]
        }
    })
}
