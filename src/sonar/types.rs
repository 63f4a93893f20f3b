use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Analysis webhook body. Everything is optional at this level; the
/// extractor decides which absences are fatal.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookPayload {
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub task_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub analysed_at: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub revision: Option<String>,
    #[serde(default)]
    pub project: Option<Project>,
    #[serde(default)]
    pub quality_gate: Option<QualityGate>,
    /// Scanner properties. Values arrive as whatever the CI wrote, so they
    /// stay untyped until a reader asks for a string.
    #[serde(default, deserialize_with = "lenient_map")]
    pub properties: HashMap<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Project {
    #[serde(default, deserialize_with = "lenient_string")]
    pub key: String,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QualityGate {
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: String,
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    #[serde(default, deserialize_with = "lenient_string")]
    pub metric: String,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub operator: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub value: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: String,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub error_threshold: Option<String>,
}

/// Scalars become their JSON text (`2.345`, `true`); null, arrays and
/// objects become `None`.
fn scalar_to_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_to_string(Value::deserialize(deserializer)?).unwrap_or_default())
}

fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_to_string(Value::deserialize(deserializer)?))
}

fn lenient_map<'de, D>(deserializer: D) -> Result<HashMap<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Object(map) => Ok(map.into_iter().collect()),
        _ => Ok(HashMap::new()),
    }
}

/// Subset of `/api/issues/search` used for open-issue counts.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IssueSearchResponse {
    #[serde(default)]
    pub facets: Vec<Facet>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Facet {
    #[serde(default)]
    pub property: Option<String>,
    #[serde(default)]
    pub values: Vec<FacetValue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FacetValue {
    pub val: String,
    pub count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payload_tolerates_missing_optionals() {
        let payload: WebhookPayload = serde_json::from_value(json!({
            "project": {"key": "demo"},
            "qualityGate": {"status": "OK"}
        }))
        .unwrap();

        assert!(payload.properties.is_empty());
        assert!(payload.analysed_at.is_none());
        let gate = payload.quality_gate.unwrap();
        assert!(gate.conditions.is_empty());
        assert_eq!(payload.project.unwrap().url, None);
    }

    #[test]
    fn test_condition_without_value() {
        let condition: Condition = serde_json::from_value(json!({
            "metric": "new_coverage",
            "operator": "LESS_THAN",
            "status": "NO_VALUE",
            "errorThreshold": "80"
        }))
        .unwrap();

        assert_eq!(condition.value, None);
        assert_eq!(condition.error_threshold.as_deref(), Some("80"));
    }

    #[test]
    fn test_scalar_fields_accept_numbers_and_null() {
        let payload: WebhookPayload = serde_json::from_value(json!({
            "analysedAt": null,
            "project": {"key": 17, "url": null},
            "properties": {"sonar.analysis.buildNumber": 42},
            "qualityGate": {
                "status": null,
                "conditions": [
                    {"metric": "new_duplicated_lines_density", "value": 2.345, "status": "OK"},
                    {"metric": "new_coverage", "value": true, "status": 0}
                ]
            }
        }))
        .unwrap();

        assert_eq!(payload.analysed_at, None);
        assert_eq!(payload.properties["sonar.analysis.buildNumber"], json!(42));
        let project = payload.project.unwrap();
        assert_eq!(project.key, "17");
        assert_eq!(project.url, None);

        let gate = payload.quality_gate.unwrap();
        assert_eq!(gate.status, "");
        assert_eq!(gate.conditions[0].value.as_deref(), Some("2.345"));
        assert_eq!(gate.conditions[1].value.as_deref(), Some("true"));
        assert_eq!(gate.conditions[1].status, "0");
    }

    #[test]
    fn test_non_object_properties_are_ignored() {
        let payload: WebhookPayload = serde_json::from_value(json!({
            "properties": ["not", "a", "map"]
        }))
        .unwrap();
        assert!(payload.properties.is_empty());
    }

    #[test]
    fn test_issue_search_response() {
        let response: IssueSearchResponse = serde_json::from_value(json!({
            "total": 7,
            "issues": [],
            "facets": [{
                "property": "types",
                "values": [
                    {"val": "CODE_SMELL", "count": 5},
                    {"val": "BUG", "count": 2}
                ]
            }]
        }))
        .unwrap();

        assert_eq!(response.facets.len(), 1);
        assert_eq!(response.facets[0].values[0].val, "CODE_SMELL");
        assert_eq!(response.facets[0].values[1].count, 2);
    }
}
