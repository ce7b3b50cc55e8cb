use serde::{Deserialize, Serialize};

use super::ClientError;
use super::client::{ApiRequest, SquaredUpClient};

const QUERY_PATH: &str = "/api/query";

/// Which nodes of a data source to look up.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeFilter {
    pub data_source_id: String,
    pub name: Option<String>,
    pub source_id: Option<String>,
    /// Return an empty list instead of `NotFound` once the retry budget is spent.
    pub allow_empty: bool,
}

impl NodeFilter {
    pub fn new(data_source_id: impl Into<String>) -> Self {
        Self {
            data_source_id: data_source_id.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_source_id(mut self, source_id: impl Into<String>) -> Self {
        self.source_id = Some(source_id.into());
        self
    }

    #[must_use]
    pub fn allow_empty(mut self, allow_empty: bool) -> Self {
        self.allow_empty = allow_empty;
        self
    }

    fn name_filter(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.is_empty())
    }

    fn source_id_filter(&self) -> Option<&str> {
        self.source_id.as_deref().filter(|s| !s.is_empty())
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        if self.data_source_id.is_empty() {
            return Err(ClientError::validation(
                "data_source_id is required for a node lookup",
            ));
        }
        if self.name_filter().is_some() && self.source_id_filter().is_some() {
            return Err(ClientError::validation(
                "node_name and node_source_id are mutually exclusive",
            ));
        }
        Ok(())
    }

    /// Gremlin query selecting the filtered vertices with all their properties.
    pub fn gremlin_query(&self) -> String {
        let mut query = format!("g.V().has('__configId', {})", quote(&self.data_source_id));

        if let Some(name) = self.name_filter() {
            query.push_str(&format!(".has('name', {})", quote(name)));
        } else if let Some(source_id) = self.source_id_filter() {
            query.push_str(&format!(".has('sourceId', {})", quote(source_id)));
        }

        query.push_str(".hasNot('__canonicalType').order().valueMap(true)");
        query
    }

    /// Human readable search criteria for error messages.
    pub fn describe(&self) -> String {
        match (self.name_filter(), self.source_id_filter()) {
            (Some(name), _) => format!(
                "name '{}' in data source '{}'",
                name, self.data_source_id
            ),
            (None, Some(source_id)) => format!(
                "source id '{}' in data source '{}'",
                source_id, self.data_source_id
            ),
            (None, None) => format!("data source '{}'", self.data_source_id),
        }
    }
}

fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GremlinQueryRequest {
    pub gremlin_query: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GremlinQueryResponse {
    #[serde(default)]
    pub gremlin_query_results: Vec<Node>,
}

/// One indexed vertex as returned by `valueMap(true)`: scalar id and label,
/// every other property multi-valued.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub name: Vec<String>,
    #[serde(default, rename = "type")]
    pub node_type: Vec<String>,
    #[serde(default, rename = "sourceType")]
    pub source_type: Vec<String>,
    #[serde(default, rename = "sourceName")]
    pub source_name: Vec<String>,
    #[serde(default, rename = "sourceId")]
    pub source_id: Vec<String>,
    #[serde(default, rename = "__name")]
    pub display_name: Vec<String>,
    #[serde(default, rename = "__search")]
    pub search: Vec<String>,
    #[serde(default, rename = "__partitionKey")]
    pub partition_key: Vec<String>,
    #[serde(default, rename = "__tenantId")]
    pub tenant_id: Vec<String>,
    #[serde(default, rename = "__configId")]
    pub config_id: Vec<String>,
}

impl Node {
    pub fn name(&self) -> Option<&str> {
        self.name.first().map(String::as_str)
    }

    pub fn source_id(&self) -> Option<&str> {
        self.source_id.first().map(String::as_str)
    }

    pub fn node_type(&self) -> Option<&str> {
        self.node_type.first().map(String::as_str)
    }
}

impl SquaredUpClient {
    /// Looks up nodes of a data source, retrying while the index catches up.
    ///
    /// Failed requests and empty result sets both consume one attempt from the
    /// client's retry policy. Validation runs before any request is sent.
    pub async fn get_nodes(&self, filter: &NodeFilter) -> Result<Vec<Node>, ClientError> {
        filter.validate()?;

        let request = ApiRequest::post_json(
            QUERY_PATH,
            &GremlinQueryRequest {
                gremlin_query: filter.gremlin_query(),
            },
        )?;

        let policy = self.retry_policy();
        let attempts = policy.attempts();

        for attempt in 1..=attempts {
            let is_last = attempt == attempts;

            match self.do_request(request.clone()).await {
                Err(err) if err.is_retryable() && !is_last => {
                    tracing::warn!(
                        attempt,
                        delay = ?policy.delay,
                        error = %err,
                        "node query failed, retrying"
                    );
                }
                Err(err) => return Err(err),
                Ok(body) => {
                    let response: GremlinQueryResponse = serde_json::from_slice(&body)?;
                    if !response.gremlin_query_results.is_empty() {
                        tracing::info!(
                            attempt,
                            count = response.gremlin_query_results.len(),
                            "nodes found"
                        );
                        return Ok(response.gremlin_query_results);
                    }
                    if is_last {
                        break;
                    }
                    tracing::warn!(
                        attempt,
                        delay = ?policy.delay,
                        criteria = %filter.describe(),
                        "node query returned no results, retrying"
                    );
                }
            }

            self.sleeper().sleep(policy.delay).await;
        }

        if filter.allow_empty {
            tracing::info!(criteria = %filter.describe(), attempts, "no nodes found, empty result allowed");
            return Ok(Vec::new());
        }

        Err(ClientError::NotFound {
            criteria: filter.describe(),
            attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_for_whole_data_source() {
        let filter = NodeFilter::new("config-123");
        assert_eq!(
            filter.gremlin_query(),
            "g.V().has('__configId', 'config-123').hasNot('__canonicalType').order().valueMap(true)"
        );
    }

    #[test]
    fn test_query_with_name() {
        let filter = NodeFilter::new("config-123").with_name("web-01");
        assert_eq!(
            filter.gremlin_query(),
            "g.V().has('__configId', 'config-123').has('name', 'web-01').hasNot('__canonicalType').order().valueMap(true)"
        );
    }

    #[test]
    fn test_query_with_source_id() {
        let filter = NodeFilter::new("config-123").with_source_id("/subscriptions/abc");
        assert_eq!(
            filter.gremlin_query(),
            "g.V().has('__configId', 'config-123').has('sourceId', '/subscriptions/abc').hasNot('__canonicalType').order().valueMap(true)"
        );
    }

    #[test]
    fn test_empty_name_means_whole_data_source() {
        let filter = NodeFilter::new("config-123").with_name("");
        assert!(!filter.gremlin_query().contains(".has('name'"));
        assert!(filter.validate().is_ok());
    }

    #[test]
    fn test_query_escapes_quotes() {
        let filter = NodeFilter::new("config-123").with_name("o'brien");
        assert!(filter.gremlin_query().contains(r"has('name', 'o\'brien')"));
    }

    #[test]
    fn test_name_and_source_id_are_exclusive() {
        let filter = NodeFilter::new("config-123")
            .with_name("web-01")
            .with_source_id("src-1");
        let err = filter.validate().unwrap_err();
        assert!(matches!(err, ClientError::Validation { .. }));
        assert!(err.to_string().contains("mutually exclusive"));
    }

    #[test]
    fn test_data_source_id_required() {
        let err = NodeFilter::default().validate().unwrap_err();
        assert!(matches!(err, ClientError::Validation { .. }));
    }

    #[test]
    fn test_describe_names_criteria() {
        assert_eq!(
            NodeFilter::new("ds").with_name("web").describe(),
            "name 'web' in data source 'ds'"
        );
        assert_eq!(
            NodeFilter::new("ds").with_source_id("s1").describe(),
            "source id 's1' in data source 'ds'"
        );
        assert_eq!(NodeFilter::new("ds").describe(), "data source 'ds'");
    }

    #[test]
    fn test_node_deserialization_from_value_map() {
        let json = r#"{
            "id": "node-1",
            "label": "node",
            "name": ["web-01"],
            "type": ["host"],
            "sourceType": ["azure.vm"],
            "sourceId": ["/subscriptions/abc/vm/web-01"],
            "__name": ["web-01"],
            "__configId": ["config-123"],
            "__someNewField": ["ignored"]
        }"#;

        let node: Node = serde_json::from_str(json).unwrap();
        assert_eq!(node.id, "node-1");
        assert_eq!(node.name(), Some("web-01"));
        assert_eq!(node.node_type(), Some("host"));
        assert_eq!(node.source_id(), Some("/subscriptions/abc/vm/web-01"));
        assert_eq!(node.config_id, vec!["config-123".to_string()]);
        assert!(node.tenant_id.is_empty());
    }

    #[test]
    fn test_query_response_missing_results_is_empty() {
        let response: GremlinQueryResponse = serde_json::from_str("{}").unwrap();
        assert!(response.gremlin_query_results.is_empty());
    }

    #[test]
    fn test_query_request_wire_name() {
        let body = serde_json::to_value(GremlinQueryRequest {
            gremlin_query: "g.V()".to_string(),
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"gremlinQuery": "g.V()"}));
    }
}
