use serde::{Deserialize, Serialize};

use super::ClientError;
use super::client::SquaredUpClient;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataStreamDefinition {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataStream {
    pub id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub data_source_name: String,
    #[serde(default)]
    pub last_updated: String,
    #[serde(default)]
    pub parent_plugin_version: String,
    #[serde(default)]
    pub parent_plugin_id: String,
    #[serde(rename = "type", default)]
    pub stream_type: String,
    #[serde(default)]
    pub definition: DataStreamDefinition,
}

impl SquaredUpClient {
    /// Data streams of a plugin, optionally only those with the given definition name.
    pub async fn get_data_streams(
        &self,
        plugin_id: &str,
        definition_name: Option<&str>,
    ) -> Result<Vec<DataStream>, ClientError> {
        let streams: Vec<DataStream> = self
            .get_json(&format!("/api/config/datastreams/plugin/{plugin_id}"))
            .await?;

        let Some(name) = definition_name.filter(|n| !n.is_empty()) else {
            return Ok(streams);
        };

        let matching: Vec<_> = streams
            .into_iter()
            .filter(|s| s.definition.name == name)
            .collect();

        if matching.is_empty() {
            return Err(ClientError::NoMatch {
                kind: "data streams",
                name: name.to_string(),
            });
        }

        Ok(matching)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_stream_deserialization() {
        let json = r#"{
            "id": "stream-1",
            "displayName": "VM Metrics",
            "type": "config",
            "definition": { "name": "vmMetrics", "extra": 1 }
        }"#;
        let stream: DataStream = serde_json::from_str(json).unwrap();
        assert_eq!(stream.id, "stream-1");
        assert_eq!(stream.stream_type, "config");
        assert_eq!(stream.definition.name, "vmMetrics");
    }
}
