use serde::{Deserialize, Serialize};

use super::ClientError;
use super::client::{ApiRequest, SquaredUpClient};

const CHANNELS_PATH: &str = "/api/alerting/channels";

/// A notification target (Slack, Teams, webhook, ...) for workspace alerts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertingChannel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    pub channel_type_id: String,
    #[serde(default)]
    pub config: serde_json::Value,
    #[serde(default)]
    pub enabled: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertingChannelType {
    pub id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub protocol: String,
}

impl SquaredUpClient {
    pub async fn create_alerting_channel(
        &self,
        channel: &AlertingChannel,
    ) -> Result<AlertingChannel, ClientError> {
        self.send_json(ApiRequest::post_json(CHANNELS_PATH, channel)?)
            .await
    }

    pub async fn get_alerting_channel(&self, channel_id: &str) -> Result<AlertingChannel, ClientError> {
        self.get_json(&format!("{CHANNELS_PATH}/{channel_id}")).await
    }

    pub async fn update_alerting_channel(
        &self,
        channel_id: &str,
        channel: &AlertingChannel,
    ) -> Result<(), ClientError> {
        let path = format!("{CHANNELS_PATH}/{channel_id}");
        self.send(ApiRequest::put_json(path, channel)?).await
    }

    pub async fn delete_alerting_channel(&self, channel_id: &str) -> Result<(), ClientError> {
        self.send(ApiRequest::delete(format!("{CHANNELS_PATH}/{channel_id}")))
            .await
    }

    pub async fn get_alerting_channel_types(
        &self,
        display_name: Option<&str>,
    ) -> Result<Vec<AlertingChannelType>, ClientError> {
        let types: Vec<AlertingChannelType> =
            self.get_json("/api/alerting/channeltypes").await?;

        let Some(name) = display_name.filter(|n| !n.is_empty()) else {
            return Ok(types);
        };

        let matching: Vec<_> = types
            .into_iter()
            .filter(|t| t.display_name == name)
            .collect();

        if matching.is_empty() {
            return Err(ClientError::NoMatch {
                kind: "alerting channel types",
                name: name.to_string(),
            });
        }

        Ok(matching)
    }
}
