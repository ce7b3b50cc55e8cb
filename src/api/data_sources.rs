use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::ClientError;
use super::client::{ApiRequest, PLUGINS_LATEST_PATH, SquaredUpClient};

const SOURCE_CONFIGS_PATH: &str = "/api/source/configs";

/// Latest published version of a data source plugin.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestDataSource {
    #[serde(rename = "id")]
    pub plugin_id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub last_updated: String,
    #[serde(default)]
    pub lambda_name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub on_prem: bool,
}

/// Plugin identity plus the user's settings, flattened into one `config` object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSourceConfig {
    pub plugin_id: String,
    pub lambda_name: String,
    pub version: String,
    #[serde(flatten)]
    pub settings: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginDescriptor {
    pub plugin_id: String,
    pub name: String,
    pub lambda_name: String,
    pub display_name: String,
    pub version: String,
    pub on_prem: bool,
    pub import_not_supported: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSourcePayload {
    pub display_name: String,
    pub config: DataSourceConfig,
    pub plugin: PluginDescriptor,
    /// Always sent; an empty string detaches the data source from any agent group.
    #[serde(default)]
    pub agent_group_id: String,
}

impl DataSourcePayload {
    /// Combines a plugin with user settings; secure settings land in the same `config` object
    /// and win on key collisions.
    pub fn new(
        display_name: impl Into<String>,
        plugin: &LatestDataSource,
        settings: Map<String, Value>,
        secure_settings: Map<String, Value>,
        agent_group_id: Option<String>,
    ) -> Self {
        let mut merged = settings;
        merged.extend(secure_settings);

        Self {
            display_name: display_name.into(),
            config: DataSourceConfig {
                plugin_id: plugin.plugin_id.clone(),
                lambda_name: plugin.lambda_name.clone(),
                version: plugin.version.clone(),
                settings: merged,
            },
            plugin: PluginDescriptor {
                plugin_id: plugin.plugin_id.clone(),
                name: plugin.display_name.clone(),
                lambda_name: plugin.lambda_name.clone(),
                display_name: plugin.display_name.clone(),
                version: plugin.version.clone(),
                on_prem: plugin.on_prem,
                import_not_supported: false,
            },
            agent_group_id: agent_group_id.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataSourcePlugin {
    #[serde(default)]
    pub name: String,
}

/// A configured data source as stored by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub display_name: String,
    #[serde(default)]
    pub plugin: DataSourcePlugin,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_group_id: Option<String>,
}

impl SquaredUpClient {
    /// Lists the latest plugins, optionally keeping only an exact display name match.
    pub async fn get_latest_data_sources(
        &self,
        display_name: Option<&str>,
    ) -> Result<Vec<LatestDataSource>, ClientError> {
        let plugins: Vec<LatestDataSource> = self.get_json(PLUGINS_LATEST_PATH).await?;

        match display_name.filter(|n| !n.is_empty()) {
            None => Ok(plugins),
            Some(name) => {
                let matching: Vec<_> = plugins
                    .into_iter()
                    .filter(|p| p.display_name == name)
                    .collect();
                if matching.is_empty() {
                    return Err(ClientError::NoMatch {
                        kind: "plugins",
                        name: name.to_string(),
                    });
                }
                Ok(matching)
            }
        }
    }

    /// Resolves `plugin_name` to its latest version and builds the create/update body.
    pub async fn data_source_payload(
        &self,
        display_name: &str,
        plugin_name: &str,
        settings: Map<String, Value>,
        secure_settings: Map<String, Value>,
        agent_group_id: Option<String>,
    ) -> Result<DataSourcePayload, ClientError> {
        let plugins = self.get_latest_data_sources(Some(plugin_name)).await?;
        let plugin = plugins.first().ok_or_else(|| ClientError::NoMatch {
            kind: "plugins",
            name: plugin_name.to_string(),
        })?;

        Ok(DataSourcePayload::new(
            display_name,
            plugin,
            settings,
            secure_settings,
            agent_group_id,
        ))
    }

    pub async fn add_data_source(&self, payload: &DataSourcePayload) -> Result<DataSource, ClientError> {
        self.send_json(ApiRequest::post_json(SOURCE_CONFIGS_PATH, payload)?)
            .await
    }

    pub async fn get_data_source(&self, data_source_id: &str) -> Result<DataSource, ClientError> {
        self.get_json(&format!("{SOURCE_CONFIGS_PATH}/{data_source_id}"))
            .await
    }

    pub async fn update_data_source(
        &self,
        data_source_id: &str,
        payload: &DataSourcePayload,
    ) -> Result<(), ClientError> {
        let path = format!("{SOURCE_CONFIGS_PATH}/{data_source_id}");
        self.send(ApiRequest::put_json(path, payload)?).await
    }

    pub async fn delete_data_source(&self, data_source_id: &str) -> Result<(), ClientError> {
        self.send(ApiRequest::delete(format!(
            "{SOURCE_CONFIGS_PATH}/{data_source_id}"
        )))
        .await
    }
}
