use serde::{Deserialize, Serialize};

use super::ClientError;
use super::client::{ApiRequest, SquaredUpClient};
use super::workspace_alerts::AlertingRule;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceLinks {
    #[serde(default)]
    pub plugins: Vec<String>,
    #[serde(default)]
    pub workspaces: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceProperties {
    #[serde(default)]
    pub open_access_enabled: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub workspace_type: Option<String>,
    /// Navigation order of dashboards and folders. Entries are dashboard ids or folder objects.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dashboard_id_order: Option<Vec<serde_json::Value>>,
}

/// Create/update body for a workspace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceConfig {
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub links: WorkspaceLinks,
    pub properties: WorkspaceProperties,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alerting_rules: Option<Vec<AlertingRule>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceRead {
    pub id: String,
    #[serde(rename = "type", default)]
    pub workspace_type: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub tenant: String,
    #[serde(default)]
    pub config_id: String,
    #[serde(default)]
    pub data: WorkspaceReadData,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceReadData {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub properties: WorkspaceProperties,
    #[serde(default)]
    pub source_type: String,
    #[serde(default)]
    pub source_name: String,
    #[serde(default)]
    pub links: WorkspaceLinks,
    #[serde(default)]
    pub alerting_rules: Option<Vec<AlertingRule>>,
}

impl WorkspaceRead {
    /// Rebuilds the writable view, e.g. to change one property and PUT it back.
    pub fn to_config(&self) -> WorkspaceConfig {
        WorkspaceConfig {
            display_name: self.display_name.clone(),
            id: Some(self.id.clone()),
            links: self.data.links.clone(),
            properties: self.data.properties.clone(),
            alerting_rules: self.data.alerting_rules.clone(),
        }
    }
}

impl SquaredUpClient {
    pub async fn create_workspace(&self, workspace: &WorkspaceConfig) -> Result<String, ClientError> {
        self.send_for_id(ApiRequest::post_json("/api/workspaces", workspace)?)
            .await
    }

    pub async fn get_workspace(&self, workspace_id: &str) -> Result<WorkspaceRead, ClientError> {
        self.get_json(&format!("/api/workspaces/{workspace_id}")).await
    }

    pub async fn update_workspace(
        &self,
        workspace_id: &str,
        workspace: &WorkspaceConfig,
    ) -> Result<(), ClientError> {
        let path = format!("/api/workspaces/{workspace_id}");
        self.send(ApiRequest::put_json(path, workspace)?).await
    }

    pub async fn delete_workspace(&self, workspace_id: &str) -> Result<(), ClientError> {
        self.send(ApiRequest::delete(format!("/api/workspaces/{workspace_id}")))
            .await
    }

    /// Current navigation order, empty when the workspace has never been ordered.
    pub async fn get_dashboard_order(
        &self,
        workspace_id: &str,
    ) -> Result<Vec<serde_json::Value>, ClientError> {
        let workspace = self.get_workspace(workspace_id).await?;
        Ok(workspace.data.properties.dashboard_id_order.unwrap_or_default())
    }

    /// Replaces the navigation order with a partial PUT touching only `dashboardIdOrder`.
    pub async fn set_dashboard_order(
        &self,
        workspace_id: &str,
        order: &[serde_json::Value],
    ) -> Result<(), ClientError> {
        let body = DashboardOrderPayload {
            properties: DashboardOrderProperties {
                dashboard_id_order: order,
            },
        };
        let path = format!("/api/workspaces/{workspace_id}");
        self.send(ApiRequest::put_json(path, &body)?).await
    }

    pub async fn clear_dashboard_order(&self, workspace_id: &str) -> Result<(), ClientError> {
        self.set_dashboard_order(workspace_id, &[]).await
    }
}

#[derive(Serialize)]
struct DashboardOrderPayload<'a> {
    properties: DashboardOrderProperties<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DashboardOrderProperties<'a> {
    dashboard_id_order: &'a [serde_json::Value],
}
