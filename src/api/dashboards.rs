use serde::{Deserialize, Serialize};

use super::ClientError;
use super::client::{ApiRequest, SquaredUpClient};

/// Create/update body. `content` is the dashboard definition as authored, passed through as JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardPayload {
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeframe: Option<String>,
    pub content: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    #[serde(default)]
    pub workspace_id: String,
    #[serde(default)]
    pub content: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub schema_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeframe: Option<String>,
}

impl SquaredUpClient {
    pub async fn create_dashboard(&self, dashboard: &DashboardPayload) -> Result<Dashboard, ClientError> {
        self.send_json(ApiRequest::post_json("/api/dashboards", dashboard)?)
            .await
    }

    pub async fn get_dashboard(&self, dashboard_id: &str) -> Result<Dashboard, ClientError> {
        self.get_json(&format!("/api/dashboards/{dashboard_id}")).await
    }

    /// `workspace_id` is ignored by the API on update and may be left `None`.
    pub async fn update_dashboard(
        &self,
        dashboard_id: &str,
        dashboard: &DashboardPayload,
    ) -> Result<Dashboard, ClientError> {
        let path = format!("/api/dashboards/{dashboard_id}");
        self.send_json(ApiRequest::put_json(path, dashboard)?).await
    }

    pub async fn delete_dashboard(&self, dashboard_id: &str) -> Result<(), ClientError> {
        self.send(ApiRequest::delete(format!("/api/dashboards/{dashboard_id}")))
            .await
    }
}
