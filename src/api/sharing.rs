use serde::{Deserialize, Serialize};

use super::ClientError;
use super::client::{ApiRequest, SquaredUpClient};

const SHARES_PATH: &str = "/api/openaccess/shares";
const OPEN_ACCESS_BASE: &str = "https://app.squaredup.com/openaccess/";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenAccessProperties {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub require_authentication: bool,
}

/// Public (open access) share of a dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenAccess {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub target_id: String,
    pub workspace_id: String,
    #[serde(default)]
    pub properties: OpenAccessProperties,
}

impl OpenAccess {
    pub fn new(
        dashboard_id: impl Into<String>,
        workspace_id: impl Into<String>,
        enabled: bool,
        require_authentication: bool,
    ) -> Self {
        Self {
            id: None,
            target_id: dashboard_id.into(),
            workspace_id: workspace_id.into(),
            properties: OpenAccessProperties {
                enabled,
                require_authentication,
            },
        }
    }

    pub fn share_link(&self) -> Option<String> {
        self.id.as_deref().and_then(share_link)
    }
}

/// Public URL for a share id of the form `<prefix>-<token>`.
pub fn share_link(share_id: &str) -> Option<String> {
    share_id
        .split('-')
        .nth(1)
        .filter(|token| !token.is_empty())
        .map(|token| format!("{OPEN_ACCESS_BASE}{token}"))
}

impl SquaredUpClient {
    pub async fn create_open_access(&self, share: &OpenAccess) -> Result<OpenAccess, ClientError> {
        self.send_json(ApiRequest::post_json(SHARES_PATH, share)?).await
    }

    pub async fn get_open_access(&self, share_id: &str) -> Result<OpenAccess, ClientError> {
        self.get_json(&format!("{SHARES_PATH}/{share_id}")).await
    }

    pub async fn update_open_access(&self, share_id: &str, share: &OpenAccess) -> Result<(), ClientError> {
        let path = format!("{SHARES_PATH}/{share_id}");
        self.send(ApiRequest::put_json(path, share)?).await
    }

    pub async fn delete_open_access(&self, share_id: &str) -> Result<(), ClientError> {
        self.send(ApiRequest::delete(format!("{SHARES_PATH}/{share_id}")))
            .await
    }
}
