use serde::{Deserialize, Serialize};

use super::ClientError;
use super::client::{ApiRequest, SquaredUpClient};

/// Create/update body for an object variable bound to a scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardVariable {
    pub name: String,
    #[serde(rename = "type")]
    pub variable_type: String,
    pub scope_id: String,
    /// `none` or `all`.
    pub default: String,
    pub allow_multiple_selection: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dashboard_id: Option<String>,
}

impl DashboardVariable {
    pub fn objects(scope_id: impl Into<String>, default: impl Into<String>, allow_multiple: bool) -> Self {
        Self {
            name: "Objects".to_string(),
            variable_type: "object".to_string(),
            scope_id: scope_id.into(),
            default: default.into(),
            allow_multiple_selection: allow_multiple,
            dashboard_id: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardVariableContent {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub variable_type: String,
    #[serde(default)]
    pub scope_id: String,
    #[serde(default)]
    pub default: String,
    #[serde(default)]
    pub allow_multiple_selection: bool,
    #[serde(default)]
    pub dashboard_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardVariableRead {
    pub id: String,
    #[serde(default)]
    pub workspace_id: String,
    #[serde(default)]
    pub content: DashboardVariableContent,
}

impl DashboardVariableRead {
    /// Writable view of the stored variable, keeping its dashboard link.
    pub fn to_variable(&self) -> DashboardVariable {
        DashboardVariable {
            name: self.content.name.clone(),
            variable_type: self.content.variable_type.clone(),
            scope_id: self.content.scope_id.clone(),
            default: self.content.default.clone(),
            allow_multiple_selection: self.content.allow_multiple_selection,
            dashboard_id: self.content.dashboard_id.clone().filter(|id| !id.is_empty()),
        }
    }
}

impl SquaredUpClient {
    pub async fn create_dashboard_variable(
        &self,
        variable: &DashboardVariable,
        workspace_id: &str,
    ) -> Result<DashboardVariableRead, ClientError> {
        let path = format!("/api/workspaces/{workspace_id}/variables");
        self.send_json(ApiRequest::post_json(path, variable)?).await
    }

    pub async fn get_dashboard_variable(
        &self,
        variable_id: &str,
    ) -> Result<DashboardVariableRead, ClientError> {
        self.get_json(&format!("/api/variables/{variable_id}")).await
    }

    pub async fn update_dashboard_variable(
        &self,
        variable_id: &str,
        variable: &DashboardVariable,
    ) -> Result<DashboardVariableRead, ClientError> {
        let path = format!("/api/variables/{variable_id}");
        self.send_json(ApiRequest::put_json(path, variable)?).await
    }

    pub async fn delete_dashboard_variable(&self, variable_id: &str) -> Result<(), ClientError> {
        self.send(ApiRequest::delete(format!("/api/variables/{variable_id}")))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_objects_variable_wire_format() {
        let variable = DashboardVariable::objects("scope-1", "all", true);
        let json = serde_json::to_value(&variable).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "Objects",
                "type": "object",
                "scopeId": "scope-1",
                "default": "all",
                "allowMultipleSelection": true
            })
        );
    }

    #[test]
    fn test_variable_read_keeps_dashboard_link() {
        let json = r#"{
            "id": "var-1",
            "workspaceId": "space-1",
            "content": {
                "name": "Objects",
                "type": "object",
                "scopeId": "scope-1",
                "default": "none",
                "allowMultipleSelection": false,
                "dashboardId": "dash-1"
            }
        }"#;

        let read: DashboardVariableRead = serde_json::from_str(json).unwrap();
        let variable = read.to_variable();
        assert_eq!(variable.scope_id, "scope-1");
        assert_eq!(variable.dashboard_id.as_deref(), Some("dash-1"));
        assert!(!variable.allow_multiple_selection);
    }
}
