use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use super::ClientError;
use super::client::{ApiRequest, SquaredUpClient};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardImageMetadata {
    #[serde(default)]
    pub file_name: String,
}

/// Image tile content as a base64 data URI.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardImage {
    #[serde(rename = "dataURL")]
    pub data_url: String,
    #[serde(default)]
    pub metadata: DashboardImageMetadata,
}

fn image_path(workspace_id: &str, dashboard_id: &str, tile_id: &str) -> String {
    format!("/api/workspaces/{workspace_id}/dashboards/{dashboard_id}/images/{tile_id}")
}

impl SquaredUpClient {
    pub async fn get_dashboard_image(
        &self,
        workspace_id: &str,
        dashboard_id: &str,
        tile_id: &str,
    ) -> Result<DashboardImage, ClientError> {
        // NOTE: The timestamp defeats CDN caching of a just-uploaded image
        let uploaded = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        let path = format!(
            "{}?uploaded={uploaded}",
            image_path(workspace_id, dashboard_id, tile_id)
        );
        self.get_json(&path).await
    }

    pub async fn upload_dashboard_image(
        &self,
        workspace_id: &str,
        dashboard_id: &str,
        tile_id: &str,
        image: &DashboardImage,
    ) -> Result<(), ClientError> {
        let path = image_path(workspace_id, dashboard_id, tile_id);
        self.send(ApiRequest::put_json(path, image)?).await
    }

    pub async fn delete_dashboard_image(
        &self,
        workspace_id: &str,
        dashboard_id: &str,
        tile_id: &str,
    ) -> Result<(), ClientError> {
        self.send(ApiRequest::delete(image_path(
            workspace_id,
            dashboard_id,
            tile_id,
        )))
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_wire_names() {
        let image = DashboardImage {
            data_url: "data:image/png;base64,AAAA".to_string(),
            metadata: DashboardImageMetadata {
                file_name: "logo.png".to_string(),
            },
        };
        let json = serde_json::to_value(&image).unwrap();
        assert_eq!(json["dataURL"], "data:image/png;base64,AAAA");
        assert_eq!(json["metadata"]["fileName"], "logo.png");
    }

    #[test]
    fn test_image_path() {
        assert_eq!(
            image_path("space-1", "dash-1", "tile-1"),
            "/api/workspaces/space-1/dashboards/dash-1/images/tile-1"
        );
    }
}
