use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ClientError;
use super::client::{ApiRequest, SquaredUpClient};

/// Which monitor state changes send a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyOn {
    AllMonitors,
    SelectedMonitors,
    WorkspaceState,
}

impl NotifyOn {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AllMonitors => "all_monitors",
            Self::SelectedMonitors => "selected_monitors",
            Self::WorkspaceState => "workspace_state",
        }
    }
}

impl fmt::Display for NotifyOn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotifyOn {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all_monitors" => Ok(Self::AllMonitors),
            "selected_monitors" => Ok(Self::SelectedMonitors),
            "workspace_state" => Ok(Self::WorkspaceState),
            other => Err(ClientError::validation(format!(
                "notify_on must be all_monitors, selected_monitors or workspace_state, got '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedMonitor {
    pub dashboard_id: String,
    pub tile_ids: Vec<String>,
}

/// One alerting rule as a caller describes it: a channel and what triggers it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceAlert {
    pub channel_id: String,
    pub preview_image: bool,
    pub notify_on: NotifyOn,
    pub selected_monitors: Vec<SelectedMonitor>,
}

impl WorkspaceAlert {
    pub fn new(channel_id: impl Into<String>, notify_on: NotifyOn) -> Self {
        Self {
            channel_id: channel_id.into(),
            preview_image: false,
            notify_on,
            selected_monitors: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_preview_image(mut self, preview_image: bool) -> Self {
        self.preview_image = preview_image;
        self
    }

    #[must_use]
    pub fn with_monitor(mut self, dashboard_id: impl Into<String>, tile_ids: Vec<String>) -> Self {
        self.selected_monitors.push(SelectedMonitor {
            dashboard_id: dashboard_id.into(),
            tile_ids,
        });
        self
    }

    /// Wire form of this alert.
    ///
    /// Workspace state alerts never carry a preview image; the flag is dropped with a warning.
    pub fn to_rule(&self) -> Result<AlertingRule, ClientError> {
        if self.notify_on == NotifyOn::SelectedMonitors && self.selected_monitors.is_empty() {
            return Err(ClientError::validation(
                "selected_monitors is required when notify_on is selected_monitors",
            ));
        }

        let mut include_preview_image = self.preview_image;
        if self.notify_on == NotifyOn::WorkspaceState && self.preview_image {
            tracing::warn!(
                channel_id = %self.channel_id,
                "preview images are not supported with workspace_state alerts, ignoring preview_image"
            );
            include_preview_image = false;
        }

        let dashboards = (self.notify_on == NotifyOn::SelectedMonitors).then(|| {
            self.selected_monitors
                .iter()
                .map(|monitor| {
                    let tiles = monitor
                        .tile_ids
                        .iter()
                        .map(|tile_id| (tile_id.clone(), AlertTile { include: true }))
                        .collect();
                    (monitor.dashboard_id.clone(), AlertDashboard { tiles })
                })
                .collect()
        });

        Ok(AlertingRule {
            channels: vec![AlertChannelRef {
                id: self.channel_id.clone(),
                include_preview_image,
            }],
            conditions: AlertConditions {
                monitors: AlertMonitors {
                    include_all_tiles: self.notify_on == NotifyOn::AllMonitors,
                    rollup_health: self.notify_on == NotifyOn::WorkspaceState,
                    dashboard_rollup_health: false,
                    dashboards,
                },
            },
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertChannelRef {
    pub id: String,
    #[serde(default)]
    pub include_preview_image: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertTile {
    #[serde(default)]
    pub include: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlertDashboard {
    #[serde(default)]
    pub tiles: BTreeMap<String, AlertTile>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertMonitors {
    #[serde(default)]
    pub include_all_tiles: bool,
    #[serde(default)]
    pub rollup_health: bool,
    #[serde(default)]
    pub dashboard_rollup_health: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dashboards: Option<BTreeMap<String, AlertDashboard>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlertConditions {
    #[serde(default)]
    pub monitors: AlertMonitors,
}

/// Alerting rule as stored on the workspace under `alertingRules`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertingRule {
    #[serde(default)]
    pub channels: Vec<AlertChannelRef>,
    #[serde(default)]
    pub conditions: AlertConditions,
}

impl AlertingRule {
    pub fn notify_on(&self) -> NotifyOn {
        let monitors = &self.conditions.monitors;
        if monitors.include_all_tiles {
            NotifyOn::AllMonitors
        } else if monitors.rollup_health {
            NotifyOn::WorkspaceState
        } else {
            NotifyOn::SelectedMonitors
        }
    }

    /// Caller view of a stored rule; `None` for a rule without any channel.
    pub fn to_alert(&self) -> Option<WorkspaceAlert> {
        let channel = self.channels.first()?;

        let selected_monitors = self
            .conditions
            .monitors
            .dashboards
            .iter()
            .flatten()
            .map(|(dashboard_id, dashboard)| SelectedMonitor {
                dashboard_id: dashboard_id.clone(),
                tile_ids: dashboard
                    .tiles
                    .iter()
                    .filter(|(_, tile)| tile.include)
                    .map(|(tile_id, _)| tile_id.clone())
                    .collect(),
            })
            .collect();

        Some(WorkspaceAlert {
            channel_id: channel.id.clone(),
            preview_image: channel.include_preview_image,
            notify_on: self.notify_on(),
            selected_monitors,
        })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AlertingRulesPayload {
    alerting_rules: Vec<AlertingRule>,
}

impl SquaredUpClient {
    pub async fn get_workspace_alerting_rules(
        &self,
        workspace_id: &str,
    ) -> Result<Vec<WorkspaceAlert>, ClientError> {
        let workspace = self.get_workspace(workspace_id).await?;
        Ok(workspace
            .data
            .alerting_rules
            .unwrap_or_default()
            .iter()
            .filter_map(AlertingRule::to_alert)
            .collect())
    }

    /// Replaces every alerting rule of the workspace with a partial PUT touching only `alertingRules`.
    pub async fn set_workspace_alerting_rules(
        &self,
        workspace_id: &str,
        alerts: &[WorkspaceAlert],
    ) -> Result<(), ClientError> {
        let body = AlertingRulesPayload {
            alerting_rules: alerts
                .iter()
                .map(WorkspaceAlert::to_rule)
                .collect::<Result<_, _>>()?,
        };
        let path = format!("/api/workspaces/{workspace_id}");
        self.send(ApiRequest::put_json(path, &body)?).await
    }

    pub async fn clear_workspace_alerting_rules(&self, workspace_id: &str) -> Result<(), ClientError> {
        self.set_workspace_alerting_rules(workspace_id, &[]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notify_on_from_str() {
        assert_eq!(
            "workspace_state".parse::<NotifyOn>().unwrap(),
            NotifyOn::WorkspaceState
        );
        let err = "some_monitors".parse::<NotifyOn>().unwrap_err();
        assert!(matches!(err, ClientError::Validation { .. }));
    }

    #[test]
    fn test_all_monitors_rule() {
        let rule = WorkspaceAlert::new("channel-1", NotifyOn::AllMonitors)
            .with_preview_image(true)
            .to_rule()
            .unwrap();
        let json = serde_json::to_value(&rule).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "channels": [{ "id": "channel-1", "includePreviewImage": true }],
                "conditions": { "monitors": {
                    "includeAllTiles": true,
                    "rollupHealth": false,
                    "dashboardRollupHealth": false
                }}
            })
        );
    }

    #[test]
    fn test_workspace_state_drops_preview_image() {
        let rule = WorkspaceAlert::new("channel-1", NotifyOn::WorkspaceState)
            .with_preview_image(true)
            .to_rule()
            .unwrap();

        assert!(!rule.channels[0].include_preview_image);
        assert!(rule.conditions.monitors.rollup_health);
        assert!(!rule.conditions.monitors.include_all_tiles);
    }

    #[test]
    fn test_selected_monitors_rule() {
        let rule = WorkspaceAlert::new("channel-1", NotifyOn::SelectedMonitors)
            .with_monitor("dash-1", vec!["tile-1".to_string(), "tile-2".to_string()])
            .to_rule()
            .unwrap();
        let json = serde_json::to_value(&rule).unwrap();
        let dashboards = &json["conditions"]["monitors"]["dashboards"];

        assert_eq!(dashboards["dash-1"]["tiles"]["tile-1"]["include"], true);
        assert_eq!(dashboards["dash-1"]["tiles"]["tile-2"]["include"], true);
        assert_eq!(json["conditions"]["monitors"]["includeAllTiles"], false);
    }

    #[test]
    fn test_selected_monitors_requires_monitors() {
        let err = WorkspaceAlert::new("channel-1", NotifyOn::SelectedMonitors)
            .to_rule()
            .unwrap_err();
        assert!(matches!(err, ClientError::Validation { .. }));
    }

    #[test]
    fn test_stored_rule_back_to_alert() {
        let alert = WorkspaceAlert::new("channel-1", NotifyOn::SelectedMonitors)
            .with_monitor("dash-1", vec!["tile-1".to_string()]);
        let mut rule = alert.to_rule().unwrap();
        if let Some(dashboards) = rule.conditions.monitors.dashboards.as_mut() {
            dashboards
                .entry("dash-1".to_string())
                .or_default()
                .tiles
                .insert("tile-off".to_string(), AlertTile { include: false });
        }

        assert_eq!(rule.to_alert(), Some(alert));
    }

    #[test]
    fn test_rule_without_channel_is_skipped() {
        let rule = AlertingRule {
            channels: vec![],
            conditions: AlertConditions::default(),
        };
        assert_eq!(rule.to_alert(), None);
    }

    #[test]
    fn test_empty_payload_clears_rules() {
        let body = serde_json::to_value(AlertingRulesPayload {
            alerting_rules: vec![],
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({ "alertingRules": [] }));
    }
}
