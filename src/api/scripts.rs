use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ClientError;
use super::client::{ApiRequest, SquaredUpClient};

const SCRIPTS_PATH: &str = "/api/scripts";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptKind {
    TileDataJs,
    MonitorConditionJs,
}

impl ScriptKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TileDataJs => "tileDataJS",
            Self::MonitorConditionJs => "monitorConditionJS",
        }
    }
}

impl fmt::Display for ScriptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScriptKind {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tileDataJS" => Ok(Self::TileDataJs),
            "monitorConditionJS" => Ok(Self::MonitorConditionJs),
            other => Err(ClientError::validation(format!(
                "invalid script type: {other}; must be one of: tileDataJS, monitorConditionJS"
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScriptConfig {
    pub src: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Script {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub display_name: String,
    /// `scripts.<kind>` on the wire.
    pub sub_type: String,
    pub config: ScriptConfig,
}

impl Script {
    pub fn new(display_name: impl Into<String>, kind: ScriptKind, src: impl Into<String>) -> Self {
        Self {
            id: None,
            display_name: display_name.into(),
            sub_type: format!("scripts.{kind}"),
            config: ScriptConfig { src: src.into() },
        }
    }

    pub fn kind(&self) -> Result<ScriptKind, ClientError> {
        let raw = self
            .sub_type
            .split_once('.')
            .map(|(_, kind)| kind)
            .unwrap_or(&self.sub_type);
        raw.parse()
    }
}

impl SquaredUpClient {
    pub async fn create_script(&self, script: &Script) -> Result<Script, ClientError> {
        self.send_json(ApiRequest::post_json(SCRIPTS_PATH, script)?)
            .await
    }

    pub async fn get_script(&self, script_id: &str) -> Result<Script, ClientError> {
        self.get_json(&format!("{SCRIPTS_PATH}/{script_id}")).await
    }

    pub async fn update_script(&self, script_id: &str, script: &Script) -> Result<(), ClientError> {
        let path = format!("{SCRIPTS_PATH}/{script_id}");
        self.send(ApiRequest::put_json(path, script)?).await
    }

    pub async fn delete_script(&self, script_id: &str) -> Result<(), ClientError> {
        self.send(ApiRequest::delete(format!("{SCRIPTS_PATH}/{script_id}")))
            .await
    }
}
