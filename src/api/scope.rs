use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ClientError;
use super::client::{ApiRequest, SquaredUpClient};

pub const SCOPE_VERSION: u32 = 2;
pub const DYNAMIC_SCOPE_LIMIT: u32 = 500;

const BINDING_SUFFIX_LEN: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeType {
    Fixed,
    Dynamic,
    Advanced,
}

impl ScopeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
            Self::Dynamic => "dynamic",
            Self::Advanced => "advanced",
        }
    }

    /// The web UI cannot re-render an advanced scope; callers should warn.
    pub fn renders_in_ui(&self) -> bool {
        !matches!(self, Self::Advanced)
    }
}

impl fmt::Display for ScopeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScopeType {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fixed" => Ok(Self::Fixed),
            "dynamic" => Ok(Self::Dynamic),
            "advanced" => Ok(Self::Advanced),
            other => Err(ClientError::validation(format!(
                "invalid scope type: {other}"
            ))),
        }
    }
}

/// User-facing description of a scope, before it is turned into a graph query.
#[derive(Debug, Clone, PartialEq)]
pub struct ScopeSpec {
    pub display_name: String,
    pub scope_type: ScopeType,
    pub node_ids: Vec<String>,
    pub data_source_ids: Vec<String>,
    pub types: Vec<String>,
    pub search_query: Option<String>,
    pub advanced_query: Option<String>,
}

impl ScopeSpec {
    pub fn new(display_name: impl Into<String>, scope_type: ScopeType) -> Self {
        Self {
            display_name: display_name.into(),
            scope_type,
            node_ids: Vec::new(),
            data_source_ids: Vec::new(),
            types: Vec::new(),
            search_query: None,
            advanced_query: None,
        }
    }

    fn search_query(&self) -> Option<&str> {
        self.search_query.as_deref().filter(|q| !q.is_empty())
    }

    fn advanced_query(&self) -> Option<&str> {
        self.advanced_query.as_deref().filter(|q| !q.is_empty())
    }
}

/// A value injected into the query through a named binding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BindingValue {
    Text(String),
    List(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryDetailValue {
    pub value: String,
}

/// Echo of the inputs behind a scope query, read back by the UI.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryDetail {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boolean_query: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub plugins: Vec<QueryDetailValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<QueryDetailValue>,
}

impl QueryDetail {
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
            && self.boolean_query.is_none()
            && self.plugins.is_empty()
            && self.types.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scope {
    pub name: String,
    pub version: u32,
    pub query: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub bindings: BTreeMap<String, BindingValue>,
    #[serde(default)]
    pub query_detail: QueryDetail,
}

/// Request body for scope create and update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScopePayload {
    pub scope: Scope,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeRead {
    pub id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub workspace_id: String,
    #[serde(default)]
    pub data: ScopeReadData,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeReadData {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub bindings: BTreeMap<String, BindingValue>,
    #[serde(default)]
    pub query_detail: QueryDetail,
}

pub fn build_scope(spec: &ScopeSpec) -> Result<ScopePayload, ClientError> {
    match spec.scope_type {
        ScopeType::Fixed => build_fixed_scope(spec),
        ScopeType::Dynamic => build_dynamic_scope(spec),
        ScopeType::Advanced => build_advanced_scope(spec),
    }
}

/// `g.V().hasId(within(...))` over an explicit node id list.
pub fn build_fixed_scope(spec: &ScopeSpec) -> Result<ScopePayload, ClientError> {
    if spec.node_ids.is_empty() {
        return Err(ClientError::validation(
            "node_ids is required for fixed scope",
        ));
    }

    if !spec.data_source_ids.is_empty()
        || !spec.types.is_empty()
        || spec.search_query().is_some()
        || spec.advanced_query().is_some()
    {
        return Err(ClientError::validation(
            "data_source_id, types, search_query and advanced_query are not allowed for fixed scope",
        ));
    }

    let ids = spec
        .node_ids
        .iter()
        .map(|id| format!("'{}'", id.replace('\\', "\\\\").replace('\'', "\\'")))
        .collect::<Vec<_>>()
        .join(",");

    Ok(ScopePayload {
        scope: Scope {
            name: spec.display_name.clone(),
            version: SCOPE_VERSION,
            query: format!("g.V().hasId(within({ids}))"),
            bindings: BTreeMap::new(),
            query_detail: QueryDetail {
                ids: spec.node_ids.clone(),
                ..QueryDetail::default()
            },
        },
    })
}

/// Full-text search, optionally narrowed by data source and node type.
///
/// User values only ever reach the query through bindings.
pub fn build_dynamic_scope(spec: &ScopeSpec) -> Result<ScopePayload, ClientError> {
    if !spec.node_ids.is_empty() {
        return Err(ClientError::validation(
            "node_ids are not allowed for dynamic scope",
        ));
    }

    if spec.advanced_query().is_some() {
        return Err(ClientError::validation(
            "advanced_query is not allowed for dynamic scope",
        ));
    }

    let Some(search_query) = spec.search_query() else {
        return Err(ClientError::validation(
            "search_query is required for dynamic scope",
        ));
    };

    let mut bindings = BTreeMap::new();
    let mut query_detail = QueryDetail {
        boolean_query: Some(search_query.to_string()),
        ..QueryDetail::default()
    };

    let search_binding = binding_name("booleanQuery");
    bindings.insert(
        search_binding.clone(),
        BindingValue::Text(search_query.to_string()),
    );
    let mut query = format!("g.V().has('__search', __matchesQuery({search_binding}))");

    if !spec.data_source_ids.is_empty() {
        let plugins_binding = binding_name("plugins");
        query.push_str(&format!(
            ".or(__.has('__configId', within({plugins_binding})))"
        ));
        bindings.insert(
            plugins_binding,
            BindingValue::List(spec.data_source_ids.clone()),
        );
        query_detail.plugins = detail_values(&spec.data_source_ids);
    }

    if !spec.types.is_empty() {
        let types_binding = binding_name("types");
        query.push_str(&format!(".has('type', within({types_binding}))"));
        bindings.insert(types_binding, BindingValue::List(spec.types.clone()));
        query_detail.types = detail_values(&spec.types);
    }

    query.push_str(&format!(
        ".order().by('__name').hasNot('__canonicalType').limit({DYNAMIC_SCOPE_LIMIT})"
    ));

    Ok(ScopePayload {
        scope: Scope {
            name: spec.display_name.clone(),
            version: SCOPE_VERSION,
            query,
            bindings,
            query_detail,
        },
    })
}

/// Raw Gremlin passed through untouched.
pub fn build_advanced_scope(spec: &ScopeSpec) -> Result<ScopePayload, ClientError> {
    let Some(advanced_query) = spec.advanced_query() else {
        return Err(ClientError::validation(
            "advanced_query is required for advanced scope",
        ));
    };

    if !spec.node_ids.is_empty()
        || !spec.data_source_ids.is_empty()
        || !spec.types.is_empty()
        || spec.search_query().is_some()
    {
        return Err(ClientError::validation(
            "node_ids, data_source_id, types and search_query are not supported for advanced scope",
        ));
    }

    Ok(ScopePayload {
        scope: Scope {
            name: spec.display_name.clone(),
            version: SCOPE_VERSION,
            query: advanced_query.to_string(),
            bindings: BTreeMap::new(),
            query_detail: QueryDetail::default(),
        },
    })
}

fn binding_name(prefix: &str) -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("{prefix}_{}", &suffix[..BINDING_SUFFIX_LEN])
}

fn detail_values(values: &[String]) -> Vec<QueryDetailValue> {
    values
        .iter()
        .map(|value| QueryDetailValue {
            value: value.clone(),
        })
        .collect()
}

impl SquaredUpClient {
    pub async fn create_scope(
        &self,
        scope: &ScopePayload,
        workspace_id: &str,
    ) -> Result<String, ClientError> {
        let path = format!("/api/workspaces/{workspace_id}/scopes");
        self.send_for_id(ApiRequest::post_json(path, scope)?).await
    }

    pub async fn get_scope(
        &self,
        scope_id: &str,
        workspace_id: &str,
    ) -> Result<ScopeRead, ClientError> {
        self.get_json(&format!("/api/workspaces/{workspace_id}/scopes/{scope_id}"))
            .await
    }

    pub async fn update_scope(
        &self,
        scope_id: &str,
        scope: &ScopePayload,
        workspace_id: &str,
    ) -> Result<(), ClientError> {
        let path = format!("/api/workspaces/{workspace_id}/scopes/{scope_id}");
        self.send(ApiRequest::put_json(path, scope)?).await
    }

    pub async fn delete_scope(&self, scope_id: &str, workspace_id: &str) -> Result<(), ClientError> {
        self.send(ApiRequest::delete(format!(
            "/api/workspaces/{workspace_id}/scopes/{scope_id}"
        )))
        .await
    }
}
