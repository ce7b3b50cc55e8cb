//! SquaredUp REST API client: one module per API area on top of a single request primitive.

mod alerting;
mod client;
mod dashboards;
mod data_sources;
mod data_streams;
mod error;
mod images;
mod nodes;
mod region;
mod retry;
mod scope;
mod scripts;
mod sharing;
mod variables;
mod workspace_alerts;
mod workspaces;

pub use alerting::{AlertingChannel, AlertingChannelType};
pub use client::{ApiRequest, SquaredUpClient, USER_AGENT_VALUE};
pub use dashboards::{Dashboard, DashboardPayload};
pub use data_sources::{
    DataSource, DataSourceConfig, DataSourcePayload, DataSourcePlugin, LatestDataSource,
    PluginDescriptor,
};
pub use data_streams::{DataStream, DataStreamDefinition};
pub use error::ClientError;
pub use images::{DashboardImage, DashboardImageMetadata};
pub use nodes::{GremlinQueryRequest, GremlinQueryResponse, Node, NodeFilter};
pub use region::{DEFAULT_REGION, EU_API_BASE, US_API_BASE, resolve_base_url};
pub use retry::{DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY, RetryPolicy, Sleeper, TokioSleeper};
pub use scope::{
    BindingValue, DYNAMIC_SCOPE_LIMIT, QueryDetail, QueryDetailValue, SCOPE_VERSION, Scope,
    ScopePayload, ScopeRead, ScopeReadData, ScopeSpec, ScopeType, build_advanced_scope,
    build_dynamic_scope, build_fixed_scope, build_scope,
};
pub use scripts::{Script, ScriptConfig, ScriptKind};
pub use sharing::{OpenAccess, OpenAccessProperties, share_link};
pub use variables::{DashboardVariable, DashboardVariableContent, DashboardVariableRead};
pub use workspace_alerts::{
    AlertChannelRef, AlertConditions, AlertDashboard, AlertMonitors, AlertTile, AlertingRule,
    NotifyOn, SelectedMonitor, WorkspaceAlert,
};
pub use workspaces::{
    WorkspaceConfig, WorkspaceLinks, WorkspaceProperties, WorkspaceRead, WorkspaceReadData,
};
