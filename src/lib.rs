//! SquaredUp API client
//!
//! A typed client for the SquaredUp dashboarding platform's REST API: workspaces,
//! dashboards, data sources, scopes, alerting channels, scripts, sharing and variables.

pub mod api;
pub mod config;

pub use api::{
    ApiRequest, ClientError, Node, NodeFilter, RetryPolicy, ScopePayload, ScopeSpec, ScopeType,
    Sleeper, SquaredUpClient, build_scope,
};
pub use config::ProviderConfig;
