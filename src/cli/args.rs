use std::time::Duration;

use clap::{Parser, Subcommand};

use squaredup::api::{DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY};
use squaredup::{NodeFilter, RetryPolicy, ScopeSpec, ScopeType};

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// `us`, `eu`, or an explicit https:// API URL
    #[arg(long, global = true, env = "SQUAREDUP_REGION")]
    pub region: Option<String>,

    #[arg(long, global = true, env = "SQUAREDUP_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check that the API key is accepted in the selected region
    Verify,
    /// Look up indexed nodes of a data source
    Nodes(NodesArgs),
    /// List the latest data source plugins
    DataSources(DataSourcesArgs),
    Scope {
        #[command(subcommand)]
        command: ScopeCommand,
    },
}

#[derive(clap::Args, Debug)]
pub struct NodesArgs {
    #[arg(long)]
    pub data_source_id: String,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub source_id: Option<String>,

    #[arg(long)]
    pub allow_empty: bool,

    #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    pub attempts: u32,

    #[arg(long, default_value_t = DEFAULT_RETRY_DELAY.as_secs())]
    pub delay_secs: u64,
}

impl NodesArgs {
    pub fn filter(&self) -> NodeFilter {
        NodeFilter {
            data_source_id: self.data_source_id.clone(),
            name: self.name.clone(),
            source_id: self.source_id.clone(),
            allow_empty: self.allow_empty,
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.attempts, Duration::from_secs(self.delay_secs))
    }
}

#[derive(clap::Args, Debug)]
pub struct DataSourcesArgs {
    /// Exact display name to filter on
    #[arg(long)]
    pub name: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum ScopeCommand {
    /// Print the scope payload without sending it
    Build(ScopeSpecArgs),
    Create {
        #[arg(long)]
        workspace_id: String,

        #[command(flatten)]
        spec: ScopeSpecArgs,
    },
}

#[derive(clap::Args, Debug)]
pub struct ScopeSpecArgs {
    #[arg(long)]
    pub display_name: String,

    /// fixed, dynamic or advanced
    #[arg(long = "type")]
    pub scope_type: ScopeType,

    #[arg(long = "node-id")]
    pub node_ids: Vec<String>,

    #[arg(long = "data-source-id")]
    pub data_source_ids: Vec<String>,

    #[arg(long = "node-type")]
    pub types: Vec<String>,

    #[arg(long)]
    pub search_query: Option<String>,

    #[arg(long)]
    pub advanced_query: Option<String>,
}

impl ScopeSpecArgs {
    pub fn into_spec(self) -> ScopeSpec {
        ScopeSpec {
            display_name: self.display_name,
            scope_type: self.scope_type,
            node_ids: self.node_ids,
            data_source_ids: self.data_source_ids,
            types: self.types,
            search_query: self.search_query,
            advanced_query: self.advanced_query,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use serial_test::serial;

    #[test]
    fn test_nodes_args_from_flags() {
        let cli = Cli::parse_from([
            "squaredup",
            "nodes",
            "--data-source-id=config-1",
            "--name=web-01",
            "--allow-empty",
            "--attempts=3",
            "--delay-secs=5",
        ]);

        if let Command::Nodes(args) = cli.command {
            let filter = args.filter();
            assert_eq!(filter.data_source_id, "config-1");
            assert_eq!(filter.name, Some("web-01".to_string()));
            assert!(filter.allow_empty);
            assert_eq!(
                args.retry_policy(),
                RetryPolicy::new(3, Duration::from_secs(5))
            );
        } else {
            panic!("Expected Nodes command, got {:?}", cli.command);
        }
    }

    #[test]
    fn test_nodes_args_default_retry_budget() {
        let cli = Cli::parse_from(["squaredup", "nodes", "--data-source-id=config-1"]);

        if let Command::Nodes(args) = cli.command {
            assert_eq!(args.retry_policy(), RetryPolicy::default());
        } else {
            panic!("Expected Nodes command, got {:?}", cli.command);
        }
    }

    #[test]
    fn test_scope_build_args_into_spec() {
        let cli = Cli::parse_from([
            "squaredup",
            "scope",
            "build",
            "--display-name=Prod",
            "--type=dynamic",
            "--search-query=env:prod",
            "--data-source-id=ds-1",
            "--data-source-id=ds-2",
            "--node-type=host",
        ]);

        if let Command::Scope {
            command: ScopeCommand::Build(args),
        } = cli.command
        {
            let spec = args.into_spec();
            assert_eq!(spec.scope_type, ScopeType::Dynamic);
            assert_eq!(spec.data_source_ids, vec!["ds-1", "ds-2"]);
            assert_eq!(spec.types, vec!["host"]);
            assert_eq!(spec.search_query.as_deref(), Some("env:prod"));
        } else {
            panic!("Expected Scope Build command, got {:?}", cli.command);
        }
    }

    #[test]
    fn test_scope_type_rejected_by_parser() {
        let result = Cli::try_parse_from([
            "squaredup",
            "scope",
            "build",
            "--display-name=x",
            "--type=static",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_scope_create_requires_workspace() {
        let result = Cli::try_parse_from([
            "squaredup",
            "scope",
            "create",
            "--display-name=x",
            "--type=fixed",
            "--node-id=n1",
        ]);
        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn test_region_and_key_from_env() {
        let region_backup = std::env::var("SQUAREDUP_REGION").ok();
        let key_backup = std::env::var("SQUAREDUP_API_KEY").ok();

        unsafe {
            std::env::set_var("SQUAREDUP_REGION", "eu");
            std::env::set_var("SQUAREDUP_API_KEY", "env_key");
        }

        let cli = Cli::parse_from(["squaredup", "verify"]);

        unsafe {
            match region_backup {
                Some(region) => std::env::set_var("SQUAREDUP_REGION", region),
                None => std::env::remove_var("SQUAREDUP_REGION"),
            }
            match key_backup {
                Some(key) => std::env::set_var("SQUAREDUP_API_KEY", key),
                None => std::env::remove_var("SQUAREDUP_API_KEY"),
            }
        }

        assert_eq!(cli.region, Some("eu".to_string()));
        assert_eq!(cli.api_key, Some("env_key".to_string()));
    }

    #[test]
    #[serial]
    fn test_cli_flag_takes_precedence_over_env() {
        let key_backup = std::env::var("SQUAREDUP_API_KEY").ok();

        unsafe {
            std::env::set_var("SQUAREDUP_API_KEY", "env_key");
        }

        let cli = Cli::parse_from(["squaredup", "verify", "--api-key=cli_key"]);

        unsafe {
            match key_backup {
                Some(key) => std::env::set_var("SQUAREDUP_API_KEY", key),
                None => std::env::remove_var("SQUAREDUP_API_KEY"),
            }
        }

        assert_eq!(cli.api_key, Some("cli_key".to_string()));
    }

    #[test]
    #[serial]
    fn test_no_flags_or_env_leaves_region_and_key_unset() {
        let region_backup = std::env::var("SQUAREDUP_REGION").ok();
        let key_backup = std::env::var("SQUAREDUP_API_KEY").ok();

        unsafe {
            std::env::remove_var("SQUAREDUP_REGION");
            std::env::remove_var("SQUAREDUP_API_KEY");
        }

        let cli = Cli::parse_from(["squaredup", "verify"]);

        unsafe {
            if let Some(region) = region_backup {
                std::env::set_var("SQUAREDUP_REGION", region);
            }
            if let Some(key) = key_backup {
                std::env::set_var("SQUAREDUP_API_KEY", key);
            }
        }

        assert!(cli.region.is_none());
        assert!(cli.api_key.is_none());
    }
}
