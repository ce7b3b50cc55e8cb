mod cli;
mod error;
mod output;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command, ScopeCommand};
use error::AppError;
use squaredup::{ProviderConfig, SquaredUpClient, build_scope};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let Cli {
        region,
        api_key,
        command,
    } = Cli::parse();

    run(region, api_key, command).await?;
    Ok(())
}

async fn run(
    region: Option<String>,
    api_key: Option<String>,
    command: Command,
) -> Result<(), AppError> {
    match command {
        Command::Verify => {
            let config = ProviderConfig::resolve(region, api_key)?;
            let client = SquaredUpClient::connect(&config).await?;
            tracing::info!(base_url = client.base_url(), "credentials accepted");
            println!("API key accepted by {}", client.base_url());
        }
        Command::Nodes(args) => {
            let config =
                ProviderConfig::resolve(region, api_key)?.with_retry(args.retry_policy());
            let client = SquaredUpClient::from_config(&config)?;
            let nodes = client.get_nodes(&args.filter()).await?;
            tracing::info!(count = nodes.len(), "node lookup complete");
            println!("{}", output::nodes_table(&nodes));
        }
        Command::DataSources(args) => {
            let config = ProviderConfig::resolve(region, api_key)?;
            let client = SquaredUpClient::from_config(&config)?;
            let plugins = client
                .get_latest_data_sources(args.name.as_deref())
                .await?;
            println!("{}", output::plugins_table(&plugins));
        }
        Command::Scope { command } => match command {
            ScopeCommand::Build(args) => {
                let spec = args.into_spec();
                warn_if_hidden(&spec);
                let payload = build_scope(&spec)?;
                println!("{}", serde_json::to_string_pretty(&payload)?);
            }
            ScopeCommand::Create { workspace_id, spec } => {
                let spec = spec.into_spec();
                warn_if_hidden(&spec);
                let payload = build_scope(&spec)?;
                let config = ProviderConfig::resolve(region, api_key)?;
                let client = SquaredUpClient::from_config(&config)?;
                let scope_id = client.create_scope(&payload, &workspace_id).await?;
                tracing::info!(scope_id = %scope_id, workspace_id = %workspace_id, "scope created");
                println!("{scope_id}");
            }
        },
    }

    Ok(())
}

fn warn_if_hidden(spec: &squaredup::ScopeSpec) {
    if !spec.scope_type.renders_in_ui() {
        tracing::warn!(
            scope_type = %spec.scope_type,
            "the SquaredUp UI cannot display or edit scopes of this type"
        );
    }
}
