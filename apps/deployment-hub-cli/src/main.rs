mod config;
mod logging;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use deployment_hub::DeploymentHubModule;
use deployment_hub::infra::StaticDirectory;
use deployment_hub_sdk::{ConfigurationRequest, CreateDeploymentRequest};
use serde::Serialize;

use crate::config::AppConfig;

/// Deployment Hub - deployments across every ML-platform tenant you can reach
#[derive(Parser)]
#[command(name = "deployment-hub")]
#[command(about = "Deployment Hub - deployments across every ML-platform tenant you can reach")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print effective configuration (JSON) and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List deployments across the caller's tenants
    List {
        /// Verified email of the caller
        email: String,
    },
    /// Create a deployment on the caller's own team
    Create {
        /// Verified email of the caller
        email: String,
        /// Existing configuration to deploy
        #[arg(long, conflicts_with = "configuration_file")]
        configuration_id: Option<String>,
        /// JSON file with a configuration to create first
        #[arg(long)]
        configuration_file: Option<PathBuf>,
        /// Deployment time-to-live, e.g. `1h`
        #[arg(long)]
        ttl: Option<String>,
    },
    /// Tenant names the caller may act on
    Tenants {
        /// Verified email of the caller
        email: String,
    },
    /// Load tenant credentials and print the credentialed tenants
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Layered config:
    // 1) defaults -> 2) YAML (if provided) -> 3) env (DEPLOYMENT_HUB__*) -> 4) CLI overrides
    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_verbosity(cli.verbose);

    logging::init(&config.logging)?;

    if cli.print_config {
        print_json(&config)?;
        return Ok(());
    }

    let directory = Arc::new(StaticDirectory::from_config(&config.directory));
    let module = DeploymentHubModule::init(&config.deployment_hub, directory.clone(), directory)?;
    let hub = module.client();

    match cli.command.unwrap_or(Commands::Check) {
        Commands::List { email } => print_json(&hub.list_deployments(&email).await?),
        Commands::Create {
            email,
            configuration_id,
            configuration_file,
            ttl,
        } => {
            let request = CreateDeploymentRequest {
                configuration_id,
                configuration_request: configuration_file
                    .as_deref()
                    .map(read_configuration)
                    .transpose()?,
                ttl,
            };
            print_json(&hub.create_deployment(&email, &request).await?)
        }
        Commands::Tenants { email } => print_json(&hub.accessible_tenants(&email).await?),
        Commands::Check => {
            let tenants = module.preload_credentials().await?;
            tracing::info!(tenants = tenants.len(), "credentials are valid");
            print_json(&tenants)
        }
    }
}

fn read_configuration(path: &Path) -> Result<ConfigurationRequest> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("invalid configuration in {}", path.display()))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
