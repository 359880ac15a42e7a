mod commands;
mod utils;

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use regflow_cloud_azure::{AuthOptions, DEFAULT_AUTHORITY_HOST, DEFAULT_RESOURCE_MANAGER_ENDPOINT};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "regflow", version)]
#[command(
    about = "Reconcile Azure resource provider registrations against a JSON desired state",
    long_about = None
)]
struct Cli {
    /// Path of the json file containing registration information
    #[arg(short = 'f', long = "file", value_name = "PATH")]
    file: PathBuf,

    /// Apply changes. Without this flag changes are only reported
    #[arg(long)]
    apply_changes: bool,

    /// Azure AD tenant id. Falls back to AZURE_TENANT_ID
    #[arg(long, value_name = "ID")]
    tenant_id: Option<String>,

    /// Azure AD client (application) id. Falls back to AZURE_CLIENT_ID
    #[arg(long, value_name = "ID")]
    client_id: Option<String>,

    /// Azure AD client secret. Falls back to AZURE_CLIENT_SECRET
    #[arg(long, value_name = "SECRET")]
    client_secret: Option<String>,

    /// Use the Azure CLI login instead of service principal credentials
    #[arg(long)]
    use_cli_creds: bool,

    /// Azure AD authority used for service principal logins
    #[arg(
        long,
        env = "AZURE_AUTHORITY_HOST",
        default_value = DEFAULT_AUTHORITY_HOST,
        value_name = "URL"
    )]
    authority_host: String,

    /// Azure Resource Manager endpoint
    #[arg(
        long,
        env = "AZURE_RESOURCE_MANAGER_ENDPOINT",
        default_value = DEFAULT_RESOURCE_MANAGER_ENDPOINT,
        value_name = "URL"
    )]
    resource_manager_endpoint: String,
}

impl Cli {
    fn auth_options(&self) -> AuthOptions {
        AuthOptions {
            use_cli_creds: self.use_cli_creds,
            tenant_id: self.tenant_id.clone(),
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
            authority_host: Some(self.authority_host.clone()),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    utils::init_logging();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // The file is validated before any credential or network work happens.
    let config = regflow_config::load_desired_state(&cli.file)
        .with_context(|| format!("invalid desired-state file {}", cli.file.display()))?;

    let credential = regflow_cloud_azure::authenticate(&cli.auth_options())
        .await
        .context("The following error occurred authenticating with Azure")?;

    commands::sync::handle(
        &config,
        Arc::new(credential),
        &cli.resource_manager_endpoint,
        cli.apply_changes,
    )
    .await?;

    Ok(())
}
