use clap::Parser;
use marketplace_service::cli::{Cli, run};
use marketplace_service::config::get_configuration;
use marketplace_service::services::ModuleLifecycle;
use service_core::observability::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let configuration = get_configuration().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing("marketplace-publisher", &configuration.telemetry)?;

    let lifecycle = ModuleLifecycle::from_settings(&configuration)?;

    let output = run(cli.command, &lifecycle).await.map_err(|e| {
        tracing::error!(error = %e, "Command failed");
        e
    })?;

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
