//! Command line surface of `marketplace-publisher`.
//!
//! Each subcommand maps onto one lifecycle operation. The desired state is a
//! JSON manifest (`ModuleDeclaration`); the observed state is kept in a JSON
//! state file (`ModuleState`) between runs.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::path::{Path, PathBuf};

use crate::models::{ModuleDeclaration, ModuleState};
use crate::services::ModuleLifecycle;

/// Publish and reconcile marketplace modules.
#[derive(Parser, Debug)]
#[command(name = "marketplace-publisher", author, version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Publish a new module from a manifest
    Create(CreateArgs),

    /// Read a module by id (also used to import an existing module)
    Read(ReadArgs),

    /// Publish a new version of the module recorded in the state file
    Update(UpdateArgs),

    /// Delete the module recorded in the state file
    Delete(StateArgs),

    /// Show which declared fields differ from the catalog
    Plan(UpdateArgs),
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Module manifest (JSON)
    #[arg(long, short = 'm')]
    pub manifest: PathBuf,

    /// Where to record the resulting state
    #[arg(long, short = 's')]
    pub state: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ReadArgs {
    /// Module id
    #[arg(long)]
    pub id: String,

    /// Account the module belongs to, when not the configured one
    #[arg(long, env = "MARKETPLACE_ACCOUNT")]
    pub account: Option<String>,

    /// Where to record the resulting state
    #[arg(long, short = 's')]
    pub state: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Module manifest (JSON)
    #[arg(long, short = 'm')]
    pub manifest: PathBuf,

    /// State file written by a previous create or read
    #[arg(long, short = 's')]
    pub state: PathBuf,
}

#[derive(Args, Debug)]
pub struct StateArgs {
    /// State file written by a previous create or read
    #[arg(long, short = 's')]
    pub state: PathBuf,
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))
}

async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value)?;
    tokio::fs::write(path, text)
        .await
        .with_context(|| format!("failed to write {}", path.display()))
}

async fn record(state: &ModuleState, path: Option<&Path>) -> Result<Value> {
    if let Some(path) = path {
        write_json(path, state).await?;
    }
    Ok(serde_json::to_value(state)?)
}

/// Execute `command` and return what should be printed.
pub async fn run(command: Commands, lifecycle: &ModuleLifecycle) -> Result<Value> {
    match command {
        Commands::Create(args) => {
            let declaration: ModuleDeclaration = read_json(&args.manifest).await?;
            let state = lifecycle.create(&declaration).await?;
            record(&state, args.state.as_deref()).await
        }
        Commands::Read(args) => {
            let state = lifecycle.read(&args.id, args.account.as_deref()).await?;
            record(&state, args.state.as_deref()).await
        }
        Commands::Update(args) => {
            let declaration: ModuleDeclaration = read_json(&args.manifest).await?;
            let current: ModuleState = read_json(&args.state).await?;

            let version = lifecycle
                .update(&current.id, &declaration, current.version.as_deref())
                .await?;
            tracing::info!(module_id = %current.id, version = %version, "Module updated");

            let state = lifecycle
                .read(&current.id, declaration.account.as_deref())
                .await?;
            record(&state, Some(&args.state)).await
        }
        Commands::Delete(args) => {
            let current: ModuleState = read_json(&args.state).await?;
            lifecycle
                .delete(&current.id, current.account.as_deref())
                .await?;
            tokio::fs::remove_file(&args.state)
                .await
                .with_context(|| format!("failed to remove {}", args.state.display()))?;
            Ok(json!({ "deleted": current.id }))
        }
        Commands::Plan(args) => {
            let declaration: ModuleDeclaration = read_json(&args.manifest).await?;
            let current: ModuleState = read_json(&args.state).await?;
            let changed = lifecycle.plan(&current.id, &declaration).await?;
            Ok(json!({ "id": current.id, "changed": changed }))
        }
    }
}
