pub mod commands;
pub mod utils;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::api::ApiClient;
use crate::config::{config, AppConfig};
use crate::session::SessionStore;
use crate::store::AppStore;
use crate::sync::SyncController;

#[derive(Parser)]
#[command(name = "tintbook")]
#[command(about = "Tintbook CLI - paint formula and job tracking client")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Authentication and session management")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "Formula operations")]
    Formula {
        #[command(subcommand)]
        cmd: commands::formula::FormulaCommands,
    },

    #[command(about = "Job operations")]
    Job {
        #[command(subcommand)]
        cmd: commands::job::JobCommands,
    },

    #[command(about = "Contractor operations")]
    Contractor {
        #[command(subcommand)]
        cmd: commands::contractor::ContractorCommands,
    },

    #[command(about = "System information")]
    System {
        #[command(subcommand)]
        cmd: commands::system::SystemCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// Everything a command needs: the controller (and through it the store,
/// session, and remote client), wired from the global config.
pub struct Context {
    pub controller: Arc<SyncController>,
    pub store: Arc<AppStore>,
    pub session: Arc<SessionStore>,
}

impl Context {
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let config_dir = match &config.session.config_dir {
            Some(dir) => std::path::PathBuf::from(dir),
            None => SessionStore::default_dir()?,
        };
        let session = Arc::new(
            SessionStore::new(config_dir).with_token_duration(config.session.token_duration_secs),
        );
        let client = Arc::new(ApiClient::new(&config.api, session.clone())?);
        let store = Arc::new(AppStore::new());
        let controller =
            Arc::new(SyncController::new(config, store.clone(), client, session.clone()));
        Ok(Self { controller, store, session })
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let ctx = Context::from_config(config())?;

    match cli.command {
        Commands::Auth { cmd } => commands::auth::handle(cmd, &ctx, output_format).await,
        Commands::Formula { cmd } => commands::formula::handle(cmd, &ctx, output_format).await,
        Commands::Job { cmd } => commands::job::handle(cmd, &ctx, output_format).await,
        Commands::Contractor { cmd } => commands::contractor::handle(cmd, &ctx, output_format).await,
        Commands::System { cmd } => commands::system::handle(cmd, &ctx, output_format).await,
    }
}
