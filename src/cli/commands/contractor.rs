use clap::Subcommand;

use crate::cli::utils::{output_error, output_success, output_value, read_stdin_json, require_session};
use crate::cli::{Context, OutputFormat};
use crate::models::{CreateContractor, UpdateContractor};

#[derive(Subcommand)]
pub enum ContractorCommands {
    #[command(about = "List all contractors")]
    List,

    #[command(about = "Get a single contractor by id")]
    Get {
        #[arg(help = "Contractor id")]
        id: String,
    },

    #[command(about = "Create a contractor from JSON on stdin")]
    Create,

    #[command(about = "Update a contractor from JSON on stdin")]
    Update {
        #[arg(help = "Contractor id")]
        id: String,
    },

    #[command(about = "Delete a contractor")]
    Delete {
        #[arg(help = "Contractor id")]
        id: String,
    },
}

pub async fn handle(
    cmd: ContractorCommands,
    ctx: &Context,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    require_session(ctx).await?;

    match cmd {
        ContractorCommands::List => output_value(&ctx.store.contractors().entries()),
        ContractorCommands::Get { id } => match ctx.controller.get_contractor(&id).await {
            Ok(contractor) => output_value(&contractor),
            Err(err) => {
                output_error(&output_format, &err.to_string(), Some(err.error_code()))?;
                std::process::exit(1);
            }
        },
        ContractorCommands::Create => {
            let payload: CreateContractor = read_stdin_json()?;
            match ctx.controller.create_contractor(&payload).await {
                Ok(contractor) => output_success(
                    &output_format,
                    &format!("Contractor '{}' created as {}", contractor.company, contractor.id),
                    Some(serde_json::to_value(&contractor)?),
                ),
                Err(err) => {
                    output_error(&output_format, &err.to_string(), Some(err.error_code()))?;
                    std::process::exit(1);
                }
            }
        }
        ContractorCommands::Update { id } => {
            let payload: UpdateContractor = read_stdin_json()?;
            match ctx.controller.update_contractor(&id, &payload).await {
                Ok(()) => {
                    output_success(&output_format, &format!("Contractor {} updated", id), None)
                }
                Err(err) => {
                    output_error(&output_format, &err.to_string(), Some(err.error_code()))?;
                    std::process::exit(1);
                }
            }
        }
        ContractorCommands::Delete { id } => match ctx.controller.delete_contractor(&id).await {
            Ok(()) => output_success(&output_format, &format!("Contractor {} deleted", id), None),
            Err(err) => {
                output_error(&output_format, &err.to_string(), Some(err.error_code()))?;
                std::process::exit(1);
            }
        },
    }
}
