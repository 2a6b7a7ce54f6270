use clap::Subcommand;

use crate::cli::utils::{output_error, output_success, output_value, read_stdin_json, require_session};
use crate::cli::{Context, OutputFormat};
use crate::models::{CreateJob, UpdateJob};

#[derive(Subcommand)]
pub enum JobCommands {
    #[command(about = "List all jobs")]
    List,

    #[command(about = "Get a single job by id")]
    Get {
        #[arg(help = "Job id")]
        id: String,
    },

    #[command(about = "Search jobs and show the matching subset")]
    Search {
        #[arg(help = "Search term (empty shows all)")]
        term: String,
    },

    #[command(about = "Create a job from JSON on stdin")]
    Create,

    #[command(about = "Update a job from JSON on stdin")]
    Update {
        #[arg(help = "Job id")]
        id: String,
    },

    #[command(about = "Delete a job")]
    Delete {
        #[arg(help = "Job id")]
        id: String,
    },
}

pub async fn handle(
    cmd: JobCommands,
    ctx: &Context,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    require_session(ctx).await?;

    match cmd {
        JobCommands::List => output_value(&ctx.store.jobs().entries()),
        JobCommands::Get { id } => match ctx.controller.get_job(&id).await {
            Ok(job) => output_value(&job),
            Err(err) => {
                output_error(&output_format, &err.to_string(), Some(err.error_code()))?;
                std::process::exit(1);
            }
        },
        JobCommands::Search { term } => match ctx.controller.search_jobs(&term).await {
            Ok(()) => {
                let visible: Vec<_> = ctx.store.jobs().visible();
                output_value(&visible)
            }
            Err(err) => {
                output_error(&output_format, &err.to_string(), Some(err.error_code()))?;
                std::process::exit(1);
            }
        },
        JobCommands::Create => {
            let payload: CreateJob = read_stdin_json()?;
            match ctx.controller.create_job(&payload).await {
                Ok(job) => output_success(
                    &output_format,
                    &format!("Job '{}' created as {}", job.name, job.id),
                    Some(serde_json::to_value(&job)?),
                ),
                Err(err) => {
                    output_error(&output_format, &err.to_string(), Some(err.error_code()))?;
                    std::process::exit(1);
                }
            }
        }
        JobCommands::Update { id } => {
            let payload: UpdateJob = read_stdin_json()?;
            match ctx.controller.update_job(&id, &payload).await {
                Ok(()) => output_success(&output_format, &format!("Job {} updated", id), None),
                Err(err) => {
                    output_error(&output_format, &err.to_string(), Some(err.error_code()))?;
                    std::process::exit(1);
                }
            }
        }
        JobCommands::Delete { id } => match ctx.controller.delete_job(&id).await {
            Ok(()) => output_success(&output_format, &format!("Job {} deleted", id), None),
            Err(err) => {
                output_error(&output_format, &err.to_string(), Some(err.error_code()))?;
                std::process::exit(1);
            }
        },
    }
}
