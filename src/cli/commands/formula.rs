use clap::Subcommand;

use crate::cli::utils::{output_error, output_success, output_value, read_stdin_json, require_session};
use crate::cli::{Context, OutputFormat};
use crate::models::{CreateFormula, UpdateFormula};

#[derive(Subcommand)]
pub enum FormulaCommands {
    #[command(about = "List all formulas")]
    List,

    #[command(about = "Get a single formula by id")]
    Get {
        #[arg(help = "Formula id")]
        id: String,
    },

    #[command(about = "Search formulas and show the matching subset")]
    Search {
        #[arg(help = "Search term (empty shows all)")]
        term: String,
    },

    #[command(about = "Create a formula from JSON on stdin")]
    Create,

    #[command(about = "Update a formula from JSON on stdin")]
    Update {
        #[arg(help = "Formula id")]
        id: String,
    },

    #[command(about = "Delete a formula")]
    Delete {
        #[arg(help = "Formula id")]
        id: String,
    },
}

pub async fn handle(
    cmd: FormulaCommands,
    ctx: &Context,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    require_session(ctx).await?;

    match cmd {
        FormulaCommands::List => output_value(&ctx.store.formulas().entries()),
        FormulaCommands::Get { id } => match ctx.controller.get_formula(&id).await {
            Ok(formula) => output_value(&formula),
            Err(err) => {
                output_error(&output_format, &err.to_string(), Some(err.error_code()))?;
                std::process::exit(1);
            }
        },
        FormulaCommands::Search { term } => match ctx.controller.search_formulas(&term).await {
            Ok(()) => {
                let visible: Vec<_> = ctx.store.formulas().visible();
                output_value(&visible)
            }
            Err(err) => {
                output_error(&output_format, &err.to_string(), Some(err.error_code()))?;
                std::process::exit(1);
            }
        },
        FormulaCommands::Create => {
            let payload: CreateFormula = read_stdin_json()?;
            match ctx.controller.create_formula(&payload).await {
                Ok(formula) => output_success(
                    &output_format,
                    &format!("Formula '{}' created as {}", formula.name, formula.id),
                    Some(serde_json::to_value(&formula)?),
                ),
                Err(err) => {
                    output_error(&output_format, &err.to_string(), Some(err.error_code()))?;
                    std::process::exit(1);
                }
            }
        }
        FormulaCommands::Update { id } => {
            let payload: UpdateFormula = read_stdin_json()?;
            match ctx.controller.update_formula(&id, &payload).await {
                Ok(()) => output_success(&output_format, &format!("Formula {} updated", id), None),
                Err(err) => {
                    output_error(&output_format, &err.to_string(), Some(err.error_code()))?;
                    std::process::exit(1);
                }
            }
        }
        FormulaCommands::Delete { id } => match ctx.controller.delete_formula(&id).await {
            Ok(()) => output_success(&output_format, &format!("Formula {} deleted", id), None),
            Err(err) => {
                output_error(&output_format, &err.to_string(), Some(err.error_code()))?;
                std::process::exit(1);
            }
        },
    }
}
