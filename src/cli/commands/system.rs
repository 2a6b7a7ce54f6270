use clap::Subcommand;

use crate::cli::utils::{output_error, output_value};
use crate::cli::{Context, OutputFormat};

#[derive(Subcommand)]
pub enum SystemCommands {
    #[command(about = "Show backend build and deployment info")]
    Info,
}

pub async fn handle(
    cmd: SystemCommands,
    ctx: &Context,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    match cmd {
        // Unauthenticated on purpose; reachable while logged out.
        SystemCommands::Info => match ctx.controller.get_system_info().await {
            Ok(info) => output_value(&info),
            Err(err) => {
                output_error(&output_format, &err.to_string(), Some(err.error_code()))?;
                std::process::exit(1);
            }
        },
    }
}
