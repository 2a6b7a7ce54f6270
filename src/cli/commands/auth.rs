use std::io::{BufRead, Write};

use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::{output_error, output_success};
use crate::cli::{Context, OutputFormat};

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Login and persist a session token")]
    Login {
        #[arg(help = "Username")]
        username: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Logout and clear the persisted session")]
    Logout,

    #[command(about = "Show current authentication status")]
    Status,
}

pub async fn handle(
    cmd: AuthCommands,
    ctx: &Context,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Login { username, password } => {
            let password = match password {
                Some(password) => password,
                None => prompt_password()?,
            };

            match ctx.controller.login(&username, &password).await {
                Ok(()) => {
                    let store = &ctx.store;
                    output_success(
                        &output_format,
                        &format!("Logged in as '{}'", username),
                        Some(json!({
                            "formulas": store.formulas().len(),
                            "jobs": store.jobs().len(),
                            "contractors": store.contractors().len(),
                        })),
                    )?;
                    Ok(())
                }
                Err(err) => {
                    output_error(&output_format, &err.to_string(), Some(err.error_code()))?;
                    std::process::exit(1);
                }
            }
        }
        AuthCommands::Logout => {
            ctx.controller.logout();
            output_success(&output_format, "Logged out", None)
        }
        AuthCommands::Status => match ctx.session.username() {
            Some(username) => output_success(
                &output_format,
                &format!("Logged in as '{}'", username),
                Some(json!({ "username": username })),
            ),
            None => output_success(&output_format, "Not logged in", None),
        },
    }
}

fn prompt_password() -> anyhow::Result<String> {
    print!("Password: ");
    std::io::stdout().flush()?;
    let mut password = String::new();
    std::io::stdin().lock().read_line(&mut password)?;
    Ok(password.trim_end_matches(['\r', '\n']).to_string())
}
