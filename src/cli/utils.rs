use std::io::Read;

use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::cli::{Context, OutputFormat};

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let Some(Value::Object(map)) = data {
                response.as_object_mut().expect("object literal").extend(map);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(
    output_format: &OutputFormat,
    message: &str,
    error_code: Option<&str>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": false,
                "error": message
            });

            if let Some(code) = error_code {
                response["error_code"] = json!(code);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

/// Pretty-print a serializable value regardless of output mode.
pub fn output_value<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Read a JSON payload from stdin (create/update commands).
pub fn read_stdin_json<T: DeserializeOwned>() -> anyhow::Result<T> {
    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;
    let value = serde_json::from_str(&input)?;
    Ok(value)
}

/// Bring up a session-backed controller or fail with a login hint.
pub async fn require_session(ctx: &Context) -> anyhow::Result<()> {
    if !ctx.controller.resume().await {
        anyhow::bail!("not logged in; run `tintbook auth login <username>` first");
    }
    Ok(())
}
