use anyhow::{bail, Context};
use serde_json::{json, Map, Value};

use crate::cli::OutputFormat;

/// Output a success message in the appropriate format
pub fn output_success(output_format: &OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = Map::new();
            response.insert("success".to_string(), json!(true));
            response.insert("message".to_string(), json!(message));

            if let Some(Value::Object(fields)) = data {
                response.extend(fields);
            }

            println!("{}", serde_json::to_string_pretty(&Value::Object(response))?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
            if let Some(Value::Object(fields)) = data {
                for (key, value) in fields {
                    match value {
                        Value::String(s) => println!("  {}: {}", key, s),
                        other => println!("  {}: {}", key, other),
                    }
                }
            }
        }
    }
    Ok(())
}

/// Explicit value, else `ADMIN_PASSWORD`, else an error
pub fn resolve_password(explicit: Option<String>) -> anyhow::Result<String> {
    let password = match explicit {
        Some(p) => p,
        None => std::env::var("ADMIN_PASSWORD").context("no --password given and ADMIN_PASSWORD is not set")?,
    };
    if password.is_empty() {
        bail!("password must not be empty");
    }
    Ok(password)
}
