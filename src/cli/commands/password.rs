use serde_json::json;

use crate::auth::hash_secret;
use crate::cli::utils::{output_success, resolve_password};
use crate::cli::OutputFormat;

pub fn handle(password: Option<String>, output_format: OutputFormat) -> anyhow::Result<()> {
    let password = resolve_password(password)?;
    let hash = hash_secret(&password)?;
    output_success(&output_format, "Password hashed", Some(json!({ "hash": hash })))
}
