use anyhow::Context;
use serde_json::json;

use crate::auth::hash_secret;
use crate::cli::utils::{output_success, resolve_password};
use crate::cli::OutputFormat;
use crate::config;
use crate::database::MySqlService;

pub async fn create(
    username: String,
    email: String,
    password: Option<String>,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let password = resolve_password(password)?;
    let password_hash = hash_secret(&password)?;
    let service = MySqlService::new(config::config().database.clone());

    service
        .create_user(&username, &email, &password_hash)
        .await
        .with_context(|| format!("creating user '{}'", username))?;

    output_success(
        &output_format,
        &format!("User '{}' created", username),
        Some(json!({ "username": username, "email": email })),
    )
}
