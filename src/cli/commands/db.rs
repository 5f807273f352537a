use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Context};
use serde_json::json;
use tracing::info;

use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config;
use crate::database::connection::split_statements;
use crate::database::MySqlService;

const BUNDLED_SCHEMA: &str = include_str!("../../../sql/schema.sql");

pub async fn init(yes: bool, file: Option<PathBuf>, output_format: OutputFormat) -> anyhow::Result<()> {
    let script = match &file {
        Some(path) => std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?,
        None => BUNDLED_SCHEMA.to_string(),
    };
    let statements = split_statements(&script);
    if statements.is_empty() {
        bail!("schema script contains no statements");
    }

    let db_config = &config::config().database;
    if !yes && !confirm(&format!(
        "This drops and recreates every table in '{}' on {}:{}. Continue? [y/N] ",
        db_config.database, db_config.host, db_config.port
    ))? {
        bail!("aborted");
    }

    let service = MySqlService::new(db_config.clone());
    let executed = service.run_script(&statements).await.context("initializing the database")?;
    info!(statements = executed, "schema applied");

    output_success(
        &output_format,
        "Database initialized",
        Some(json!({ "database": db_config.database, "statements": executed })),
    )
}

fn confirm(prompt: &str) -> anyhow::Result<bool> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}
