pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "portfolio")]
#[command(about = "Portfolio API administration: password hashes, schema setup and API users")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Print a storable bcrypt hash for a password")]
    HashPassword {
        #[arg(long, help = "Password to hash (defaults to ADMIN_PASSWORD)")]
        password: Option<String>,
    },

    #[command(about = "Drop and recreate all tables from sql/schema.sql")]
    InitDb {
        #[arg(long, help = "Skip the confirmation prompt")]
        yes: bool,

        #[arg(long, help = "Run this SQL file instead of the bundled schema")]
        file: Option<std::path::PathBuf>,
    },

    #[command(about = "Create an API user that can request tokens")]
    CreateUser {
        username: String,
        email: String,

        #[arg(long, help = "Password (defaults to ADMIN_PASSWORD)")]
        password: Option<String>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::HashPassword { password } => commands::password::handle(password, output_format),
        Commands::InitDb { yes, file } => commands::db::init(yes, file, output_format).await,
        Commands::CreateUser { username, email, password } => {
            commands::user::create(username, email, password, output_format).await
        }
    }
}
