// CLI module for administrative operations

pub mod create_user;
pub mod migrate;
pub mod sessions;

use clap::{Args, Parser, Subcommand};

use crate::app_data::AppData;

/// Savanna County recruitment accounts service
#[derive(Parser)]
#[command(name = "savanna-recruitment")]
#[command(about = "Savanna County recruitment accounts backend", long_about = None)]
pub struct Cli {
    /// Defaults to `serve`
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Connect, migrate and serve the HTTP API
    Serve,

    /// Run database migrations and exit
    Migrate,

    /// Create an account administratively
    CreateUser(CreateUserArgs),

    /// Delete expired sessions
    PurgeSessions,
}

#[derive(Args, Debug)]
pub struct CreateUserArgs {
    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub first_name: String,

    #[arg(long)]
    pub last_name: String,

    #[arg(long)]
    pub national_id: String,

    #[arg(long)]
    pub phone: String,

    /// Role code, e.g. HR_ADMIN
    #[arg(long)]
    pub role: String,

    #[arg(long)]
    pub department: Option<String>,

    /// Email of the existing user recorded as creator
    #[arg(long)]
    pub created_by: Option<String>,

    /// Initial password
    #[arg(long, env = "NEW_USER_PASSWORD", hide_env_values = true)]
    pub password: String,
}

/// Execute an administrative CLI command
///
/// `Serve` and `Migrate` are handled by `main` before `AppData` exists.
pub async fn execute_command(
    command: Commands,
    app_data: &AppData,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::CreateUser(args) => {
            create_user::create_user(&app_data.account_service, args).await?;
        }
        Commands::PurgeSessions => {
            sessions::purge_sessions(&app_data.auth_service).await?;
        }
        Commands::Serve | Commands::Migrate => {
            tracing::debug!("Command handled before AppData initialization");
        }
    }

    Ok(())
}
