use clap::Parser;
use poem::{Server, listener::TcpListener};

use savanna_recruitment_backend::AppData;
use savanna_recruitment_backend::api::build_routes;
use savanna_recruitment_backend::cli::{self, Cli, Commands};
use savanna_recruitment_backend::config::{
    BootstrapSettings, init_database, init_logging, migrate_database,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    init_logging()?;

    let cli = Cli::parse();
    let settings = BootstrapSettings::from_env()?;
    tracing::debug!("Loaded settings: {:?}", settings);

    let command = cli.command.unwrap_or(Commands::Serve);

    if let Commands::Migrate = command {
        return cli::migrate::run_migrations(&settings).await;
    }

    let db = init_database(&settings).await?;
    migrate_database(&db).await?;

    let app_data = AppData::init(db, settings.session_lifetimes()).await?;

    match command {
        Commands::Serve => serve(&settings, &app_data).await,
        other => cli::execute_command(other, &app_data).await,
    }
}

async fn serve(
    settings: &BootstrapSettings,
    app_data: &AppData,
) -> Result<(), Box<dyn std::error::Error>> {
    let address = settings.server_address();
    let public_url = format!("http://{}", address);
    let app = build_routes(app_data, &public_url);

    tracing::info!("Starting server on {}", public_url);
    tracing::info!("Swagger UI available at {}/swagger", public_url);

    Server::new(TcpListener::bind(address)).run(app).await?;
    Ok(())
}
