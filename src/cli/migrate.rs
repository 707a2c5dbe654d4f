use crate::config::{BootstrapSettings, init_database, migrate_database};

/// Connect to the configured database and run all pending migrations
///
/// Does not initialize the full AppData structure, so no secrets are needed.
pub async fn run_migrations(settings: &BootstrapSettings) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Running database migrations...");

    let db = init_database(settings).await?;
    migrate_database(&db).await?;

    tracing::info!("All migrations completed successfully");
    println!("✅ Database migrations completed.");

    Ok(())
}
