use sea_orm::{Database, DatabaseConnection};
use migration::{Migrator, MigratorTrait};

use crate::config::BootstrapSettings;
use crate::errors::InternalError;

/// Connect to the database named in the bootstrap settings
///
/// Does NOT run migrations - call `migrate_database()` separately.
pub async fn init_database(settings: &BootstrapSettings) -> Result<DatabaseConnection, InternalError> {
    let database_url = settings.database_url();

    let db = Database::connect(database_url)
        .await
        .map_err(|e| InternalError::database("connect_database", e))?;

    tracing::debug!("Connected to database: {}", database_url);

    Ok(db)
}

/// Run all pending migrations
pub async fn migrate_database(db: &DatabaseConnection) -> Result<(), InternalError> {
    Migrator::up(db, None)
        .await
        .map_err(|e| InternalError::database("run_migrations", e))?;

    tracing::debug!("Database migrations completed");

    Ok(())
}
