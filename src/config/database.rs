use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};

use crate::errors::InternalError;

const DEFAULT_DATABASE_URL: &str = "sqlite://rbac.db?mode=rwc";

/// Connect to the database named by `DATABASE_URL`, defaulting to a local
/// SQLite file. Does NOT run migrations - call `migrate_database` separately.
pub async fn connect_database() -> Result<DatabaseConnection, InternalError> {
    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

    let db = Database::connect(&database_url)
        .await
        .map_err(|e| InternalError::database("connect_database", e))?;

    tracing::debug!("Connected to database: {}", database_url);
    Ok(db)
}

/// Run all pending migrations on the provided connection.
pub async fn migrate_database(db: &DatabaseConnection) -> Result<(), InternalError> {
    Migrator::up(db, None)
        .await
        .map_err(|e| InternalError::database("run_migrations", e))?;

    tracing::info!("Database migrations completed");
    Ok(())
}
