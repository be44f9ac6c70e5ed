//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! sd-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `STOREDESK_DATABASE_URL` - `PostgreSQL` connection string
//!   (falls back to `DATABASE_URL`)
//!
//! # Migration Files
//!
//! `crates/server/migrations/`

use secrecy::ExposeSecret;
use sqlx::PgPool;
use thiserror::Error;

use storedesk_server::config::{ConfigError, ServerConfig};

/// Errors that can occur while migrating.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A migration failed to apply.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run the server's database migrations.
///
/// # Errors
///
/// Returns error if no database URL is configured, the connection fails, or
/// a migration fails.
pub async fn run() -> Result<(), MigrationError> {
    let config = ServerConfig::from_env()?;
    let database_url = config
        .database_url
        .ok_or(MigrationError::MissingEnvVar("STOREDESK_DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(database_url.expose_secret()).await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../server/migrations").run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
