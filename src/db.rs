use backoff::future::retry_notify;
use backoff::{Error as BackoffError, ExponentialBackoff};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use tracing::{info, warn};

use crate::config::{Config, DbType};

fn connect_options(config: &Config) -> ConnectOptions {
    let mut options = ConnectOptions::new(config.database_url.clone());
    options.sqlx_logging(false);
    // Each in-memory SQLite connection is its own database
    if config.database_url.contains(":memory:") {
        options.max_connections(1).min_connections(1);
    }
    options
}

/// Connects with exponential backoff, then applies pending migrations.
pub async fn connect(config: &Config) -> Result<DatabaseConnection, DbErr> {
    info!(
        "Connecting to database: {}",
        match config.db_type {
            DbType::Postgres => "PostgreSQL",
            DbType::Sqlite => "SQLite",
        }
    );

    let backoff = ExponentialBackoff {
        max_elapsed_time: Some(config.db_connect_max_elapsed),
        ..ExponentialBackoff::default()
    };

    let db = retry_notify(
        backoff,
        || async {
            Database::connect(connect_options(config))
                .await
                .map_err(|e| match e {
                    DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => BackoffError::transient(e),
                    other => BackoffError::permanent(other),
                })
        },
        |err: DbErr, wait: std::time::Duration| {
            warn!("Database connection failed: {}. Retrying in {:.1}s...", err, wait.as_secs_f32());
        },
    )
    .await?;

    Migrator::up(&db, None).await?;
    info!("Database migrations applied");
    Ok(db)
}
