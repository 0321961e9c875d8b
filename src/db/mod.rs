use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use std::time::Duration;

use crate::config::DatabaseConfig;
use crate::errors::AppError;

pub mod queries;


const CONNECT_ATTEMPTS: u32 = 5;
const CONNECT_BACKOFF: Duration = Duration::from_secs(1);

/// Initialize the SQLite connection pool with appropriate options.
///
/// The initial connection is attempted up to five times, one second apart.
///
/// # Arguments
///
/// * `config` - Database section of the application config.
///
/// # Returns
/// * `Pool<Sqlite>` - The initialized SQLite connection pool.
pub async fn init_pool(config: &DatabaseConfig) -> Result<Pool<Sqlite>, AppError> {
    let options = SqliteConnectOptions::from_str(&config.url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    let mut attempt = 1;
    loop {
        let result = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options.clone())
            .await;

        match result {
            Ok(pool) => return Ok(pool),
            Err(e) if attempt < CONNECT_ATTEMPTS => {
                tracing::warn!(attempt, error = %e, "Database connection failed, retrying");
                attempt += 1;
                tokio::time::sleep(CONNECT_BACKOFF).await;
            }
            Err(e) => return Err(e.into()),
        }
    }
}

/// Applies the embedded migrations under `./migrations`.
pub async fn migrate(pool: &Pool<Sqlite>) -> Result<(), AppError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
