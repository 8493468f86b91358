mod registry_provider;
mod types;

use std::ops::Deref;
use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use url::Url;

pub use types::DContentId;

#[derive(Clone, Debug)]
pub struct Database(SqlitePool);

impl Database {
    pub async fn connect(database_url: &Url) -> Result<Self, DatabaseSetupError> {
        if database_url.scheme() == "sqlite" {
            let pool = connect_sqlite(database_url).await?;
            migrate_sqlite(&pool).await?;
            return Ok(Database::new(pool));
        }

        Err(DatabaseSetupError::UnknownDbType(
            database_url.scheme().to_string(),
        ))
    }

    pub fn new(pool: SqlitePool) -> Self {
        Self(pool)
    }
}

impl Deref for Database {
    type Target = SqlitePool;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

async fn connect_sqlite(url: &Url) -> Result<SqlitePool, DatabaseSetupError> {
    let connection_options = SqliteConnectOptions::from_str(url.as_str())
        .map_err(DatabaseSetupError::Unavailable)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal);

    // In-memory databases exist per connection, a pool of more than one
    // would hand out empty databases for all but the first.
    let max_connections = if url.path() == ":memory:" { 1 } else { 5 };

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(connection_options)
        .await
        .map_err(DatabaseSetupError::Unavailable)?;

    Ok(pool)
}

async fn migrate_sqlite(pool: &SqlitePool) -> Result<(), DatabaseSetupError> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(DatabaseSetupError::MigrationFailed)
}

#[derive(Debug, thiserror::Error)]
pub enum DatabaseSetupError {
    #[error("error occurred while attempting database migration: {0}")]
    MigrationFailed(sqlx::migrate::MigrateError),

    #[error("unable to perform initial connection and check of the database: {0}")]
    Unavailable(sqlx::Error),

    #[error("requested database type was not recognized: {0}")]
    UnknownDbType(String),
}

#[cfg(test)]
impl Database {
    pub(crate) async fn memory() -> Self {
        let url = Url::parse("sqlite::memory:").unwrap();
        Self::connect(&url).await.unwrap()
    }

    pub(crate) async fn client_count(&self) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM clients")
            .fetch_one(self.deref())
            .await
            .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_rejects_unknown_scheme() {
        let url = Url::parse("postgres://localhost/cimd").unwrap();
        let err = Database::connect(&url).await.unwrap_err();
        assert!(matches!(err, DatabaseSetupError::UnknownDbType(scheme) if scheme == "postgres"));
    }

    #[tokio::test]
    async fn test_connect_creates_missing_database_file() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("cimd.db");
        let url = Url::parse(&format!("sqlite://{}", db_path.display())).unwrap();

        let database = Database::connect(&url).await.unwrap();
        assert_eq!(database.client_count().await, 0);
        assert!(db_path.exists());
    }
}
