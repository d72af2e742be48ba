mod case_contacts;
mod cases;
mod contact_logs;
mod contacts;
mod court_dates;
mod evidence;
mod kanban;
mod reports;

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};

use crate::store::db::Db;

#[derive(Debug, Clone)]
pub struct SqliteStore {
    db: Db,
}

impl SqliteStore {
    /// Open (creating if needed) the SQLite database at `database_url`.
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        if let Some(parent) = database_file(database_url).as_ref().and_then(|f| f.parent()) {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.with_context(|| {
                    format!("Failed to create database directory {}", parent.display())
                })?;
            }
        }

        let mut options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("Invalid database URL: {}", database_url))?
            .create_if_missing(true)
            .foreign_keys(true);
        if database_file(database_url).is_some() {
            options = options.journal_mode(SqliteJournalMode::Wal);
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .context("Failed to create SQLite connection pool")?;

        Ok(Self { db: Db::new(pool) })
    }

    /// A private in-memory database. A single connection is kept open for
    /// the lifetime of the pool since every new connection would see an
    /// empty database.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None::<std::time::Duration>)
            .max_lifetime(None::<std::time::Duration>)
            .connect_with(options)
            .await
            .context("Failed to open in-memory SQLite database")?;

        Ok(Self { db: Db::new(pool) })
    }

    /// Apply the embedded schema migrations
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(self.db.pool())
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }

    pub fn db(&self) -> &Db {
        &self.db
    }
}

/// Path of the database file named by a `sqlite:` URL, `None` for in-memory databases.
pub fn database_file(database_url: &str) -> Option<PathBuf> {
    let rest = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))
        .unwrap_or(database_url);
    let path = rest.split('?').next().unwrap_or_default();

    if path.is_empty() || path == ":memory:" || database_url.contains("mode=memory") {
        return None;
    }
    Some(PathBuf::from(path))
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_file() {
        assert_eq!(
            database_file("sqlite://database/casetrack.db"),
            Some(PathBuf::from("database/casetrack.db"))
        );
        assert_eq!(
            database_file("sqlite:data.db?mode=rwc"),
            Some(PathBuf::from("data.db"))
        );
        assert_eq!(database_file("sqlite::memory:"), None);
        assert_eq!(database_file("sqlite://file:shared?mode=memory&cache=shared"), None);
    }

    #[tokio::test]
    async fn test_file_database_is_created_with_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("casetrack.db");
        let url = format!("sqlite://{}", path.display());

        let store = SqliteStore::new(&url, 2).await.unwrap();
        store.migrate().await.unwrap();

        assert!(path.exists());
    }
}
