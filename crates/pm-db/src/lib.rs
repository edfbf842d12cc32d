//! # pm-db
//!
//! libSQL storage for the project manager issue service.
//!
//! Holds all relational state: issues, sprints, projects and their members,
//! and the shared rate limit log. [`PmDb`] implements the storage-backed
//! capability traits from `pm_core::ports`.
//!
//! Uses the `libsql` crate (C `SQLite` fork, v0.9.29), either as a local file
//! or against a remote Turso database.

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;

use error::DatabaseError;
use libsql::Builder;
use pm_config::DatabaseConfig;
use tracing::info;

pub use repos::rate_limit::SqlRateLimiter;

/// Central database handle.
///
/// Wraps a libSQL database and a single connection shared by every query.
pub struct PmDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl PmDb {
    /// Open a local-only database at the given path. `:memory:` opens a
    /// private in-memory database.
    ///
    /// Runs migrations automatically on first open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        Self::from_database(db).await
    }

    /// Open a remote libSQL database.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the connection or migrations fail.
    pub async fn open_remote(url: &str, auth_token: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_remote(url.to_string(), auth_token.to_string())
            .build()
            .await?;
        Self::from_database(db).await
    }

    /// Open whichever database `config` describes.
    ///
    /// # Errors
    ///
    /// Same as [`Self::open_local`] and [`Self::open_remote`].
    pub async fn open(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        if config.is_remote() {
            info!(url = %config.url, "opening remote database");
            Self::open_remote(&config.url, &config.auth_token).await
        } else {
            info!(path = %config.local_path, "opening local database");
            Self::open_local(&config.local_path).await
        }
    }

    async fn from_database(db: libsql::Database) -> Result<Self, DatabaseError> {
        let conn = db.connect()?;

        // Enable foreign keys (must be per-connection in SQLite)
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let pm_db = Self { db, conn };
        pm_db.run_migrations().await?;
        Ok(pm_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Generate a prefixed ID via libSQL. Returns e.g., `"iss-a3f8b2c1"`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or returns no rows.
    pub async fn generate_id(&self, prefix: &str) -> Result<String, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                &format!("SELECT '{prefix}-' || lower(hex(randomblob(4)))"),
                (),
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<String>(0)?)
    }
}
