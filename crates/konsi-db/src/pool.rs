//! # Database Pool Management
//!
//! Connection pool creation and configuration for SQLite.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Database Connection Pool                           │
//! │                                                                         │
//! │  App Startup                                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbConfig::new(path) ← Configure pool settings                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new(config).await ← Create pool + run migrations            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │            SqlitePool                    │                           │
//! │  │  ┌─────┐ ┌─────┐ ┌─────┐ ┌─────┐       │                           │
//! │  │  │Conn1│ │Conn2│ │Conn3│ │Conn4│ ...   │  (max_connections)        │
//! │  │  └─────┘ └─────┘ └─────┘ └─────┘       │                           │
//! │  └─────────────────────────────────────────┘                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  db.products() / db.partners() / db.records() ← plain repositories    │
//! │  db.ledger(settings)                          ← transactional ops     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## WAL Mode
//! SQLite WAL (Write-Ahead Logging) mode is enabled for:
//! - Better concurrent read performance
//! - Readers don't block writers
//! - Better crash recovery

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

use konsi_core::Settings;

use crate::error::{StoreError, StoreResult};
use crate::ledger::Ledger;
use crate::migrations;
use crate::repository::partner::PartnerRepository;
use crate::repository::product::ProductRepository;
use crate::repository::records::RecordsRepository;

// =============================================================================
// Configuration
// =============================================================================

/// Database configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::new("/path/to/konsi.db")
///     .max_connections(5)
///     .min_connections(1);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path to the SQLite database file. Ignored when `in_memory` is set.
    pub database_path: PathBuf,

    /// Use a private in-memory database (for testing).
    pub in_memory: bool,

    /// Maximum number of connections in the pool.
    /// Default: 5 (sufficient for a single-store deployment)
    pub max_connections: u32,

    /// Minimum number of connections to keep alive.
    /// Default: 1
    pub min_connections: u32,

    /// Connection timeout duration.
    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Idle timeout before closing a connection. None keeps connections
    /// alive indefinitely.
    pub idle_timeout: Option<Duration>,

    /// Whether to run migrations on connect.
    /// Default: true
    pub run_migrations: bool,
}

impl DbConfig {
    /// Creates a new database configuration with the given path.
    ///
    /// The file will be created if it doesn't exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            in_memory: false,
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Some(Duration::from_secs(600)),
            run_migrations: true,
        }
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the minimum number of connections.
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets whether to run migrations on connect.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Creates an in-memory database configuration (for testing).
    ///
    /// The pool is pinned to a single connection with no idle timeout: an
    /// in-memory SQLite database lives and dies with its one connection.
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(":memory:"),
            in_memory: true,
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: None,
            run_migrations: true,
        }
    }
}

// =============================================================================
// Database
// =============================================================================

/// Main database handle providing repository and ledger access.
///
/// Cloning is cheap: all clones share one pool.
#[derive(Debug, Clone)]
pub struct Database {
    /// The SQLite connection pool.
    pool: SqlitePool,
}

impl Database {
    /// Creates a new database connection pool.
    ///
    /// ## What This Does
    /// 1. Creates the database file if it doesn't exist
    /// 2. Configures SQLite:
    ///    - WAL mode for concurrent reads
    ///    - NORMAL synchronous (balance of safety/speed)
    ///    - Foreign keys enabled
    /// 3. Creates the connection pool
    /// 4. Runs migrations (if enabled)
    pub async fn new(config: DbConfig) -> StoreResult<Self> {
        info!(
            path = %config.database_path.display(),
            in_memory = config.in_memory,
            "Initializing database connection"
        );

        let connect_options = if config.in_memory {
            SqliteConnectOptions::new().in_memory(true)
        } else {
            SqliteConnectOptions::new()
                .filename(&config.database_path)
                // Create file if it doesn't exist
                .create_if_missing(true)
                // WAL mode: readers don't block writers
                .journal_mode(SqliteJournalMode::Wal)
                // NORMAL synchronous: safe from corruption, may lose the
                // last transaction on power failure
                .synchronous(SqliteSynchronous::Normal)
        }
        // SQLite ships with foreign keys off for backwards compatibility
        .foreign_keys(true);

        debug!("Connection options configured");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(config.idle_timeout)
            .connect_with(connect_options)
            .await
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;

        info!(
            max_connections = config.max_connections,
            "Database pool created"
        );

        let db = Database { pool };

        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Runs database migrations.
    ///
    /// Idempotent; automatically called by [`Database::new`] unless disabled
    /// in the config.
    pub async fn run_migrations(&self) -> StoreResult<()> {
        info!("Running database migrations");
        migrations::run_migrations(&self.pool).await?;
        info!("Migrations complete");
        Ok(())
    }

    /// Returns a reference to the connection pool.
    ///
    /// For advanced queries not covered by repositories. Prefer repository
    /// methods when available.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Returns the product repository.
    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.pool.clone())
    }

    /// Returns the partner repository.
    pub fn partners(&self) -> PartnerRepository {
        PartnerRepository::new(self.pool.clone())
    }

    /// Returns the read-only records repository.
    pub fn records(&self) -> RecordsRepository {
        RecordsRepository::new(self.pool.clone())
    }

    /// Returns the transactional ledger executor.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let ledger = db.ledger(Settings::default());
    /// let dist = ledger.ship_to_partner(&product_id, &partner_id, 10, req_date).await?;
    /// ```
    pub fn ledger(&self, settings: Settings) -> Ledger {
        Ledger::new(self.pool.clone(), settings)
    }

    /// Loads the persisted ledger settings, falling back to defaults when
    /// none have been saved yet.
    pub async fn load_settings(&self) -> StoreResult<Settings> {
        let json: Option<String> =
            sqlx::query_scalar("SELECT value FROM settings WHERE key = 'ledger'")
                .fetch_optional(&self.pool)
                .await?;

        match json {
            Some(json) => Settings::from_json(&json)
                .map_err(|e| StoreError::Internal(format!("corrupt settings document: {e}"))),
            None => Ok(Settings::default()),
        }
    }

    /// Persists the ledger settings as a JSON document.
    pub async fn save_settings(&self, settings: &Settings) -> StoreResult<()> {
        let json = settings
            .to_json()
            .map_err(|e| StoreError::Internal(e.to_string()))?;

        sqlx::query(
            "INSERT INTO settings (key, value) VALUES ('ledger', ?1) \
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        )
        .bind(json)
        .execute(&self.pool)
        .await?;

        debug!("Settings saved");
        Ok(())
    }

    /// Closes the database connection pool.
    ///
    /// After calling close, all repository operations will fail.
    pub async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
    }

    /// Checks if the database is healthy (can execute queries).
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_database() {
        let config = DbConfig::in_memory();
        let db = Database::new(config).await.unwrap();

        assert!(db.health_check().await);
    }

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.run_migrations().await.unwrap();

        let (total, applied) = migrations::migration_status(db.pool()).await.unwrap();
        assert!(total >= 1);
        assert_eq!(total, applied);
    }

    #[tokio::test]
    async fn test_settings_round_trip() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        // Nothing saved yet: defaults
        let settings = db.load_settings().await.unwrap();
        assert_eq!(settings.low_stock_threshold, 20);

        let mut changed = settings;
        changed.debt_limit = 2_000_000;
        db.save_settings(&changed).await.unwrap();

        let loaded = db.load_settings().await.unwrap();
        assert_eq!(loaded.debt_limit, 2_000_000);

        // Saving again overwrites in place
        db.save_settings(&loaded).await.unwrap();
    }

    #[tokio::test]
    async fn test_config_builder() {
        let config = DbConfig::new("/tmp/test.db")
            .max_connections(10)
            .min_connections(2);

        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 2);
        assert!(!config.in_memory);
    }
}
