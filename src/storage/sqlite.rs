//! SQLite result store
//!
//! This module provides a SQLite-based implementation of the `ResultStore` trait.
//!
//! ## Features
//!
//! - **Embedded**: No separate database server required
//! - **WAL mode**: The dashboard can read while the worker writes
//! - **Migrations**: The `Monitoring` table is created by an embedded sqlx migration;
//!   tables left by the earlier worker (TEXT identifiers) are rebuilt with
//!   INTEGER identifiers
//!
//! ## Limitations
//!
//! - **Concurrency**: Single writer; the runner serializes its writes
//! - **Distributed**: Single-machine only

use std::path::Path;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow, SqliteSynchronous,
};
use sqlx::{Pool, Row, Sqlite};
use tracing::{debug, info, instrument, warn};

use super::backend::{HealthStatus, ResultStore};
use super::error::{StorageError, StorageResult};
use super::schema::{CheckStatus, StatusRecord, TIMESTAMP_FORMAT};

/// SQLite result store
///
/// Stores status records in the `Monitoring` table of a local SQLite file.
pub struct SqliteStore {
    pool: Pool<Sqlite>,
    db_path: String,
}

impl SqliteStore {
    /// Open (or create) a SQLite result store
    ///
    /// This will:
    /// 1. Create the database file if it doesn't exist
    /// 2. Run migrations to create the `Monitoring` table if absent
    /// 3. Switch the database to WAL mode
    ///
    /// Opening an existing store is idempotent; stored records are kept.
    ///
    /// ## Example
    ///
    /// ```no_run
    /// # use hostcheck::storage::sqlite::SqliteStore;
    /// # async fn example() -> anyhow::Result<()> {
    /// let store = SqliteStore::open("./monitoring.db").await?;
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(skip_all)]
    pub async fn open(db_path: impl AsRef<Path>) -> StorageResult<Self> {
        let db_path_str = db_path.as_ref().to_string_lossy().to_string();

        info!("opening SQLite result store at: {}", db_path_str);

        let options = SqliteConnectOptions::new()
            .filename(&db_path_str)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(std::time::Duration::from_secs(30));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| StorageError::Open(e.to_string()))?;

        debug!("running database migrations");
        sqlx::migrate!("./migrations").run(&pool).await?;

        info!("result store ready");

        Ok(Self {
            pool,
            db_path: db_path_str,
        })
    }

    /// Path of the backing database file
    pub fn path(&self) -> &str {
        &self.db_path
    }

    fn record_from_row(row: &SqliteRow) -> StorageResult<StatusRecord> {
        let status: String = row.try_get("Status")?;
        let status = status
            .parse::<CheckStatus>()
            .map_err(StorageError::Decode)?;

        let timestamp: String = row.try_get("InsertedDatetime")?;
        let timestamp = NaiveDateTime::parse_from_str(&timestamp, TIMESTAMP_FORMAT).map_err(|e| {
            StorageError::Decode(format!("invalid timestamp '{timestamp}': {e}"))
        })?;

        Ok(StatusRecord {
            id: row.try_get("ID")?,
            hostname: row.try_get("Hostname")?,
            checkname: row.try_get("Checkname")?,
            status,
            timestamp,
        })
    }
}

#[async_trait]
impl ResultStore for SqliteStore {
    #[instrument(skip(self, record), fields(id = record.id))]
    async fn write(&self, record: StatusRecord) -> StorageResult<()> {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO Monitoring (
                ID, Hostname, Checkname, Status, InsertedDatetime
            )
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(record.id)
        .bind(&record.hostname)
        .bind(&record.checkname)
        .bind(record.status.as_str())
        .bind(record.formatted_timestamp())
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Query(e.to_string()))?;

        debug!("stored record {}", record.id);
        Ok(())
    }

    #[instrument(skip(self))]
    async fn read_all(&self) -> StorageResult<Vec<StatusRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT ID, Hostname, Checkname, Status, InsertedDatetime
            FROM Monitoring
            ORDER BY ID ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Query(e.to_string()))?;

        let records = rows
            .iter()
            .map(Self::record_from_row)
            .collect::<StorageResult<Vec<_>>>()?;

        debug!("read {} records", records.len());
        Ok(records)
    }

    #[instrument(skip(self))]
    async fn max_id(&self) -> StorageResult<Option<i64>> {
        let row: (Option<i64>,) = sqlx::query_as("SELECT MAX(ID) FROM Monitoring")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StorageError::Query(e.to_string()))?;

        Ok(row.0)
    }

    #[instrument(skip(self))]
    async fn health_check(&self) -> StorageResult<HealthStatus> {
        match sqlx::query("SELECT 1").fetch_one(&self.pool).await {
            Ok(_) => Ok(HealthStatus {
                healthy: true,
                message: format!("SQLite store operational ({})", self.db_path),
            }),
            Err(e) => {
                warn!("health check failed: {}", e);
                Ok(HealthStatus {
                    healthy: false,
                    message: format!("health check failed: {}", e),
                })
            }
        }
    }

    async fn close(&self) -> StorageResult<()> {
        info!("closing SQLite result store");
        self.pool.close().await;
        Ok(())
    }
}
