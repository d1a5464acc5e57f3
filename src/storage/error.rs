//! Result store errors
//!
//! Every variant is an infrastructure failure: the runner aborts on them,
//! the dashboard turns them into a 500.

use std::fmt;

pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug)]
pub enum StorageError {
    /// The store could not be opened (missing directory, locked file, ...)
    Open(String),

    /// A read or write statement failed
    Query(String),

    /// The schema could not be brought up to date
    Migration(String),

    /// A stored row does not describe a valid status record
    Decode(String),

    Io(std::io::Error),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Open(msg) => write!(f, "cannot open result store: {msg}"),
            StorageError::Query(msg) => write!(f, "result store query failed: {msg}"),
            StorageError::Migration(msg) => write!(f, "result store schema setup failed: {msg}"),
            StorageError::Decode(msg) => write!(f, "malformed status record: {msg}"),
            StorageError::Io(err) => write!(f, "result store I/O error: {err}"),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Io(err)
    }
}

#[cfg(feature = "storage-sqlite")]
impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Io(io) => StorageError::Io(io),
            sqlx::Error::ColumnDecode { index, source } => {
                StorageError::Decode(format!("column {index}: {source}"))
            }
            other => StorageError::Query(other.to_string()),
        }
    }
}

#[cfg(feature = "storage-sqlite")]
impl From<sqlx::migrate::MigrateError> for StorageError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        StorageError::Migration(err.to_string())
    }
}
