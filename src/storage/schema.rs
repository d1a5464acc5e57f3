//! Status record definitions
//!
//! A [`StatusRecord`] is the unit of persisted state: the outcome of one
//! probe against one host. Records are keyed by a run-scoped integer
//! identifier and carry a second-resolution local timestamp.
//!
//! ## Table Layout
//!
//! ```text
//! Monitoring(
//!     ID               INTEGER PRIMARY KEY,
//!     Hostname         TEXT,
//!     Checkname        TEXT,
//!     Status           TEXT,       -- "OK" | "CRITICAL"
//!     InsertedDatetime DATETIME    -- "YYYY-MM-DD HH:MM:SS"
//! )
//! ```

use std::str::FromStr;

use chrono::{Local, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// Format used for `InsertedDatetime`
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single persisted probe outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRecord {
    /// Run-scoped identifier, unique within the store
    pub id: i64,

    /// Probed host
    pub hostname: String,

    /// Check type label ("icmp", "http", "tcp")
    pub checkname: String,

    /// Derived outcome
    pub status: CheckStatus,

    /// When the record was created (local time, second resolution)
    #[serde(with = "timestamp_format")]
    pub timestamp: NaiveDateTime,
}

impl StatusRecord {
    /// Build a record stamped with the current local time
    pub fn now(id: i64, hostname: impl Into<String>, checkname: impl Into<String>, ok: bool) -> Self {
        Self {
            id,
            hostname: hostname.into(),
            checkname: checkname.into(),
            status: CheckStatus::from(ok),
            timestamp: current_timestamp(),
        }
    }

    /// Timestamp rendered the way it is stored
    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }
}

/// Current local time truncated to whole seconds
pub fn current_timestamp() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

/// Outcome of a probe as stored
///
/// This is a closed two-valued enumeration. A probe that failed to execute
/// still maps to [`CheckStatus::Critical`] through its `false` outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CheckStatus {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "CRITICAL")]
    Critical,
}

impl CheckStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckStatus::Ok => "OK",
            CheckStatus::Critical => "CRITICAL",
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, CheckStatus::Ok)
    }
}

impl From<bool> for CheckStatus {
    fn from(ok: bool) -> Self {
        if ok {
            CheckStatus::Ok
        } else {
            CheckStatus::Critical
        }
    }
}

impl std::fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CheckStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OK" => Ok(CheckStatus::Ok),
            "CRITICAL" => Ok(CheckStatus::Critical),
            other => Err(format!("unknown status '{other}'")),
        }
    }
}

mod timestamp_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::TIMESTAMP_FORMAT;

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.format(TIMESTAMP_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT).map_err(serde::de::Error::custom)
    }
}
