use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use tracing::trace;

use crate::checks::CheckKind;

/// Storage backend configuration
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum StorageConfig {
    /// In-memory storage (no persistence)
    #[serde(rename = "none")]
    None,

    /// SQLite database (default)
    Sqlite {
        /// Path to the SQLite database file
        #[serde(default = "default_sqlite_path")]
        path: PathBuf,
    },
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig::Sqlite {
            path: default_sqlite_path(),
        }
    }
}

fn default_sqlite_path() -> PathBuf {
    PathBuf::from(crate::util::DEFAULT_DATABASE_PATH)
}

/// Top-level configuration file
///
/// Only `hosts` is required, so plain host lists keep working.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    pub hosts: Vec<HostConfig>,

    /// Storage configuration (defaults to SQLite at `./monitoring.db`)
    pub storage: Option<StorageConfig>,

    /// Override for the ping program and its arguments
    pub ping: Option<PingConfig>,

    #[serde(default)]
    pub run: RunConfig,
}

/// A host and the checks configured for it
///
/// Each check type has its own field, so a host carries at most one
/// configuration per type.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct HostConfig {
    pub hostname: String,
    pub icmp: Option<IcmpConfig>,
    pub http: Option<HttpConfig>,
    pub tcp: Option<TcpConfig>,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct IcmpConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct HttpConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    #[serde(default = "default_http_port")]
    pub port: u16,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct TcpConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    pub port: Option<u16>,
}

/// Ping program override
///
/// `args` is a template; `{host}` and `{timeout}` are substituted per probe.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct PingConfig {
    pub program: PathBuf,
    pub args: Option<Vec<String>>,
}

/// How the first identifier of a run is chosen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdPolicy {
    /// Start at 0 on every run, overwriting colliding rows of earlier runs
    Restart,

    /// Continue after the largest identifier already stored
    #[default]
    Continue,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct RunConfig {
    #[serde(default)]
    pub id_policy: IdPolicy,

    /// Maximum number of probes in flight
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            id_policy: IdPolicy::default(),
            concurrency: default_concurrency(),
        }
    }
}

fn default_timeout() -> u64 {
    5
}

fn default_http_port() -> u16 {
    80
}

fn default_concurrency() -> usize {
    1
}

impl HostConfig {
    /// Whether the given check type is configured and enabled for this host
    pub fn is_enabled(&self, kind: CheckKind) -> bool {
        match kind {
            CheckKind::Icmp => self.icmp.as_ref().is_some_and(|c| c.enabled),
            CheckKind::Http => self.http.as_ref().is_some_and(|c| c.enabled),
            CheckKind::Tcp => self.tcp.as_ref().is_some_and(|c| c.enabled),
        }
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.hostname.trim().is_empty() {
            bail!("host entry without hostname");
        }

        let timeouts = [
            (CheckKind::Icmp, self.icmp.as_ref().map(|c| c.timeout)),
            (CheckKind::Http, self.http.as_ref().map(|c| c.timeout)),
            (CheckKind::Tcp, self.tcp.as_ref().map(|c| c.timeout)),
        ];
        for (kind, timeout) in timeouts {
            if self.is_enabled(kind) && timeout == Some(0) {
                bail!("{}: {} check needs a timeout above 0 seconds", self.hostname, kind);
            }
        }

        if let Some(tcp) = &self.tcp
            && tcp.enabled
            && tcp.port.is_none()
        {
            bail!("{}: tcp check is enabled without a port", self.hostname);
        }

        Ok(())
    }
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        for host in &self.hosts {
            host.validate()?;
        }

        if self.run.concurrency == 0 {
            bail!("run.concurrency must be at least 1");
        }

        Ok(())
    }

    /// Whether any host needs the ping program
    pub fn needs_ping(&self) -> bool {
        self.hosts.iter().any(|h| h.is_enabled(CheckKind::Icmp))
    }
}

pub fn parse_config(content: &str) -> anyhow::Result<Config> {
    let config: Config =
        serde_json::from_str(content).context("Invalid configuration file provided!")?;
    config.validate()?;
    trace!("loaded config: {config:?}");
    Ok(config)
}

pub fn read_config_file(path: impl AsRef<Path>) -> anyhow::Result<Config> {
    let path = path.as_ref();
    let file_content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read configuration file {}", path.display()))?;
    parse_config(&file_content)
}
