//! Host checks
//!
//! A check is a protocol-specific probe against one host. Every variant
//! implements [`Probe`], and [`Check`] is the tagged union the runner works
//! with.
//!
//! ## Variants
//!
//! - **icmp**: runs the platform ping binary and looks for a reply line
//! - **http**: plain `GET http://<host>`; only status 200 counts as up
//! - **tcp**: opens a TCP connection to `host:port` and closes it again
//!
//! Each variant enforces its own timeout, so [`Probe::status`] always
//! returns within the configured bound plus a little scheduling slack.

pub mod error;
pub mod http;
pub mod icmp;
pub mod tcp;

use async_trait::async_trait;

pub use error::ProbeError;
pub use http::HttpCheck;
pub use icmp::{IcmpCheck, PingCommand};
pub use tcp::TcpCheck;

use crate::storage::CheckStatus;

/// The three check types, in the order the runner executes them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckKind {
    Icmp,
    Http,
    Tcp,
}

impl CheckKind {
    /// Execution order within one host
    pub const ALL: [CheckKind; 3] = [CheckKind::Icmp, CheckKind::Http, CheckKind::Tcp];

    /// Label stored in the `Checkname` column
    pub fn label(&self) -> &'static str {
        match self {
            CheckKind::Icmp => "icmp",
            CheckKind::Http => "http",
            CheckKind::Tcp => "tcp",
        }
    }
}

impl std::fmt::Display for CheckKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of one probe
///
/// `error` is informational. A probe that reports an error also reports
/// `ok == false`.
#[derive(Debug)]
pub struct ProbeOutcome {
    pub ok: bool,
    pub error: Option<ProbeError>,
}

impl ProbeOutcome {
    pub fn up() -> Self {
        Self {
            ok: true,
            error: None,
        }
    }

    /// Probe ran but the host did not pass
    pub fn down() -> Self {
        Self {
            ok: false,
            error: None,
        }
    }

    pub fn failed(error: ProbeError) -> Self {
        Self {
            ok: false,
            error: Some(error),
        }
    }

    pub fn status(&self) -> CheckStatus {
        CheckStatus::from(self.ok)
    }
}

/// Capability shared by every check variant
#[async_trait]
pub trait Probe: Send + Sync {
    /// Execute the probe once, bounded by the check's timeout
    async fn status(&self) -> ProbeOutcome;

    /// Target host
    fn hostname(&self) -> &str;

    fn kind(&self) -> CheckKind;

    /// Fixed short label ("icmp", "http", "tcp")
    fn checkname(&self) -> &'static str {
        self.kind().label()
    }
}

/// A check ready to run against one host
#[derive(Debug, Clone)]
pub enum Check {
    Icmp(IcmpCheck),
    Http(HttpCheck),
    Tcp(TcpCheck),
}

#[async_trait]
impl Probe for Check {
    async fn status(&self) -> ProbeOutcome {
        match self {
            Check::Icmp(check) => check.status().await,
            Check::Http(check) => check.status().await,
            Check::Tcp(check) => check.status().await,
        }
    }

    fn hostname(&self) -> &str {
        match self {
            Check::Icmp(check) => check.hostname(),
            Check::Http(check) => check.hostname(),
            Check::Tcp(check) => check.hostname(),
        }
    }

    fn kind(&self) -> CheckKind {
        match self {
            Check::Icmp(_) => CheckKind::Icmp,
            Check::Http(_) => CheckKind::Http,
            Check::Tcp(_) => CheckKind::Tcp,
        }
    }
}

impl From<IcmpCheck> for Check {
    fn from(check: IcmpCheck) -> Self {
        Check::Icmp(check)
    }
}

impl From<HttpCheck> for Check {
    fn from(check: HttpCheck) -> Self {
        Check::Http(check)
    }
}

impl From<TcpCheck> for Check {
    fn from(check: TcpCheck) -> Self {
        Check::Tcp(check)
    }
}
