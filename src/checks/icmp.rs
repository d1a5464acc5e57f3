//! Reachability check via the platform ping binary
//!
//! Shelling out avoids needing raw-socket privileges. Detection looks for a
//! "<n> bytes from" reply line in the captured output, which depends on the
//! ping implementation and locale; the command template can be overridden
//! in the configuration when a platform prints something else.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::LazyLock;
use std::time::Duration;

use anyhow::bail;
use async_trait::async_trait;
use regex::Regex;
use tokio::process::Command;
use tracing::{debug, trace};

use super::{CheckKind, Probe, ProbeError, ProbeOutcome};
use crate::config::PingConfig;

/// Extra wall-clock allowance on top of the ping's own timeout before the
/// process is killed
pub const PROCESS_GRACE: Duration = Duration::from_millis(500);

static REPLY_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+ bytes from").expect("reply marker pattern is valid"));

/// Argument template for iputils ping (`-W` is the reply timeout)
const LINUX_ARGS: [&str; 5] = ["-c", "1", "-W", "{timeout}", "{host}"];

/// Argument template for BSD/macOS ping (`-t` is the overall timeout)
const BSD_ARGS: [&str; 5] = ["-c", "1", "-t", "{timeout}", "{host}"];

/// Whether ping output contains a received reply
pub fn reply_received(output: &str) -> bool {
    REPLY_MARKER.is_match(output)
}

/// A ping program plus its argument template
///
/// `{host}` and `{timeout}` (whole seconds) are substituted in every
/// argument before the program is run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PingCommand {
    program: PathBuf,
    args: Vec<String>,
}

impl PingCommand {
    pub fn new(program: impl Into<PathBuf>, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Default command for an OS/architecture pair, as reported by
    /// `std::env::consts`
    pub fn for_platform(os: &str, arch: &str) -> Option<Self> {
        match (os, arch) {
            ("macos", _) => Some(Self::new("/sbin/ping", BSD_ARGS)),
            ("linux", "x86") => Some(Self::new("/bin/ping", LINUX_ARGS)),
            ("linux", "x86_64" | "aarch64") => Some(Self::new("/usr/bin/ping", LINUX_ARGS)),
            _ => None,
        }
    }

    /// Default command for the running platform
    pub fn detect() -> anyhow::Result<Self> {
        let (os, arch) = (std::env::consts::OS, std::env::consts::ARCH);
        match Self::for_platform(os, arch) {
            Some(command) => Ok(command),
            None => bail!("OS is not supported for icmp checks ({os}/{arch})"),
        }
    }

    /// Command from the configuration, falling back to platform detection
    ///
    /// A configured program without arguments borrows the platform's
    /// argument template, or the iputils one when the platform is unknown.
    pub fn resolve(config: Option<&PingConfig>) -> anyhow::Result<Self> {
        let Some(config) = config else {
            return Self::detect();
        };

        let args = match &config.args {
            Some(args) => args.clone(),
            None => Self::detect()
                .map(|detected| detected.args)
                .unwrap_or_else(|_| LINUX_ARGS.iter().map(|a| a.to_string()).collect()),
        };

        Ok(Self::new(config.program.clone(), args))
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Arguments for one probe
    pub fn render_args(&self, host: &str, timeout: Duration) -> Vec<String> {
        let timeout = timeout.as_secs().max(1).to_string();
        self.args
            .iter()
            .map(|arg| arg.replace("{timeout}", &timeout).replace("{host}", host))
            .collect()
    }
}

/// Reachability check for one host
#[derive(Debug, Clone)]
pub struct IcmpCheck {
    hostname: String,
    timeout: Duration,
    command: PingCommand,
}

impl IcmpCheck {
    pub fn new(hostname: impl Into<String>, timeout: Duration, command: PingCommand) -> Self {
        Self {
            hostname: hostname.into(),
            timeout,
            command,
        }
    }
}

#[async_trait]
impl Probe for IcmpCheck {
    async fn status(&self) -> ProbeOutcome {
        let args = self.command.render_args(&self.hostname, self.timeout);
        trace!("running {} {:?}", self.command.program.display(), args);

        let mut command = Command::new(&self.command.program);
        command
            .args(&args)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        let bound = self.timeout + PROCESS_GRACE;
        let output = match tokio::time::timeout(bound, command.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(source)) => {
                return ProbeOutcome::failed(ProbeError::Spawn {
                    program: self.command.program.display().to_string(),
                    source,
                });
            }
            Err(_elapsed) => return ProbeOutcome::failed(ProbeError::Timeout(bound)),
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        if reply_received(&stdout) {
            return ProbeOutcome::up();
        }

        debug!("{}: no reply in ping output", self.hostname);
        if output.status.success() {
            ProbeOutcome::down()
        } else {
            ProbeOutcome::failed(ProbeError::Exited(output.status))
        }
    }

    fn hostname(&self) -> &str {
        &self.hostname
    }

    fn kind(&self) -> CheckKind {
        CheckKind::Icmp
    }
}
