//! Errors reported by a probe while it executes
//!
//! These never abort a run. The runner logs them and still records the
//! probe's (negative) outcome.

use std::fmt;
use std::process::ExitStatus;
use std::time::Duration;

#[derive(Debug)]
pub enum ProbeError {
    /// The ping program could not be started
    Spawn {
        program: String,
        source: std::io::Error,
    },

    /// The ping program ran without printing a reply and exited unsuccessfully
    Exited(ExitStatus),

    /// The probe did not finish within its bound
    Timeout(Duration),

    /// HTTP transport failure (DNS, refused connection, timeout, ...)
    Http(reqwest::Error),

    /// TCP connection could not be established
    Connect(std::io::Error),

    /// The task running the probe panicked or was cancelled
    Aborted(String),
}

impl fmt::Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeError::Spawn { program, source } => {
                write!(f, "failed to run {}: {}", program, source)
            }
            ProbeError::Exited(status) => write!(f, "ping exited with {}", status),
            ProbeError::Timeout(after) => write!(f, "timed out after {:?}", after),
            ProbeError::Http(err) => write!(f, "HTTP request failed: {}", err),
            ProbeError::Connect(err) => write!(f, "connect failed: {}", err),
            ProbeError::Aborted(reason) => write!(f, "probe task aborted: {}", reason),
        }
    }
}

impl std::error::Error for ProbeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProbeError::Spawn { source, .. } => Some(source),
            ProbeError::Http(err) => Some(err),
            ProbeError::Connect(err) => Some(err),
            ProbeError::Exited(_) | ProbeError::Timeout(_) | ProbeError::Aborted(_) => None,
        }
    }
}
