//! TCP port check
//!
//! Opens a connection to `host:port` within the timeout and closes it
//! straight away. No data is exchanged.

use std::future::Future;
use std::io;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::trace;

use super::{CheckKind, Probe, ProbeError, ProbeOutcome};

#[derive(Debug, Clone)]
pub struct TcpCheck {
    hostname: String,
    port: u16,
    timeout: Duration,
}

impl TcpCheck {
    pub fn new(hostname: impl Into<String>, port: u16, timeout: Duration) -> Self {
        Self {
            hostname: hostname.into(),
            port,
            timeout,
        }
    }
}

/// Outcome of `connect` bounded by `timeout`
async fn bounded_connect<F>(timeout: Duration, connect: F) -> ProbeOutcome
where
    F: Future<Output = io::Result<TcpStream>>,
{
    match tokio::time::timeout(timeout, connect).await {
        Ok(Ok(mut stream)) => {
            // the connect is the whole check; a failed shutdown changes nothing
            let _ = stream.shutdown().await;
            ProbeOutcome::up()
        }
        Ok(Err(e)) => ProbeOutcome::failed(ProbeError::Connect(e)),
        Err(_elapsed) => ProbeOutcome::failed(ProbeError::Timeout(timeout)),
    }
}

#[async_trait]
impl Probe for TcpCheck {
    async fn status(&self) -> ProbeOutcome {
        let target = (self.hostname.as_str(), self.port);
        trace!("connecting to {}:{}", self.hostname, self.port);

        bounded_connect(self.timeout, TcpStream::connect(target)).await
    }

    fn hostname(&self) -> &str {
        &self.hostname
    }

    fn kind(&self) -> CheckKind {
        CheckKind::Tcp
    }
}
