//! HTTP availability check
//!
//! Performs one plain-HTTP `GET` against the host root. The host counts as
//! up only when the response status is exactly 200.

use std::time::Duration;

use async_trait::async_trait;
use tracing::trace;

use super::{CheckKind, Probe, ProbeError, ProbeOutcome};

const DEFAULT_HTTP_PORT: u16 = 80;

/// HTTP availability check for one host
///
/// The `reqwest::Client` is shared across checks of a run; the timeout is
/// applied per request.
#[derive(Debug, Clone)]
pub struct HttpCheck {
    hostname: String,
    port: u16,
    timeout: Duration,
    client: reqwest::Client,
}

impl HttpCheck {
    pub fn new(
        hostname: impl Into<String>,
        port: u16,
        timeout: Duration,
        client: reqwest::Client,
    ) -> Self {
        Self {
            hostname: hostname.into(),
            port,
            timeout,
            client,
        }
    }

    /// Target URL, `http://<host>` unless a non-default port is configured
    pub fn url(&self) -> String {
        if self.port == DEFAULT_HTTP_PORT {
            format!("http://{}", self.hostname)
        } else {
            format!("http://{}:{}", self.hostname, self.port)
        }
    }
}

#[async_trait]
impl Probe for HttpCheck {
    async fn status(&self) -> ProbeOutcome {
        let url = self.url();
        trace!("requesting {url}");

        match self.client.get(&url).timeout(self.timeout).send().await {
            Ok(response) => {
                let code = response.status().as_u16();
                trace!("{url}: status {code}");
                if code == 200 {
                    ProbeOutcome::up()
                } else {
                    ProbeOutcome::down()
                }
            }
            Err(e) => ProbeOutcome::failed(ProbeError::Http(e)),
        }
    }

    fn hostname(&self) -> &str {
        &self.hostname
    }

    fn kind(&self) -> CheckKind {
        CheckKind::Http
    }
}
