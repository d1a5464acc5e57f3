//! Check runner
//!
//! One run is one pass over all configured hosts. For every host the
//! enabled checks execute in the fixed order icmp, http, tcp; every probe
//! yields exactly one [`StatusRecord`], whatever its outcome.
//!
//! ## Flow
//!
//! ```text
//! HostConfig ─► build_checks ─► Check::status ─► StatusRecord ─► ResultStore::write
//!                                    │
//!                                    └─ ProbeError (logged, never fatal)
//! ```
//!
//! ## Concurrency
//!
//! Probes run as tokio tasks, at most `concurrency` at a time. Results are
//! consumed in configuration order by a single loop, so identifiers,
//! records and store writes come out in the same sequence as a sequential
//! run and writes never race.

pub mod ids;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use futures::{StreamExt, stream};
use tokio::task::JoinHandle;
use tracing::{info, instrument, warn};

use crate::checks::{
    Check, CheckKind, HttpCheck, IcmpCheck, PingCommand, Probe, ProbeError, ProbeOutcome,
    TcpCheck,
};
use crate::config::{HostConfig, IdPolicy};
use crate::storage::{ResultStore, StatusRecord};

pub use ids::IdAllocator;

/// Per-run state shared by every probe of the run
pub struct RunContext {
    store: Arc<dyn ResultStore>,
    ids: IdAllocator,
    http_client: reqwest::Client,
    ping: Option<PingCommand>,
}

impl RunContext {
    pub fn new(
        store: Arc<dyn ResultStore>,
        ids: IdAllocator,
        ping: Option<PingCommand>,
    ) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            store,
            ids,
            http_client,
            ping,
        })
    }

    /// Context whose allocator follows `policy` against the current store
    pub async fn prepare(
        store: Arc<dyn ResultStore>,
        policy: IdPolicy,
        ping: Option<PingCommand>,
    ) -> Result<Self> {
        let ids = IdAllocator::for_policy(policy, store.as_ref()).await?;
        Self::new(store, ids, ping)
    }
}

/// Checks to run for one host, in execution order
///
/// Disabled and unconfigured check types are skipped.
pub fn build_checks(host: &HostConfig, ctx: &RunContext) -> Result<Vec<Check>> {
    let mut checks = Vec::new();

    for kind in CheckKind::ALL {
        if !host.is_enabled(kind) {
            continue;
        }

        let check = match kind {
            CheckKind::Icmp => {
                let Some(config) = &host.icmp else { continue };
                let ping = ctx.ping.clone().ok_or_else(|| {
                    anyhow!("{}: icmp check enabled but no ping command is available", host.hostname)
                })?;
                Check::from(IcmpCheck::new(
                    &host.hostname,
                    Duration::from_secs(config.timeout),
                    ping,
                ))
            }
            CheckKind::Http => {
                let Some(config) = &host.http else { continue };
                Check::from(HttpCheck::new(
                    &host.hostname,
                    config.port,
                    Duration::from_secs(config.timeout),
                    ctx.http_client.clone(),
                ))
            }
            CheckKind::Tcp => {
                let Some(config) = &host.tcp else { continue };
                let port = config
                    .port
                    .ok_or_else(|| anyhow!("{}: tcp check enabled without a port", host.hostname))?;
                Check::from(TcpCheck::new(
                    &host.hostname,
                    port,
                    Duration::from_secs(config.timeout),
                ))
            }
        };

        checks.push(check);
    }

    Ok(checks)
}

/// Outcome of a spawned probe; a panicked task counts as a failed probe
async fn join_probe(task: JoinHandle<ProbeOutcome>) -> ProbeOutcome {
    match task.await {
        Ok(outcome) => outcome,
        Err(e) => ProbeOutcome::failed(ProbeError::Aborted(e.to_string())),
    }
}

/// Counters for one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub ok: usize,
    pub critical: usize,

    /// Probes that reported an execution error
    pub errors: usize,
}

pub struct CheckRunner {
    ctx: RunContext,
    concurrency: usize,
}

impl CheckRunner {
    pub fn new(ctx: RunContext) -> Self {
        Self {
            ctx,
            concurrency: 1,
        }
    }

    /// Allow up to `concurrency` probes in flight (at least one)
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Perform one full pass over `hosts`
    ///
    /// Probe failures are recorded as CRITICAL and the run goes on. A store
    /// failure aborts the run; records written before it stay.
    #[instrument(skip_all, fields(hosts = hosts.len()))]
    pub async fn run(&self, hosts: &[HostConfig]) -> Result<RunSummary> {
        let mut checks = Vec::new();
        for host in hosts {
            checks.extend(build_checks(host, &self.ctx)?);
        }

        info!(
            "starting run: {} checks across {} hosts (concurrency {})",
            checks.len(),
            hosts.len(),
            self.concurrency
        );

        let mut outcomes = stream::iter(checks)
            .map(|check| {
                let probe = check.clone();
                let task = tokio::spawn(async move { probe.status().await });
                async move { (check, join_probe(task).await) }
            })
            .buffered(self.concurrency);

        let mut summary = RunSummary::default();
        while let Some((check, outcome)) = outcomes.next().await {
            let record = self.record(&check, outcome, &mut summary).await?;
            summary.total += 1;
            if record.status.is_ok() {
                summary.ok += 1;
            } else {
                summary.critical += 1;
            }
        }

        info!(
            "run finished: {} checks, {} OK, {} CRITICAL, {} probe errors",
            summary.total, summary.ok, summary.critical, summary.errors
        );
        Ok(summary)
    }

    /// Turn one probe outcome into a stored record
    async fn record(
        &self,
        check: &Check,
        outcome: ProbeOutcome,
        summary: &mut RunSummary,
    ) -> Result<StatusRecord> {
        if let Some(e) = &outcome.error {
            summary.errors += 1;
            warn!(check = check.checkname(), host = check.hostname(), "probe error: {e}");
        }

        let status = outcome.status();
        info!("{} {} {}", check.checkname(), check.hostname(), status);

        let record = StatusRecord::now(
            self.ctx.ids.next_id(),
            check.hostname(),
            check.checkname(),
            outcome.ok,
        );

        self.ctx
            .store
            .write(record.clone())
            .await
            .with_context(|| format!("failed to store record {}", record.id))?;

        Ok(record)
    }
}
