use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::Context;
use clap::Parser;
use hostcheck::{
    CheckRunner, ResultStore, RunContext,
    checks::PingCommand,
    config::{Config, IdPolicy, StorageConfig, read_config_file},
    storage,
    util::DEFAULT_DATABASE_PATH,
};
use tracing::{debug, info, level_filters::LevelFilter, trace};
use tracing_subscriber::{
    filter, fmt::writer::BoxMakeWriter, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Probe every configured host once and record the results
#[derive(Debug, Clone, Parser)]
struct Args {
    /// Host configuration file
    #[arg(short, long)]
    file: PathBuf,

    /// Result database (overrides the storage section of the config file)
    #[arg(long, env = "HOSTCHECK_DATABASE")]
    database: Option<PathBuf>,

    /// Append logs to this file instead of stderr
    #[arg(long, env = "HOSTCHECK_LOG_FILE")]
    log_file: Option<PathBuf>,

    /// Start identifiers at 0, replacing colliding rows of earlier runs
    #[arg(long)]
    restart_ids: bool,

    /// Maximum number of probes in flight
    #[arg(long)]
    concurrency: Option<usize>,
}

/// `--database` (or its env var) beats the config file, which beats the default
fn storage_config(args: &Args, config: &Config) -> StorageConfig {
    match (&args.database, &config.storage) {
        (Some(path), _) => StorageConfig::Sqlite { path: path.clone() },
        (None, Some(configured)) => configured.clone(),
        (None, None) => StorageConfig::Sqlite {
            path: PathBuf::from(DEFAULT_DATABASE_PATH),
        },
    }
}

fn init(log_file: Option<&Path>) -> anyhow::Result<()> {
    let writer = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("cannot open log file {}", path.display()))?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        None => BoxMakeWriter::new(std::io::stderr),
    };

    let filter = filter::Targets::new().with_targets(vec![
        ("hostcheck", LevelFilter::INFO),
        ("hostcheck_worker", LevelFilter::TRACE),
    ]);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .compact()
                .with_ansi(false),
        )
        .with(filter)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();
    init(args.log_file.as_deref())?;
    trace!("started with args: {args:?}");

    let config = read_config_file(&args.file)?;

    let ping = if config.needs_ping() {
        let command = PingCommand::resolve(config.ping.as_ref())?;
        debug!("using ping program {}", command.program().display());
        Some(command)
    } else {
        None
    };

    let storage_config = storage_config(&args, &config);
    let store: Arc<dyn ResultStore> = Arc::from(
        storage::open(&storage_config)
            .await
            .context("cannot open result store")?,
    );

    let id_policy = if args.restart_ids {
        IdPolicy::Restart
    } else {
        config.run.id_policy
    };
    let concurrency = args.concurrency.unwrap_or(config.run.concurrency);

    let ctx = RunContext::prepare(store.clone(), id_policy, ping).await?;
    let runner = CheckRunner::new(ctx).with_concurrency(concurrency);

    let result = runner.run(&config.hosts).await;
    store.close().await?;
    let summary = result?;

    info!(
        "recorded {} results ({} OK, {} CRITICAL)",
        summary.total, summary.ok, summary.critical
    );

    Ok(())
}
