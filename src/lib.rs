pub mod checks;
pub mod config;
#[cfg(feature = "api")]
pub mod dashboard;
pub mod runner;
pub mod storage;
pub mod util;

pub use checks::{Check, CheckKind, Probe, ProbeError, ProbeOutcome};
pub use runner::{CheckRunner, IdAllocator, RunContext, RunSummary};
pub use storage::{CheckStatus, ResultStore, StatusRecord};
