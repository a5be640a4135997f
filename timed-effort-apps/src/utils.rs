use timed_effort::TimelineReport;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::Error;

/// Installs the fmt subscriber. The level defaults to `info` and can be
/// changed with `RUST_LOG`.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_thread_names(true)
        .init();
}

/// Turns a finished run into the process result.
///
/// Joints whose effort was not applied are only logged. Joints whose stop
/// command failed make the run fail with [`Error::StopFailed`].
pub fn check_report(report: &TimelineReport) -> Result<(), Error> {
    let primary_failures = report.primary_failures();
    if !primary_failures.is_empty() {
        warn!(?primary_failures, "effort was not applied to some joints");
    }
    let failed = report.failed_joints();
    if !failed.is_empty() {
        return Err(Error::StopFailed(
            failed.into_iter().map(str::to_owned).collect(),
        ));
    }
    info!("all joints stopped");
    Ok(())
}
