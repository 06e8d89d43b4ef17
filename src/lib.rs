mod checks;
mod platform;
mod report;
mod version;

pub use checks::{CheckOutcome, GlProbe, RunStatus, StringName};
pub use platform::GlContext;
pub use report::{open_url, report_info, ButtonSet};
pub use version::{parse_version, GlVersion};

use color_eyre::eyre::Result;
use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::checks::run_checks;

pub fn run() -> Result<RunStatus> {
    let default_filter = if cfg!(debug_assertions) { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    // The context lives exactly as long as the run; every check borrows it.
    let mut ctx = GlContext::new();
    let status = run_checks(&mut ctx);

    match status {
        RunStatus::Passed => {
            report::report_info(
                "WebGL should work!",
                "Passed all checks, you should be able to run WebGL!",
                ButtonSet::OK,
            );
        }
        RunStatus::Failed { check } => error!("giving up after failed check \"{check}\""),
    }

    Ok(status)
}
