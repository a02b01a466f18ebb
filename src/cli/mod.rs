//! Command line interface for the timingsrc build orchestrator.
//!
//! Parses arguments, layers them over the configuration file, runs the
//! orchestrator and turns its report into an exit code.

mod args;
mod output;

pub use args::{Args, RuntimeConfig};
pub use output::{OutputManager, WriteResultExt};

use crate::error::{CliError, Result};
use crate::orchestrator::{BuildReport, Orchestrator, Settings};
use anyhow::Context as _;

/// Exit code after an operator interrupt (128 + SIGINT).
pub const EXIT_INTERRUPTED: i32 = 130;

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    args.validate()
        .map_err(|reason| CliError::InvalidArguments { reason })?;

    let runtime = RuntimeConfig::from(&args);
    let settings = args.settings()?;

    execute(settings, &args.version_tokens(), &runtime).await
}

/// Runs a build with ready settings and returns the process exit code.
///
/// Ctrl-C cancels the run: running tools are killed, the rest is skipped.
pub async fn execute<S: AsRef<str>>(
    settings: Settings,
    tokens: &[S],
    runtime: &RuntimeConfig,
) -> Result<i32> {
    let allow_failures = settings.policy().allow_failures;
    let dry_run = settings.policy().dry_run;
    let orchestrator = Orchestrator::new(settings, runtime.output().clone());

    let cancel = orchestrator.cancellation_token();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("Interrupt received, stopping build");
            cancel.cancel();
        }
    });

    let report = orchestrator.run(tokens).await;
    interrupt.abort();
    let report = report?;

    if dry_run {
        runtime
            .output()
            .progress(&format!("{} command(s), nothing run", report.results.len()))
            .log_failure();
    } else {
        report.print_summary(runtime.output());
    }

    if let Some(path) = runtime.report_path() {
        report
            .write_json(path)
            .with_context(|| format!("saving build report to {}", path.display()))?;
        log::info!("Wrote build report to {}", path.display());
    }

    Ok(exit_code(&report, allow_failures))
}

/// `0` when nothing failed (or failures are allowed), `1` otherwise, and
/// [`EXIT_INTERRUPTED`] after an interrupt.
pub fn exit_code(report: &BuildReport, allow_failures: bool) -> i32 {
    if report.interrupted {
        EXIT_INTERRUPTED
    } else if report.is_success() || allow_failures {
        0
    } else {
        1
    }
}
