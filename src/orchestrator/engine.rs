//! Main build orchestration.
//!
//! This module provides the [`Orchestrator`] that selects versions, plans
//! their variants, and drives the external tools for each one.

use super::command::{Invocation, build_invocation};
use super::error::{Context, Error, ErrorExt, FailureKind, Result};
use super::invoker::{Invoker, OutputMode};
use super::planner::plan_variants;
use super::preflight::missing_inputs;
use super::report::{BuildReport, Outcome, VariantResult};
use super::settings::{FailurePolicy, Settings, VersionId};
use super::tool_detection::ToolCache;
use super::variant::Variant;
use crate::cli::{OutputManager, WriteResultExt};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// A planned variant and the command that builds it.
#[derive(Debug, Clone)]
pub struct Step {
    pub variant: Variant,
    pub invocation: Invocation,
}

/// Build orchestrator.
///
/// Runs every (version, variant) pair of a selection through its external
/// tool and collects the outcomes into a [`BuildReport`].
///
/// # Execution
///
/// - Everything is planned before anything runs, so unknown versions and
///   unsupported variants abort without side effects.
/// - Up to `jobs` children run at once; they start in plan order. With one
///   job the run is strictly sequential and children share the terminal.
/// - A failing variant never stops the others under
///   [`FailurePolicy::Continue`]. Under [`FailurePolicy::FailFast`] nothing new
///   starts after the first failure.
/// - Cancelling the token kills the running children; whatever had not
///   started is reported as skipped.
///
/// # Examples
///
/// ```no_run
/// use timingsrc_build::cli::OutputManager;
/// use timingsrc_build::orchestrator::{Orchestrator, SettingsBuilder};
///
/// # async fn example() -> timingsrc_build::orchestrator::Result<()> {
/// let settings = SettingsBuilder::new().root(".").build()?;
/// let orchestrator = Orchestrator::new(settings, OutputManager::new(false, false));
///
/// let report = orchestrator.run(&["v3"]).await?;
/// println!("{}", report.summary_line());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Orchestrator {
    settings: Settings,
    output: OutputManager,
    cancel: CancellationToken,
}

impl Orchestrator {
    pub fn new(settings: Settings, output: OutputManager) -> Self {
        Self {
            settings,
            output,
            cancel: CancellationToken::new(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Token that cancels the run (wired to Ctrl-C by the CLI).
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Versions a run over `tokens` builds.
    pub fn select_versions<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Vec<VersionId>> {
        self.settings
            .registry()
            .select_versions(tokens, self.settings.policy().unknown_versions)
    }

    /// Plans every variant of `versions` and builds its command.
    pub fn plan(&self, versions: &[VersionId]) -> Result<Vec<Step>> {
        let layout = self.settings.layout();
        let mut steps = Vec::new();

        for version in versions {
            for variant in plan_variants(&self.settings, version)? {
                let invocation = build_invocation(layout, variant.toolchain, &variant)?;
                steps.push(Step {
                    variant,
                    invocation,
                });
            }
        }

        Ok(steps)
    }

    /// Builds the selected versions.
    ///
    /// # Errors
    ///
    /// Only for problems that prevent the run from starting (unknown version,
    /// unsupported variant, output directory not creatable). Tool failures are
    /// recorded in the report.
    pub async fn run<S: AsRef<str>>(&self, tokens: &[S]) -> Result<BuildReport> {
        let versions = self.select_versions(tokens)?;
        let steps = self.plan(&versions)?;
        log::info!(
            "Building {} variant(s) across {} version(s)",
            steps.len(),
            versions.len()
        );
        for step in &steps {
            self.output
                .verbose(&format!(
                    "{} {} -> {}",
                    step.variant.version,
                    step.variant.label(),
                    step.variant.output_path.display()
                ))
                .log_failure();
        }

        if self.settings.policy().dry_run {
            return Ok(self.dry_run(steps));
        }

        let layout = self.settings.layout();
        let output_dir = layout.resolve(&layout.output_dir);
        tokio::fs::create_dir_all(&output_dir)
            .await
            .fs_context("creating output directory", &output_dir)?;

        self.execute(steps).await
    }

    fn dry_run(&self, steps: Vec<Step>) -> BuildReport {
        let results = steps
            .into_iter()
            .map(|step| {
                let line = step.invocation.command_line();
                self.output.command(&line).log_failure();
                VariantResult::new(&step.variant, line, Outcome::skipped("dry run"), Duration::ZERO)
            })
            .collect();

        BuildReport {
            results,
            interrupted: false,
        }
    }

    async fn execute(&self, steps: Vec<Step>) -> Result<BuildReport> {
        let policy = self.settings.policy();
        let invoker = Invoker::new(policy.timeout, self.cancel.clone(), self.output.clone());
        let semaphore = Arc::new(Semaphore::new(policy.jobs));
        let failed = Arc::new(AtomicBool::new(false));
        let mut tools = ToolCache::new();

        let mut slots: Vec<Option<VariantResult>> = vec![None; steps.len()];
        let mut running = JoinSet::new();
        let mut current_version: Option<VersionId> = None;

        for (index, step) in steps.into_iter().enumerate() {
            // Waiting for the permit here keeps start order equal to plan order.
            let permit = tokio::select! {
                permit = semaphore.clone().acquire_owned() => Some(
                    permit.map_err(|e| Error::GenericError(format!("worker pool closed: {e}")))?,
                ),
                _ = self.cancel.cancelled() => None,
            };

            let skip_reason = if permit.is_none() || self.cancel.is_cancelled() {
                Some("cancelled")
            } else if policy.on_failure == FailurePolicy::FailFast && failed.load(Ordering::SeqCst)
            {
                Some("not started after an earlier failure")
            } else {
                None
            };
            if let Some(reason) = skip_reason {
                slots[index] = Some(skipped(&step, reason));
                continue;
            }

            if current_version.as_ref() != Some(&step.variant.version) {
                self.output
                    .section(&format!("Building {}", step.variant.version))
                    .log_failure();
                current_version = Some(step.variant.version.clone());
            }

            if policy.preflight {
                if let Some(result) = self.preflight(&step, &mut tools) {
                    failed.store(true, Ordering::SeqCst);
                    slots[index] = Some(result);
                    continue;
                }
            }

            let mode = if policy.is_parallel() {
                OutputMode::Tagged(format!(
                    "{} {}",
                    step.variant.version,
                    step.variant.label()
                ))
            } else {
                OutputMode::Inherit
            };
            let invoker = invoker.clone();
            let output = self.output.clone();
            let failed = Arc::clone(&failed);

            running.spawn(async move {
                let _permit = permit;
                let result = run_step(&invoker, &output, step, &mode).await;
                if result.outcome.is_failed() {
                    failed.store(true, Ordering::SeqCst);
                }
                (index, result)
            });
        }

        while let Some(joined) = running.join_next().await {
            let (index, result) =
                joined.map_err(|e| Error::GenericError(format!("build task failed: {e}")))?;
            slots[index] = Some(result);
        }

        let results = slots
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .context("a planned variant finished without a result")?;

        Ok(BuildReport {
            results,
            interrupted: self.cancel.is_cancelled(),
        })
    }

    /// Checks the step's executable and inputs; a result means it must not run.
    fn preflight(&self, step: &Step, tools: &mut ToolCache) -> Option<VariantResult> {
        let invocation = &step.invocation;
        let mut problems = missing_inputs(self.settings.layout(), &step.variant);

        if !tools.is_available(&invocation.program, &invocation.cwd) {
            problems.insert(
                0,
                Error::ToolInvocationFailure {
                    command: invocation.command_line(),
                    kind: FailureKind::Launch {
                        reason: format!("{} not found in PATH", invocation.program),
                    },
                },
            );
        }

        if problems.is_empty() {
            return None;
        }

        let reason = problems
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        self.output
            .error(&format!("{}: {reason}", step.variant.output_path.display()))
            .log_failure();

        Some(VariantResult::new(
            &step.variant,
            invocation.command_line(),
            Outcome::failed(reason, None, Vec::new()),
            Duration::ZERO,
        ))
    }
}

async fn run_step(
    invoker: &Invoker,
    output: &OutputManager,
    step: Step,
    mode: &OutputMode,
) -> VariantResult {
    let started = Instant::now();
    let line = step.invocation.command_line();

    let outcome = match invoker.run(&step.invocation, mode).await {
        Ok(finished) if finished.status.success() => {
            log::info!("Built {}", step.variant.output_path.display());
            Outcome::Succeeded
        }
        Ok(finished) => Outcome::from_exit(&line, finished.status.code(), finished.diagnostic),
        Err(error) => Outcome::from_error(&error),
    };

    if let Outcome::Failed { reason, .. } = &outcome {
        output.error(reason).log_failure();
    }

    VariantResult::new(&step.variant, line, outcome, started.elapsed())
}

fn skipped(step: &Step, reason: &str) -> VariantResult {
    VariantResult::new(
        &step.variant,
        step.invocation.command_line(),
        Outcome::skipped(reason),
        Duration::ZERO,
    )
}
