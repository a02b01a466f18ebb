//! Per-variant results and the aggregate build report.

use super::error::{Error, ErrorExt, FailureKind, Result};
use super::settings::VersionId;
use super::variant::{ModuleFormat, Variant};
use crate::cli::{OutputManager, WriteResultExt};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Outcome of one variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Succeeded,
    Failed {
        /// Human-readable cause
        reason: String,
        /// Child exit code, when it exited on its own
        exit_code: Option<i32>,
        /// Tail of the tool's stderr, when captured
        #[serde(skip_serializing_if = "Vec::is_empty")]
        diagnostic: Vec<String>,
    },
    Skipped {
        reason: String,
    },
}

impl Outcome {
    pub fn failed(reason: impl Into<String>, exit_code: Option<i32>, diagnostic: Vec<String>) -> Self {
        Self::Failed {
            reason: reason.into(),
            exit_code,
            diagnostic,
        }
    }

    pub fn skipped(reason: impl Into<String>) -> Self {
        Self::Skipped {
            reason: reason.into(),
        }
    }

    /// Maps an invocation or preflight error onto a failed outcome.
    pub fn from_error(error: &Error) -> Self {
        let exit_code = match error {
            Error::ToolInvocationFailure { kind, .. } => kind.exit_code(),
            _ => None,
        };
        Self::failed(error.to_string(), exit_code, Vec::new())
    }

    /// Failure for a child that ran but exited unsuccessfully.
    pub fn from_exit(command: &str, code: Option<i32>, diagnostic: Vec<String>) -> Self {
        let error = Error::ToolInvocationFailure {
            command: command.to_string(),
            kind: FailureKind::ExitStatus { code },
        };
        Self::failed(error.to_string(), code, diagnostic)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Result of one planned variant.
#[derive(Debug, Clone, Serialize)]
pub struct VariantResult {
    pub version: VersionId,
    pub module_format: ModuleFormat,
    pub minified: bool,
    pub output_path: PathBuf,
    pub command_line: String,
    #[serde(flatten)]
    pub outcome: Outcome,
    pub duration_ms: u64,
}

impl VariantResult {
    pub fn new(variant: &Variant, command_line: String, outcome: Outcome, duration: Duration) -> Self {
        Self {
            version: variant.version.clone(),
            module_format: variant.module_format,
            minified: variant.minified,
            output_path: variant.output_path.clone(),
            command_line,
            outcome,
            duration_ms: u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

/// Everything a run did, in plan order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BuildReport {
    pub results: Vec<VariantResult>,
    /// The run was cancelled by the operator.
    pub interrupted: bool,
}

impl BuildReport {
    pub fn succeeded(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Succeeded))
    }

    pub fn failed(&self) -> usize {
        self.count(Outcome::is_failed)
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Skipped { .. }))
    }

    /// True when no variant failed.
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &VariantResult> {
        self.results.iter().filter(|r| r.outcome.is_failed())
    }

    /// `N succeeded, M failed, K skipped`
    pub fn summary_line(&self) -> String {
        format!(
            "{} succeeded, {} failed, {} skipped",
            self.succeeded(),
            self.failed(),
            self.skipped()
        )
    }

    /// Prints failed variants and the aggregate status line.
    pub fn print_summary(&self, output: &OutputManager) {
        output.section("Summary").log_failure();

        for result in self.failures() {
            if let Outcome::Failed {
                reason, diagnostic, ..
            } = &result.outcome
            {
                output
                    .error(&format!(
                        "{} ({}): {reason}",
                        result.output_path.display(),
                        result.version
                    ))
                    .log_failure();
                for line in diagnostic {
                    output.indent(line).log_failure();
                }
            }
        }

        if self.interrupted {
            output.warn("build interrupted").log_failure();
        }

        let line = self.summary_line();
        if self.is_success() && !self.interrupted {
            output.success(&line).log_failure();
        } else {
            output.error(&line).log_failure();
        }
    }

    /// Writes the report as pretty JSON.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| Error::GenericError(format!("serializing build report: {e}")))?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).fs_context("creating report directory", parent)?;
        }
        std::fs::write(path, json).fs_context("writing build report", path)?;
        Ok(())
    }

    fn count(&self, predicate: impl Fn(&Outcome) -> bool) -> usize {
        self.results.iter().filter(|r| predicate(&r.outcome)).count()
    }
}
