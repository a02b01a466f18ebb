//! Failure, selection and execution policy.

use serde::Deserialize;
use std::time::Duration;

/// Default per-invocation timeout (10 minutes).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);

/// What happens to the remaining variants after one fails.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Keep building everything else (fail-soft)
    #[default]
    Continue,
    /// Start nothing new after the first failure
    FailFast,
}

/// What happens to a requested version that is not registered.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnknownVersionPolicy {
    /// Abort before anything runs
    #[default]
    Reject,
    /// Drop it with a warning
    Skip,
}

/// How a run executes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExecutionPolicy {
    pub on_failure: FailurePolicy,
    pub unknown_versions: UnknownVersionPolicy,

    /// Exit 0 even when variants failed.
    pub allow_failures: bool,

    /// Concurrent invocations. `1` runs strictly in order.
    pub jobs: usize,

    /// Per-invocation limit. `None` waits forever.
    pub timeout: Option<Duration>,

    /// Check inputs and executables before invoking anything.
    pub preflight: bool,

    /// Print commands without running them.
    pub dry_run: bool,
}

impl Default for ExecutionPolicy {
    fn default() -> Self {
        Self {
            on_failure: FailurePolicy::default(),
            unknown_versions: UnknownVersionPolicy::default(),
            allow_failures: false,
            jobs: 1,
            timeout: Some(DEFAULT_TIMEOUT),
            preflight: false,
            dry_run: false,
        }
    }
}

impl ExecutionPolicy {
    pub fn is_parallel(&self) -> bool {
        self.jobs > 1
    }
}
