//! Error types for planning and running build variants.
//!
//! Fatal errors (unknown versions, unsupported toolchain/format pairs, broken
//! configuration) stop a run before any process is launched. Per-variant
//! failures ([`FailureKind`]) are recorded in the build report instead.

use super::variant::{ModuleFormat, Toolchain};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for orchestrator operations
pub type Result<T> = std::result::Result<T, Error>;

/// Orchestrator error
#[derive(Error, Debug)]
pub enum Error {
    /// Requested version is not in the registry
    #[error("unknown version `{version}` (known versions: {})", .known.join(", "))]
    UnknownVersion {
        /// Token as given by the caller
        version: String,
        /// Registered version identifiers, in declared order
        known: Vec<String>,
    },

    /// The toolchain has no argument template for this module format
    #[error("{toolchain} cannot produce a {format} bundle")]
    UnsupportedVariant {
        /// Toolchain asked to build the variant
        toolchain: Toolchain,
        /// Requested module format
        format: ModuleFormat,
    },

    /// External tool could not be launched, was killed, or did not finish
    #[error("`{command}` failed: {kind}")]
    ToolInvocationFailure {
        /// Full command line
        command: String,
        /// What went wrong
        kind: FailureKind,
    },

    /// An input referenced by a command does not exist
    #[error("{role} not found at {}", .path.display())]
    ConfigResolutionFailure {
        /// What the path is used for
        role: InputRole,
        /// Path as resolved against the project root
        path: PathBuf,
    },

    /// Invalid settings or configuration file
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Filesystem operation failed
    #[error("{context} ({}): {error}", .path.display())]
    Fs {
        /// Operation being performed
        context: &'static str,
        /// Path involved
        path: PathBuf,
        /// Underlying IO error
        #[source]
        error: std::io::Error,
    },

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Anything else
    #[error("{0}")]
    GenericError(String),
}

/// Why a single invocation did not complete normally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureKind {
    /// Spawning the process failed (missing executable, permissions)
    Launch {
        /// Underlying spawn error
        reason: String,
    },
    /// Process exited unsuccessfully; `code` is `None` when killed by a signal
    ExitStatus {
        /// Exit code, if any
        code: Option<i32>,
    },
    /// Process exceeded the per-invocation timeout and was killed
    Timeout {
        /// Configured timeout
        seconds: u64,
    },
    /// Run was cancelled while the process was running
    Cancelled,
}

impl FailureKind {
    pub fn timeout(limit: Duration) -> Self {
        Self::Timeout {
            seconds: limit.as_secs(),
        }
    }

    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::ExitStatus { code } => *code,
            _ => None,
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Launch { reason } => write!(f, "could not launch: {reason}"),
            Self::ExitStatus { code: Some(code) } => write!(f, "exited with status {code}"),
            Self::ExitStatus { code: None } => write!(f, "terminated by signal"),
            Self::Timeout { seconds } => write!(f, "timed out after {seconds}s"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Role of a path an external tool reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputRole {
    OptimizerScript,
    SourceDirectory,
    WrapperProfile,
    EntryFile,
    RollupConfig,
}

impl fmt::Display for InputRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::OptimizerScript => "optimizer script",
            Self::SourceDirectory => "source directory",
            Self::WrapperProfile => "wrapper build profile",
            Self::EntryFile => "entry file",
            Self::RollupConfig => "rollup config",
        })
    }
}

/// Attach filesystem context to IO results.
pub trait ErrorExt<T> {
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|error| Error::Fs {
            context,
            path: path.into(),
            error,
        })
    }
}

/// Turn a missing value into an error.
pub trait Context<T> {
    fn context<C: fmt::Display>(self, context: C) -> Result<T>;
}

impl<T> Context<T> for Option<T> {
    fn context<C: fmt::Display>(self, context: C) -> Result<T> {
        self.ok_or_else(|| Error::GenericError(context.to_string()))
    }
}
