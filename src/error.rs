//! Top-level error types.
//!
//! Wraps orchestrator failures and CLI misuse with operator-facing recovery
//! hints.

use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, BuildError>;

/// Main error type for a build run
#[derive(Error, Debug)]
pub enum BuildError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Planning, configuration and execution errors
    #[error("{0}")]
    Orchestrator(#[from] crate::orchestrator::Error),

    /// Generic errors from anyhow
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },
}

impl BuildError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        use crate::orchestrator::Error as E;

        match self {
            Self::Orchestrator(E::UnknownVersion { known, .. }) => vec![
                format!("Pick one of: {}", known.join(", ")),
                "Run without a version to build everything".to_string(),
                "Pass --allow-unknown to skip unregistered versions".to_string(),
            ],
            Self::Orchestrator(E::Config(_)) => vec![format!(
                "Check {} or the file passed with --config",
                crate::orchestrator::settings::CONFIG_FILE_NAME
            )],
            Self::Orchestrator(E::Fs { .. }) | Self::Io(_) => {
                vec!["Check that --root points at the project and is writable".to_string()]
            }
            Self::Cli(_) => vec!["Run with --help for usage".to_string()],
            _ => Vec::new(),
        }
    }
}
