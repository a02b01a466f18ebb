//! TOML configuration file (`timingsrc-build.toml`).

use super::{FailurePolicy, UnknownVersionPolicy, VersionSpec};
use crate::orchestrator::error::{Error, ErrorExt, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// File name looked up in the project root when no `--config` is given.
pub const CONFIG_FILE_NAME: &str = "timingsrc-build.toml";

/// Contents of a configuration file. Every field is optional; absent fields
/// keep their defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub library_name: Option<String>,
    pub source_base: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub build_dir: Option<PathBuf>,
    pub wrapper_prefix: Option<String>,
    pub entry_file: Option<String>,
    pub global_name: Option<String>,
    pub classic_bundles: Option<bool>,
    pub versions: Option<Vec<VersionSpec>>,
    pub tools: ToolsSection,
    pub policy: PolicySection,
}

/// `[tools]`
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolsSection {
    pub node: Option<ToolCommand>,
    pub optimizer_script: Option<PathBuf>,
    pub rollup: Option<ToolCommand>,
    pub rollup_config: Option<PathBuf>,
}

/// A tool given either as one executable (`"rollup"`,
/// `"node_modules/.bin/rollup"`) or as a command list (`["npx", "rollup"]`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ToolCommand {
    Program(String),
    Command(Vec<String>),
}

impl ToolCommand {
    /// Splits into the executable and the arguments that precede the tool's
    /// own. An empty list yields an empty program, rejected on build.
    pub fn into_parts(self) -> (String, Vec<String>) {
        match self {
            Self::Program(program) => (program, Vec::new()),
            Self::Command(command) => {
                let mut parts = command.into_iter();
                let program = parts.next().unwrap_or_default();
                (program, parts.collect())
            }
        }
    }
}

/// `[policy]`
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PolicySection {
    pub on_failure: Option<FailurePolicy>,
    pub unknown_versions: Option<UnknownVersionPolicy>,
    pub allow_failures: Option<bool>,
    pub jobs: Option<usize>,
    pub timeout_secs: Option<u64>,
}

impl ConfigFile {
    /// Parses configuration from a TOML string.
    pub fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| Error::Config(e.to_string()))
    }

    /// Reads and parses a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents =
            std::fs::read_to_string(path).fs_context("reading configuration file", path)?;
        Self::parse(&contents).map_err(|e| match e {
            Error::Config(reason) => Error::Config(format!("{}: {reason}", path.display())),
            other => other,
        })
    }

    /// Returns the default configuration file under `root` if it exists.
    pub fn discover(root: &Path) -> Option<PathBuf> {
        let candidate = root.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            log::debug!("Using configuration file {}", candidate.display());
            Some(candidate)
        } else {
            None
        }
    }
}
