//! Command line argument parsing and validation.

use crate::error::Result;
use crate::orchestrator::{
    ConfigFile, FailurePolicy, Settings, SettingsBuilder, UnknownVersionPolicy,
};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Build orchestrator for the timingsrc library
#[derive(Parser, Debug)]
#[command(
    name = "timingsrc_build",
    disable_version_flag = true,
    about = "Builds every timingsrc bundle variant with r.js and rollup",
    long_about = "Builds the distributable bundles of every timingsrc source version.

v1 and v2 are built with the RequireJS optimizer (node build/r.js): a loader
bundle and a self-executing global bundle, each unminified and minified.
v3 is built with rollup as an ES module, unminified and minified.

Usage:
  timingsrc_build                  # every version
  timingsrc_build v3               # one version
  timingsrc_build --version v1 --version v2 --jobs 2

Exit code 0 = every variant built (or --allow-failures)."
)]
pub struct Args {
    /// Version to build; every registered version when omitted
    #[arg(value_name = "VERSION")]
    pub version: Option<String>,

    /// Additional version to build (repeatable)
    #[arg(long = "version", value_name = "ID")]
    pub versions: Vec<String>,

    /// Project root; tools run here and paths are relative to it
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub root: PathBuf,

    /// Configuration file (default: <root>/timingsrc-build.toml if present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Concurrent tool invocations (0 = one per CPU)
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Per-invocation timeout in seconds (0 = none)
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Start nothing new after the first failure
    #[arg(long)]
    pub fail_fast: bool,

    /// Also build classic (IIFE) rollup bundles for modern versions
    #[arg(long)]
    pub classic: bool,

    /// Skip unknown versions instead of aborting
    #[arg(long)]
    pub allow_unknown: bool,

    /// Exit 0 even if some variants failed
    #[arg(long)]
    pub allow_failures: bool,

    /// Check tools and input files before invoking anything
    #[arg(long)]
    pub preflight: bool,

    /// Print the commands without running them
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Write a JSON build report to this path
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// More progress output
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only commands, tool output and errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if !self.root.is_dir() {
            return Err(format!(
                "Project root {} is not a directory",
                self.root.display()
            ));
        }

        if let Some(config) = &self.config {
            if !config.is_file() {
                return Err(format!("Config file {} does not exist", config.display()));
            }
        }

        if let Some(report) = &self.report {
            if report.is_dir() {
                return Err(format!("Report path {} is a directory", report.display()));
            }
        }

        if self.version_tokens().iter().any(|v| v.trim().is_empty()) {
            return Err("Version cannot be empty".to_string());
        }

        Ok(())
    }

    /// Requested versions: the positional one first, then each `--version`.
    pub fn version_tokens(&self) -> Vec<String> {
        self.version
            .iter()
            .chain(self.versions.iter())
            .cloned()
            .collect()
    }

    /// Layers defaults, the configuration file and these flags into settings.
    pub fn settings(&self) -> Result<Settings> {
        let config_path = self
            .config
            .clone()
            .or_else(|| ConfigFile::discover(&self.root));

        let mut builder = SettingsBuilder::new().root(&self.root);
        if let Some(path) = config_path {
            builder = builder.config_file(ConfigFile::load(&path)?);
        }

        if let Some(jobs) = self.jobs {
            builder = builder.jobs(jobs);
        }
        if let Some(secs) = self.timeout {
            builder = builder.timeout(Some(Duration::from_secs(secs)));
        }
        if self.fail_fast {
            builder = builder.on_failure(FailurePolicy::FailFast);
        }
        if self.classic {
            builder = builder.classic_bundles(true);
        }
        if self.allow_unknown {
            builder = builder.unknown_versions(UnknownVersionPolicy::Skip);
        }
        if self.allow_failures {
            builder = builder.allow_failures(true);
        }

        let settings = builder
            .preflight(self.preflight)
            .dry_run(self.dry_run)
            .build()?;
        Ok(settings)
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Output manager for terminal output
    output: super::OutputManager,

    /// Where to write the JSON report
    report_path: Option<PathBuf>,
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        Self {
            output: super::OutputManager::new(args.verbose, args.quiet),
            report_path: args.report.clone(),
        }
    }
}

impl RuntimeConfig {
    /// Get a reference to the output manager
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }

    pub fn report_path(&self) -> Option<&std::path::Path> {
        self.report_path.as_deref()
    }
}
