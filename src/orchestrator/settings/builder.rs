//! Builder for constructing Settings.

use super::{
    ConfigFile, ExecutionPolicy, FailurePolicy, Layout, Settings, ToolCommand,
    UnknownVersionPolicy, VersionRegistry, VersionSpec,
};
use crate::orchestrator::error::{Error, ErrorExt, Result};
use path_absolutize::Absolutize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Builder for constructing [`Settings`].
///
/// Starts from the timingsrc defaults; later calls override earlier ones, so
/// the CLI applies the configuration file first and its own flags after.
///
/// # Examples
///
/// ```no_run
/// use timingsrc_build::orchestrator::{SettingsBuilder, ToolchainFamily, VersionSpec};
///
/// # fn example() -> timingsrc_build::orchestrator::Result<()> {
/// let settings = SettingsBuilder::new()
///     .root(".")
///     .versions(vec![
///         VersionSpec::new("v2", ToolchainFamily::Legacy),
///         VersionSpec::new("v3", ToolchainFamily::Modern),
///     ])
///     .rollup("node_modules/.bin/rollup")
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct SettingsBuilder {
    versions: Option<Vec<VersionSpec>>,
    layout: Layout,
    policy: ExecutionPolicy,
    classic_bundles: bool,
}

impl SettingsBuilder {
    /// Creates a new settings builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Replaces the version registry.
    ///
    /// Default: v1, v2 (legacy), v3 (modern)
    pub fn versions(mut self, versions: Vec<VersionSpec>) -> Self {
        self.versions = Some(versions);
        self
    }

    /// Replaces the whole layout.
    pub fn layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    /// Sets the project root. Relative roots are made absolute on build.
    ///
    /// Default: current directory
    pub fn root<P: AsRef<Path>>(mut self, root: P) -> Self {
        self.layout.root = root.as_ref().to_path_buf();
        self
    }

    /// Sets the shared output directory.
    pub fn output_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.layout.output_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Sets the executable that runs the optimizer script.
    pub fn node(self, program: impl Into<String>) -> Self {
        self.node_command(ToolCommand::Program(program.into()))
    }

    /// Sets the optimizer's launcher as a program plus leading arguments.
    pub fn node_command(mut self, command: ToolCommand) -> Self {
        (self.layout.node, self.layout.node_args) = command.into_parts();
        self
    }

    /// Sets the rollup executable.
    pub fn rollup(self, program: impl Into<String>) -> Self {
        self.rollup_command(ToolCommand::Program(program.into()))
    }

    /// Sets rollup as a program plus leading arguments (`["npx", "rollup"]`).
    pub fn rollup_command(mut self, command: ToolCommand) -> Self {
        (self.layout.rollup, self.layout.rollup_args) = command.into_parts();
        self
    }

    /// Enables classic (IIFE) rollup bundles for modern versions.
    ///
    /// Default: false
    pub fn classic_bundles(mut self, enabled: bool) -> Self {
        self.classic_bundles = enabled;
        self
    }

    pub fn on_failure(mut self, policy: FailurePolicy) -> Self {
        self.policy.on_failure = policy;
        self
    }

    pub fn unknown_versions(mut self, policy: UnknownVersionPolicy) -> Self {
        self.policy.unknown_versions = policy;
        self
    }

    pub fn allow_failures(mut self, allow: bool) -> Self {
        self.policy.allow_failures = allow;
        self
    }

    /// Sets the number of concurrent invocations. `0` means one per CPU.
    ///
    /// Default: 1
    pub fn jobs(mut self, jobs: usize) -> Self {
        self.policy.jobs = jobs;
        self
    }

    /// Sets the per-invocation timeout. `None` or zero disables it.
    ///
    /// Default: 10 minutes
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.policy.timeout = timeout;
        self
    }

    pub fn preflight(mut self, enabled: bool) -> Self {
        self.policy.preflight = enabled;
        self
    }

    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.policy.dry_run = enabled;
        self
    }

    /// Applies every value present in a configuration file.
    pub fn config_file(mut self, file: ConfigFile) -> Self {
        let layout = &mut self.layout;
        if let Some(v) = file.library_name {
            layout.library_name = v;
        }
        if let Some(v) = file.source_base {
            layout.source_base = v;
        }
        if let Some(v) = file.output_dir {
            layout.output_dir = v;
        }
        if let Some(v) = file.build_dir {
            layout.build_dir = v;
        }
        if let Some(v) = file.wrapper_prefix {
            layout.wrapper_prefix = v;
        }
        if let Some(v) = file.entry_file {
            layout.entry_file = v;
        }
        if let Some(v) = file.global_name {
            layout.global_name = v;
        }
        if let Some(v) = file.tools.node {
            (layout.node, layout.node_args) = v.into_parts();
        }
        if let Some(v) = file.tools.optimizer_script {
            layout.optimizer_script = v;
        }
        if let Some(v) = file.tools.rollup {
            (layout.rollup, layout.rollup_args) = v.into_parts();
        }
        if let Some(v) = file.tools.rollup_config {
            layout.rollup_config = v;
        }

        let policy = &mut self.policy;
        if let Some(v) = file.policy.on_failure {
            policy.on_failure = v;
        }
        if let Some(v) = file.policy.unknown_versions {
            policy.unknown_versions = v;
        }
        if let Some(v) = file.policy.allow_failures {
            policy.allow_failures = v;
        }
        if let Some(v) = file.policy.jobs {
            policy.jobs = v;
        }
        if let Some(secs) = file.policy.timeout_secs {
            policy.timeout = Some(Duration::from_secs(secs));
        }

        if let Some(v) = file.classic_bundles {
            self.classic_bundles = v;
        }
        if let Some(versions) = file.versions {
            self.versions = Some(versions);
        }
        self
    }

    /// Builds the settings.
    ///
    /// # Errors
    ///
    /// - the registry is empty or has duplicate/empty identifiers
    /// - a tool is empty, or is a bare name containing whitespace
    /// - the project root cannot be made absolute
    pub fn build(self) -> Result<Settings> {
        let registry = match self.versions {
            Some(versions) => VersionRegistry::new(versions)?,
            None => VersionRegistry::timingsrc(),
        };
        if registry.versions().is_empty() {
            return Err(Error::Config("no versions registered".into()));
        }

        let mut layout = self.layout;
        validate_tool("node", &layout.node)?;
        validate_tool("rollup", &layout.rollup)?;
        layout.root = layout
            .root
            .absolutize()
            .fs_context("resolving project root", &layout.root)?
            .into_owned();
        layout.node = anchor_program(&layout.root, layout.node);
        layout.rollup = anchor_program(&layout.root, layout.rollup);

        let mut policy = self.policy;
        if policy.jobs == 0 {
            policy.jobs = num_cpus::get();
        }
        if policy.timeout.is_some_and(|t| t.is_zero()) {
            policy.timeout = None;
        }

        Ok(Settings::new(registry, layout, policy, self.classic_bundles))
    }
}

/// A tool is spawned as one executable: `"npx rollup"` would be looked up as a
/// single file name.
fn validate_tool(key: &str, program: &str) -> Result<()> {
    if program.trim().is_empty() {
        return Err(Error::Config(format!("tools.{key} is empty")));
    }
    if Path::new(program).components().count() == 1 && program.contains(char::is_whitespace) {
        let words = program
            .split_whitespace()
            .map(|w| format!("{w:?}"))
            .collect::<Vec<_>>()
            .join(", ");
        return Err(Error::Config(format!(
            "tools.{key} `{program}` is not a single executable; write it as a list: [{words}]"
        )));
    }
    Ok(())
}

/// Relative executable paths (`node_modules/.bin/rollup`) are anchored at the
/// project root; bare names are left for `PATH` lookup.
fn anchor_program(root: &Path, program: String) -> String {
    let path = PathBuf::from(&program);
    if path.is_relative() && path.components().count() > 1 {
        root.join(path).display().to_string()
    } else {
        program
    }
}
