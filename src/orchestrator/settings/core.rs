//! Core Settings struct and implementations.

use super::{ExecutionPolicy, Layout, ToolchainFamily, VersionRegistry};

/// Main settings for a build run.
///
/// Immutable once built; constructed via [`SettingsBuilder`](super::SettingsBuilder)
/// and handed to the [`Orchestrator`](crate::orchestrator::Orchestrator).
/// Tests inject their own registry and tool executables through the builder
/// instead of touching process-wide state.
///
/// # Examples
///
/// ```no_run
/// use timingsrc_build::orchestrator::SettingsBuilder;
///
/// # fn example() -> timingsrc_build::orchestrator::Result<()> {
/// let settings = SettingsBuilder::new()
///     .root("/src/timingsrc")
///     .classic_bundles(true)
///     .jobs(2)
///     .build()?;
/// assert_eq!(settings.policy().jobs, 2);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Settings {
    /// Versions that can be built.
    registry: VersionRegistry,

    /// Paths and executables.
    layout: Layout,

    /// Failure handling and execution options.
    policy: ExecutionPolicy,

    /// Also build classic (IIFE) bundles for modern versions.
    classic_bundles: bool,
}

impl Settings {
    pub fn registry(&self) -> &VersionRegistry {
        &self.registry
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn policy(&self) -> &ExecutionPolicy {
        &self.policy
    }

    /// Whether modern versions also get rollup-built global bundles.
    pub fn classic_bundles(&self) -> bool {
        self.classic_bundles
    }

    pub fn family_of(&self, version: &str) -> Option<ToolchainFamily> {
        self.registry.family_of(version)
    }

    /// Creates a new Settings instance (used by SettingsBuilder).
    pub(super) fn new(
        registry: VersionRegistry,
        layout: Layout,
        policy: ExecutionPolicy,
        classic_bundles: bool,
    ) -> Self {
        Self {
            registry,
            layout,
            policy,
            classic_bundles,
        }
    }
}
