//! Configuration for build runs.
//!
//! Settings are layered: built-in timingsrc defaults, then an optional TOML
//! file, then command line flags, assembled by [`SettingsBuilder`].

mod builder;
mod core;
mod file;
mod layout;
mod policy;
mod registry;

pub use builder::SettingsBuilder;
pub use self::core::Settings;
pub use file::{CONFIG_FILE_NAME, ConfigFile, PolicySection, ToolCommand, ToolsSection};
pub use layout::Layout;
pub use policy::{DEFAULT_TIMEOUT, ExecutionPolicy, FailurePolicy, UnknownVersionPolicy};
pub use registry::{ToolchainFamily, VersionId, VersionRegistry, VersionSpec};
