//! Build orchestration for multi-version library bundles.
//!
//! The pipeline is one-directional:
//!
//! 1. the [`VersionRegistry`] resolves which versions to build,
//! 2. [`plan_variants`] lists the artifacts of each version,
//! 3. [`build_invocation`] turns each artifact into an external command,
//! 4. the [`Invoker`] runs it, and the [`Orchestrator`] collects a
//!    [`BuildReport`].
//!
//! No bundling happens here: r.js and rollup do the work, and their exit
//! status is the only success signal.
//!
//! # Module Organization
//!
//! - [`settings`] - registry, layout, policy and the TOML config file
//! - `variant` / `planner` - what gets built
//! - `command` - how it gets built
//! - `invoker` - child process handling (timeouts, process groups)
//! - `engine` - the [`Orchestrator`]
//! - `report` - per-variant outcomes

mod command;
mod engine;
mod error;
mod invoker;
mod planner;
mod preflight;
mod report;
pub mod settings;
mod tool_detection;
mod variant;

pub use command::{Invocation, build_invocation};
pub use engine::{Orchestrator, Step};
pub use error::{Context, Error, ErrorExt, FailureKind, InputRole, Result};
pub use invoker::{InvocationOutput, Invoker, OutputMode, STDERR_TAIL_LINES};
pub use planner::plan_variants;
pub use preflight::missing_inputs;
pub use report::{BuildReport, Outcome, VariantResult};
pub use settings::{
    ConfigFile, ExecutionPolicy, FailurePolicy, Layout, Settings, SettingsBuilder,
    ToolCommand, ToolchainFamily, UnknownVersionPolicy, VersionId, VersionRegistry, VersionSpec,
};
pub use tool_detection::ToolCache;
pub use variant::{ModuleFormat, Toolchain, Variant, output_file_name};
