//! Command construction for the external tools.
//!
//! Argument order is fixed per (toolchain, format): rollup reads the entry
//! file positionally, so it is always last.

use super::error::{Error, Result};
use super::settings::Layout;
use super::variant::{ModuleFormat, Toolchain, Variant};
use std::fmt;
use std::path::{Path, PathBuf};

/// A resolved external command.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Invocation {
    /// Executable name or path
    pub program: String,
    /// Arguments in order
    pub args: Vec<String>,
    /// Working directory (the project root)
    pub cwd: PathBuf,
}

impl Invocation {
    /// Command line as echoed to the operator.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line())
    }
}

/// Builds the invocation that produces `variant` with `toolchain`.
///
/// # Errors
///
/// [`Error::UnsupportedVariant`] for module formats the toolchain has no
/// template for (r.js cannot emit ES modules, rollup does not emit AMD).
pub fn build_invocation(
    layout: &Layout,
    toolchain: Toolchain,
    variant: &Variant,
) -> Result<Invocation> {
    let (program, leading, tool_args) = match (toolchain, variant.module_format) {
        (Toolchain::Optimizer, ModuleFormat::Loader | ModuleFormat::Global) => {
            (&layout.node, &layout.node_args, optimizer_args(layout, variant))
        }
        (Toolchain::Bundler, ModuleFormat::Esm | ModuleFormat::Global) => {
            (&layout.rollup, &layout.rollup_args, bundler_args(layout, variant))
        }
        (toolchain, format) => return Err(Error::UnsupportedVariant { toolchain, format }),
    };

    let mut args = leading.clone();
    args.extend(tool_args);

    Ok(Invocation {
        program: program.clone(),
        args,
        cwd: layout.root.clone(),
    })
}

/// `r.js -o <profile> [optimize=none] [name=<lib>] out=<path>`
///
/// Loader bundles pass the source tree as `baseUrl` and name the main module.
/// Global bundles pass the wrapper file as the build profile, which already
/// names its module.
fn optimizer_args(layout: &Layout, variant: &Variant) -> Vec<String> {
    let mut args = vec![display(&layout.optimizer_script), "-o".to_string()];

    if variant.module_format == ModuleFormat::Loader {
        args.push(format!("baseUrl={}", variant.source_root.display()));
    } else {
        args.push(display(&variant.source_root));
    }

    if !variant.minified {
        args.push("optimize=none".to_string());
    }

    if variant.module_format == ModuleFormat::Loader {
        args.push(format!("name={}", layout.library_name));
    }

    args.push(format!("out={}", variant.output_path.display()));
    args
}

/// `rollup -m -f <es|iife> [--name G] [--environment BUILD:production -c <cfg>] -o <out> <entry>`
fn bundler_args(layout: &Layout, variant: &Variant) -> Vec<String> {
    let mut args = vec!["-m".to_string(), "-f".to_string()];

    if variant.module_format == ModuleFormat::Global {
        args.push("iife".to_string());
        args.push("--name".to_string());
        args.push(layout.global_name.clone());
    } else {
        args.push("es".to_string());
    }

    if variant.minified {
        args.push("--environment".to_string());
        args.push("BUILD:production".to_string());
        args.push("-c".to_string());
        args.push(display(&layout.rollup_config));
    }

    args.push("-o".to_string());
    args.push(display(&variant.output_path));
    args.push(display(&variant.source_root));
    args
}

fn display(path: &Path) -> String {
    path.display().to_string()
}
