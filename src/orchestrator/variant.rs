//! Output variant descriptors and the artifact naming convention.

use super::settings::VersionId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// External tool that produces a variant.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Toolchain {
    /// RequireJS optimizer (`r.js`), run through node
    Optimizer,
    /// Rollup
    Bundler,
}

impl fmt::Display for Toolchain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Optimizer => "optimizer",
            Self::Bundler => "bundler",
        })
    }
}

/// Module format of a produced bundle.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleFormat {
    /// AMD bundle for an asynchronous module loader
    Loader,
    /// Standalone script exposing a global
    Global,
    /// ES module with import/export
    Esm,
}

impl ModuleFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Loader => "loader",
            Self::Global => "global",
            Self::Esm => "esm",
        }
    }
}

impl fmt::Display for ModuleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One planned output artifact for a version.
///
/// `source_root` is what the tool reads: the version's source directory for
/// loader bundles, the pre-generated wrapper profile for legacy global bundles,
/// and the entry file for everything rollup builds. Paths are relative to the
/// project root.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Variant {
    pub version: VersionId,
    pub toolchain: Toolchain,
    pub module_format: ModuleFormat,
    pub minified: bool,
    pub source_root: PathBuf,
    pub output_path: PathBuf,
}

impl Variant {
    /// Short label used in progress output and tagged log lines.
    pub fn label(&self) -> String {
        if self.minified {
            format!("{}-min", self.module_format)
        } else {
            self.module_format.to_string()
        }
    }
}

/// File name of an artifact.
///
/// `<library>[-require|-classic][-min]-<version>.js`: loader bundles carry
/// `-require`, global bundles made by rollup carry `-classic`. Downstream
/// consumers reference these names, so they must not change.
pub fn output_file_name(
    library: &str,
    version: &VersionId,
    toolchain: Toolchain,
    format: ModuleFormat,
    minified: bool,
) -> String {
    let mut name = String::from(library);

    match (toolchain, format) {
        (_, ModuleFormat::Loader) => name.push_str("-require"),
        (Toolchain::Bundler, ModuleFormat::Global) => name.push_str("-classic"),
        _ => {}
    }

    if minified {
        name.push_str("-min");
    }

    format!("{name}-{version}.js")
}
