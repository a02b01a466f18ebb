//! Project layout and external tool locations.

use super::VersionId;
use std::path::{Path, PathBuf};

/// Where sources, wrappers, configs and outputs live, and which executables
/// run the external tools.
///
/// All paths except `root` are relative to `root`, which is also the working
/// directory of every spawned tool. Keeping them relative makes the echoed
/// command lines match what an operator would type by hand.
///
/// # Examples
///
/// ```
/// use timingsrc_build::orchestrator::{Layout, VersionId};
///
/// let layout = Layout::default();
/// let v1 = VersionId::new("v1");
/// assert_eq!(layout.source_dir(&v1).display().to_string(), "./v1");
/// assert_eq!(
///     layout.wrapper_file(&v1).display().to_string(),
///     "build/almond-build-v1.js"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Project root (absolute once settings are built).
    pub root: PathBuf,

    /// Directory that holds one source tree per version.
    ///
    /// Default: `.`
    pub source_base: PathBuf,

    /// Shared output directory for every artifact.
    ///
    /// Default: `docs/lib`
    pub output_dir: PathBuf,

    /// Directory holding the optimizer wrapper profiles.
    ///
    /// Default: `build`
    pub build_dir: PathBuf,

    /// Prefix of the per-version wrapper profile, `<prefix>-<version>.js`.
    ///
    /// Default: `almond-build`
    pub wrapper_prefix: String,

    /// Entry file inside a modern version's source tree.
    ///
    /// Default: `index.js`
    pub entry_file: String,

    /// Base name of every artifact and the optimizer's `name=` module.
    ///
    /// Default: `timingsrc`
    pub library_name: String,

    /// Global symbol exposed by classic rollup bundles.
    ///
    /// Default: `TIMINGSRC`
    pub global_name: String,

    /// Executable that runs the optimizer script.
    pub node: String,

    /// Arguments placed before the optimizer script.
    pub node_args: Vec<String>,

    /// The RequireJS optimizer script.
    pub optimizer_script: PathBuf,

    /// Rollup executable.
    pub rollup: String,

    /// Arguments placed before rollup's own (`["rollup"]` for `npx rollup`).
    pub rollup_args: Vec<String>,

    /// Rollup config carrying the production (minified) profile.
    pub rollup_config: PathBuf,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            source_base: PathBuf::from("."),
            output_dir: PathBuf::from("docs/lib"),
            build_dir: PathBuf::from("build"),
            wrapper_prefix: "almond-build".into(),
            entry_file: "index.js".into(),
            library_name: "timingsrc".into(),
            global_name: "TIMINGSRC".into(),
            node: "node".into(),
            node_args: Vec::new(),
            optimizer_script: PathBuf::from("build/r.js"),
            rollup: "rollup".into(),
            rollup_args: Vec::new(),
            rollup_config: PathBuf::from("./rollup.config.js"),
        }
    }
}

impl Layout {
    /// Source tree of a version.
    pub fn source_dir(&self, version: &VersionId) -> PathBuf {
        self.source_base.join(version.as_str())
    }

    /// Optimizer build profile that wraps a version into a global bundle.
    pub fn wrapper_file(&self, version: &VersionId) -> PathBuf {
        self.build_dir
            .join(format!("{}-{}.js", self.wrapper_prefix, version))
    }

    /// Entry file rollup starts from.
    pub fn entry_point(&self, version: &VersionId) -> PathBuf {
        self.source_dir(version).join(&self.entry_file)
    }

    /// Output path for an artifact file name.
    pub fn output_path(&self, file_name: &str) -> PathBuf {
        self.output_dir.join(file_name)
    }

    /// Resolves a root-relative path for filesystem access.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}
