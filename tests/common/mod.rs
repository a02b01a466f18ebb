//! Shared helpers: scratch project trees and fake tools.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use timingsrc_build::cli::OutputManager;
use timingsrc_build::orchestrator::{Orchestrator, Settings, SettingsBuilder};

/// The ten commands of a default full build, in order.
pub const FULL_BUILD_COMMANDS: [&str; 10] = [
    "node build/r.js -o baseUrl=./v1 optimize=none name=timingsrc out=docs/lib/timingsrc-require-v1.js",
    "node build/r.js -o baseUrl=./v1 name=timingsrc out=docs/lib/timingsrc-require-min-v1.js",
    "node build/r.js -o build/almond-build-v1.js optimize=none out=docs/lib/timingsrc-v1.js",
    "node build/r.js -o build/almond-build-v1.js out=docs/lib/timingsrc-min-v1.js",
    "node build/r.js -o baseUrl=./v2 optimize=none name=timingsrc out=docs/lib/timingsrc-require-v2.js",
    "node build/r.js -o baseUrl=./v2 name=timingsrc out=docs/lib/timingsrc-require-min-v2.js",
    "node build/r.js -o build/almond-build-v2.js optimize=none out=docs/lib/timingsrc-v2.js",
    "node build/r.js -o build/almond-build-v2.js out=docs/lib/timingsrc-min-v2.js",
    "rollup -m -f es -o docs/lib/timingsrc-v3.js ./v3/index.js",
    "rollup -m -f es --environment BUILD:production -c ./rollup.config.js -o docs/lib/timingsrc-min-v3.js ./v3/index.js",
];

/// A temporary timingsrc checkout.
pub struct Project {
    pub dir: TempDir,
}

impl Project {
    /// Empty project root.
    pub fn empty() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    /// Root with every input the default layout references.
    pub fn complete() -> Self {
        let project = Self::empty();
        for version in ["v1", "v2", "v3"] {
            project.write(&format!("{version}/timingsrc.js"), "// source\n");
        }
        project.write("v3/index.js", "export default {};\n");
        project.write("build/r.js", "// optimizer\n");
        project.write("build/almond-build-v1.js", "({})\n");
        project.write("build/almond-build-v2.js", "({})\n");
        project.write("rollup.config.js", "export default {};\n");
        project
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    pub fn write(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dir");
        }
        fs::write(&path, contents).expect("write file");
        path
    }

    pub fn remove(&self, relative: &str) {
        fs::remove_file(self.path(relative)).expect("remove file");
    }

    /// Settings rooted here with quiet defaults for tests.
    pub fn settings(&self) -> SettingsBuilder {
        SettingsBuilder::new().root(self.root())
    }
}

pub fn orchestrator(settings: Settings) -> Orchestrator {
    Orchestrator::new(settings, OutputManager::new(false, true))
}

/// A fake `node`/`rollup` that appends its arguments to `log`.
///
/// Exits 3 (after printing to stderr) when the argument list contains
/// `fail_on`, and sleeps first when `sleep_secs` is set.
#[cfg(unix)]
pub struct FakeTool {
    pub program: PathBuf,
    pub log: PathBuf,
}

#[cfg(unix)]
impl FakeTool {
    pub fn new(project: &Project, name: &str, fail_on: Option<&str>, sleep_secs: Option<u32>) -> Self {
        let mut body = String::new();
        if let Some(secs) = sleep_secs {
            body.push_str(&format!("sleep {secs}\n"));
        }
        if let Some(pattern) = fail_on {
            body.push_str(&format!(
                "case \"$*\" in *{pattern}*) echo \"{name}: failing on purpose\" >&2; exit 3;; esac\n"
            ));
        }
        Self::install(project, name, &body)
    }

    /// A tool that fails (exit 4) if anything can be read from its stdin.
    pub fn reading_stdin(project: &Project, name: &str) -> Self {
        let body = format!("if read -r line; then echo \"{name}: read $line\" >&2; exit 4; fi\n");
        Self::install(project, name, &body)
    }

    fn install(project: &Project, name: &str, body: &str) -> Self {
        use std::io::Write;
        use std::os::unix::fs::OpenOptionsExt;

        let bin_dir = project.path(".fake-bin");
        fs::create_dir_all(&bin_dir).expect("create fake bin dir");
        let program = bin_dir.join(name);
        let log = bin_dir.join(format!("{name}.log"));

        let mut script = String::from("#!/bin/sh\n");
        script.push_str(&format!("echo \"$*\" >> '{}'\n", log.display()));
        script.push_str(body);
        script.push_str("echo \"built\"\nexit 0\n");

        let mut file = fs::OpenOptions::new()
            .create(true)
            .truncate(true)
            .write(true)
            .mode(0o755)
            .open(&program)
            .expect("create fake tool");
        file.write_all(script.as_bytes()).expect("write fake tool");
        file.sync_all().expect("sync fake tool");
        drop(file);

        Self { program, log }
    }

    pub fn program(&self) -> String {
        self.program.display().to_string()
    }

    /// Argument lists the tool was called with, in call order.
    pub fn calls(&self) -> Vec<String> {
        fs::read_to_string(&self.log)
            .map(|s| s.lines().map(String::from).collect())
            .unwrap_or_default()
    }
}
