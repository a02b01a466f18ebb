//! External tool availability checking.
//!
//! Looks executables up once per run so preflight can fail a variant early
//! instead of spawning a process that cannot start.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Cached `PATH` lookups for the tools of one run.
#[derive(Debug, Default)]
pub struct ToolCache {
    found: HashMap<String, Option<PathBuf>>,
}

impl ToolCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves `program` from `cwd`, caching the answer.
    pub fn locate(&mut self, program: &str, cwd: &Path) -> Option<&Path> {
        self.found
            .entry(program.to_string())
            .or_insert_with(|| locate(program, cwd))
            .as_deref()
    }

    pub fn is_available(&mut self, program: &str, cwd: &Path) -> bool {
        self.locate(program, cwd).is_some()
    }
}

fn locate(program: &str, cwd: &Path) -> Option<PathBuf> {
    match which::which_in(program, std::env::var_os("PATH"), cwd) {
        Ok(path) => {
            log::debug!("Found {} at: {}", program, path.display());
            Some(path)
        }
        Err(e) => {
            log::warn!("{program} not found in PATH: {e}");
            None
        }
    }
}
