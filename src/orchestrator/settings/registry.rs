//! Version registry: the ordered set of buildable source-tree generations.

use crate::orchestrator::error::{Error, Result};
use crate::orchestrator::variant::Toolchain;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use super::UnknownVersionPolicy;

/// Identifier of a source-tree generation (e.g. `v1`).
///
/// Doubles as the name of the version's source directory and as the suffix of
/// every artifact built from it.
#[derive(Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionId(String);

impl VersionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VersionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl AsRef<str> for VersionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Toolchain family responsible for a version generation.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolchainFamily {
    /// RequireJS optimizer: loader and global bundles
    Legacy,
    /// Rollup: ES module bundles (plus optional classic globals)
    Modern,
}

impl ToolchainFamily {
    /// The tool that builds every variant of this family.
    pub fn toolchain(&self) -> Toolchain {
        match self {
            Self::Legacy => Toolchain::Optimizer,
            Self::Modern => Toolchain::Bundler,
        }
    }
}

/// A registered version and its family.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct VersionSpec {
    pub id: VersionId,
    pub family: ToolchainFamily,
}

impl VersionSpec {
    pub fn new(id: impl Into<String>, family: ToolchainFamily) -> Self {
        Self {
            id: VersionId::new(id),
            family,
        }
    }
}

/// Ordered list of supported versions.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VersionRegistry {
    versions: Vec<VersionSpec>,
}

impl Default for VersionRegistry {
    fn default() -> Self {
        Self::timingsrc()
    }
}

impl VersionRegistry {
    /// Creates a registry, rejecting empty or duplicate identifiers.
    pub fn new(versions: Vec<VersionSpec>) -> Result<Self> {
        let mut seen = HashSet::new();
        for spec in &versions {
            if spec.id.as_str().trim().is_empty() {
                return Err(Error::Config("version identifiers cannot be empty".into()));
            }
            if !seen.insert(spec.id.as_str()) {
                return Err(Error::Config(format!(
                    "version `{}` is registered twice",
                    spec.id
                )));
            }
        }

        Ok(Self { versions })
    }

    /// The timingsrc generations: v1 and v2 on r.js, v3 on rollup.
    pub fn timingsrc() -> Self {
        Self {
            versions: vec![
                VersionSpec::new("v1", ToolchainFamily::Legacy),
                VersionSpec::new("v2", ToolchainFamily::Legacy),
                VersionSpec::new("v3", ToolchainFamily::Modern),
            ],
        }
    }

    pub fn versions(&self) -> &[VersionSpec] {
        &self.versions
    }

    pub fn ids(&self) -> impl Iterator<Item = &VersionId> {
        self.versions.iter().map(|spec| &spec.id)
    }

    pub fn family_of(&self, version: &str) -> Option<ToolchainFamily> {
        self.versions
            .iter()
            .find(|spec| spec.id.as_str() == version)
            .map(|spec| spec.family)
    }

    pub fn contains(&self, version: &str) -> bool {
        self.family_of(version).is_some()
    }

    /// Error for a token that is not registered.
    pub fn unknown(&self, version: &str) -> Error {
        Error::UnknownVersion {
            version: version.to_string(),
            known: self.ids().map(ToString::to_string).collect(),
        }
    }

    /// Resolves the versions a run should build.
    ///
    /// No tokens selects every registered version in declared order. Otherwise
    /// the tokens are taken in the order given, with repeats dropped. Unknown
    /// tokens are an error under [`UnknownVersionPolicy::Reject`] and are
    /// dropped with a warning under [`UnknownVersionPolicy::Skip`].
    pub fn select_versions<S: AsRef<str>>(
        &self,
        tokens: &[S],
        policy: UnknownVersionPolicy,
    ) -> Result<Vec<VersionId>> {
        if tokens.is_empty() {
            return Ok(self.ids().cloned().collect());
        }

        let mut selected: Vec<VersionId> = Vec::with_capacity(tokens.len());
        for token in tokens {
            let token = token.as_ref();

            if !self.contains(token) {
                match policy {
                    UnknownVersionPolicy::Reject => return Err(self.unknown(token)),
                    UnknownVersionPolicy::Skip => {
                        log::warn!("Skipping unknown version `{token}`");
                        continue;
                    }
                }
            }

            if selected.iter().all(|id| id.as_str() != token) {
                selected.push(VersionId::new(token));
            }
        }

        Ok(selected)
    }
}
