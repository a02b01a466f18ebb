//! Build orchestrator for the multi-version timingsrc library.
//!
//! Drives external toolchains to produce every distributable bundle:
//! - v1, v2: RequireJS optimizer (loader and global bundles)
//! - v3: rollup (ES module bundles, optional classic globals)
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod cli;
pub mod error;
pub mod orchestrator;

// Re-export commonly used types
pub use error::{BuildError, CliError, Result};
