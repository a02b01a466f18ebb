//! Input checks run before any tool is invoked.

use super::error::{Error, InputRole};
use super::settings::Layout;
use super::variant::{ModuleFormat, Toolchain, Variant};
use std::path::Path;

/// Every input `variant` reads that is missing under the project root.
///
/// The tools would report these themselves; checking first turns them into
/// a [`Error::ConfigResolutionFailure`] the report can show per variant.
pub fn missing_inputs(layout: &Layout, variant: &Variant) -> Vec<Error> {
    let mut inputs: Vec<(InputRole, &Path, bool)> = Vec::with_capacity(2);

    match (variant.toolchain, variant.module_format) {
        (Toolchain::Optimizer, format) => {
            inputs.push((InputRole::OptimizerScript, &layout.optimizer_script, false));
            if format == ModuleFormat::Loader {
                inputs.push((InputRole::SourceDirectory, &variant.source_root, true));
            } else {
                inputs.push((InputRole::WrapperProfile, &variant.source_root, false));
            }
        }
        (Toolchain::Bundler, _) => {
            inputs.push((InputRole::EntryFile, &variant.source_root, false));
            if variant.minified {
                inputs.push((InputRole::RollupConfig, &layout.rollup_config, false));
            }
        }
    }

    inputs
        .into_iter()
        .filter_map(|(role, path, is_dir)| {
            let resolved = layout.resolve(path);
            let present = if is_dir {
                resolved.is_dir()
            } else {
                resolved.is_file()
            };
            (!present).then_some(Error::ConfigResolutionFailure {
                role,
                path: resolved,
            })
        })
        .collect()
}
