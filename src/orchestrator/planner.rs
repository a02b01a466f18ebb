//! Variant planning: which artifacts a version produces, and from what.

use super::error::Result;
use super::settings::{Settings, ToolchainFamily, VersionId};
use super::variant::{ModuleFormat, Toolchain, Variant, output_file_name};

/// Plans the variants of one version, in build order.
///
/// - legacy: loader, loader-min, global, global-min (all through r.js)
/// - modern: esm, esm-min; preceded by classic global and global-min when
///   classic bundles are enabled
///
/// # Errors
///
/// [`Error::UnknownVersion`](super::Error::UnknownVersion) if `version` is
/// not registered.
pub fn plan_variants(settings: &Settings, version: &VersionId) -> Result<Vec<Variant>> {
    let family = settings
        .family_of(version.as_str())
        .ok_or_else(|| settings.registry().unknown(version.as_str()))?;
    let toolchain = family.toolchain();
    let layout = settings.layout();

    let variants = shapes(family, settings.classic_bundles())
        .into_iter()
        .map(|(module_format, minified)| {
            let source_root = match (toolchain, module_format) {
                (Toolchain::Optimizer, ModuleFormat::Loader) => layout.source_dir(version),
                (Toolchain::Optimizer, _) => layout.wrapper_file(version),
                (Toolchain::Bundler, _) => layout.entry_point(version),
            };
            let file_name = output_file_name(
                &layout.library_name,
                version,
                toolchain,
                module_format,
                minified,
            );

            Variant {
                version: version.clone(),
                toolchain,
                module_format,
                minified,
                source_root,
                output_path: layout.output_path(&file_name),
            }
        })
        .collect::<Vec<_>>();

    log::debug!(
        "Planned {} variant(s) for {} ({:?})",
        variants.len(),
        version,
        family
    );
    Ok(variants)
}

fn shapes(family: ToolchainFamily, classic_bundles: bool) -> Vec<(ModuleFormat, bool)> {
    match family {
        ToolchainFamily::Legacy => vec![
            (ModuleFormat::Loader, false),
            (ModuleFormat::Loader, true),
            (ModuleFormat::Global, false),
            (ModuleFormat::Global, true),
        ],
        ToolchainFamily::Modern => {
            let mut shapes = Vec::with_capacity(4);
            if classic_bundles {
                shapes.push((ModuleFormat::Global, false));
                shapes.push((ModuleFormat::Global, true));
            }
            shapes.push((ModuleFormat::Esm, false));
            shapes.push((ModuleFormat::Esm, true));
            shapes
        }
    }
}
