mod common;

use common::Project;
use std::collections::HashSet;
use std::path::Path;
use timingsrc_build::orchestrator::{
    Error, ModuleFormat, Settings, Toolchain, ToolchainFamily, Variant, VersionId, VersionSpec,
    output_file_name, plan_variants,
};

fn file_names(variants: &[Variant]) -> Vec<String> {
    variants
        .iter()
        .map(|v| {
            v.output_path
                .file_name()
                .unwrap()
                .to_string_lossy()
                .into_owned()
        })
        .collect()
}

fn settings(project: &Project, classic: bool) -> Settings {
    project.settings().classic_bundles(classic).build().unwrap()
}

#[test]
fn legacy_version_plans_four_variants_in_fixed_order() {
    let project = Project::empty();
    let variants = plan_variants(&settings(&project, false), &VersionId::new("v1")).unwrap();

    assert_eq!(
        file_names(&variants),
        [
            "timingsrc-require-v1.js",
            "timingsrc-require-min-v1.js",
            "timingsrc-v1.js",
            "timingsrc-min-v1.js",
        ]
    );

    let shapes: Vec<_> = variants
        .iter()
        .map(|v| (v.toolchain, v.module_format, v.minified))
        .collect();
    assert_eq!(
        shapes,
        [
            (Toolchain::Optimizer, ModuleFormat::Loader, false),
            (Toolchain::Optimizer, ModuleFormat::Loader, true),
            (Toolchain::Optimizer, ModuleFormat::Global, false),
            (Toolchain::Optimizer, ModuleFormat::Global, true),
        ]
    );
}

#[test]
fn legacy_sources_are_the_tree_for_loader_and_the_wrapper_for_global() {
    let project = Project::empty();
    let variants = plan_variants(&settings(&project, false), &VersionId::new("v2")).unwrap();

    assert_eq!(variants[0].source_root, Path::new("./v2"));
    assert_eq!(variants[1].source_root, Path::new("./v2"));
    assert_eq!(variants[2].source_root, Path::new("build/almond-build-v2.js"));
    assert_eq!(variants[3].source_root, Path::new("build/almond-build-v2.js"));
    assert!(
        variants
            .iter()
            .all(|v| v.output_path.starts_with("docs/lib"))
    );
}

#[test]
fn modern_version_plans_two_es_module_variants() {
    let project = Project::empty();
    let variants = plan_variants(&settings(&project, false), &VersionId::new("v3")).unwrap();

    assert_eq!(file_names(&variants), ["timingsrc-v3.js", "timingsrc-min-v3.js"]);
    for (variant, minified) in variants.iter().zip([false, true]) {
        assert_eq!(variant.toolchain, Toolchain::Bundler);
        assert_eq!(variant.module_format, ModuleFormat::Esm);
        assert_eq!(variant.minified, minified);
        assert_eq!(variant.source_root, Path::new("./v3/index.js"));
    }
}

#[test]
fn classic_bundles_are_opt_in_for_modern_versions() {
    let project = Project::empty();
    let variants = plan_variants(&settings(&project, true), &VersionId::new("v3")).unwrap();

    assert_eq!(
        file_names(&variants),
        [
            "timingsrc-classic-v3.js",
            "timingsrc-classic-min-v3.js",
            "timingsrc-v3.js",
            "timingsrc-min-v3.js",
        ]
    );
    assert_eq!(variants[0].module_format, ModuleFormat::Global);
    assert_eq!(variants[0].toolchain, Toolchain::Bundler);

    let legacy = plan_variants(&settings(&project, true), &VersionId::new("v1")).unwrap();
    assert_eq!(legacy.len(), 4, "toggle does not touch legacy versions");
}

#[test]
fn every_registered_version_has_distinct_outputs() {
    let project = Project::empty();
    for classic in [false, true] {
        let settings = settings(&project, classic);
        for version in settings.registry().ids() {
            let variants = plan_variants(&settings, version).unwrap();
            assert!(!variants.is_empty(), "{version} planned nothing");

            let outputs: HashSet<_> = variants.iter().map(|v| &v.output_path).collect();
            assert_eq!(outputs.len(), variants.len(), "{version} outputs collide");
        }
    }
}

#[test]
fn unknown_version_is_an_error_not_an_empty_plan() {
    let project = Project::empty();
    let err = plan_variants(&settings(&project, false), &VersionId::new("v4")).unwrap_err();
    assert!(matches!(err, Error::UnknownVersion { ref version, .. } if version == "v4"));
}

#[test]
fn injected_registry_and_layout_drive_the_plan() {
    let project = Project::empty();
    let settings = project
        .settings()
        .versions(vec![VersionSpec::new("v2.1", ToolchainFamily::Modern)])
        .output_dir("dist")
        .build()
        .unwrap();

    let variants = plan_variants(&settings, &VersionId::new("v2.1")).unwrap();
    assert_eq!(variants[0].output_path, Path::new("dist/timingsrc-v2.1.js"));
    assert_eq!(variants[1].output_path, Path::new("dist/timingsrc-min-v2.1.js"));
}

#[test]
fn file_names_follow_the_published_convention() {
    let v = VersionId::new("v2");
    let name = |t, f, m| output_file_name("timingsrc", &v, t, f, m);

    assert_eq!(
        name(Toolchain::Optimizer, ModuleFormat::Loader, true),
        "timingsrc-require-min-v2.js"
    );
    assert_eq!(
        name(Toolchain::Optimizer, ModuleFormat::Global, false),
        "timingsrc-v2.js"
    );
    assert_eq!(name(Toolchain::Bundler, ModuleFormat::Esm, true), "timingsrc-min-v2.js");
    assert_eq!(
        name(Toolchain::Bundler, ModuleFormat::Global, true),
        "timingsrc-classic-min-v2.js"
    );
}
