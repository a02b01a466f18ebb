use timingsrc_build::orchestrator::{
    Error, ToolchainFamily, UnknownVersionPolicy, VersionId, VersionRegistry, VersionSpec,
};

fn ids(versions: &[VersionId]) -> Vec<&str> {
    versions.iter().map(VersionId::as_str).collect()
}

#[test]
fn no_tokens_selects_every_version_in_declared_order() {
    let registry = VersionRegistry::timingsrc();
    let selected = registry
        .select_versions::<&str>(&[], UnknownVersionPolicy::Reject)
        .unwrap();
    assert_eq!(ids(&selected), ["v1", "v2", "v3"]);
}

#[test]
fn single_token_selects_only_that_version() {
    let registry = VersionRegistry::timingsrc();
    let selected = registry
        .select_versions(&["v2"], UnknownVersionPolicy::Reject)
        .unwrap();
    assert_eq!(ids(&selected), ["v2"]);
}

#[test]
fn several_tokens_keep_caller_order_without_repeats() {
    let registry = VersionRegistry::timingsrc();
    let selected = registry
        .select_versions(&["v3", "v1", "v3"], UnknownVersionPolicy::Reject)
        .unwrap();
    assert_eq!(ids(&selected), ["v3", "v1"]);
}

#[test]
fn unknown_token_is_rejected_by_default() {
    let registry = VersionRegistry::timingsrc();
    let err = registry
        .select_versions(&["v2.1"], UnknownVersionPolicy::default())
        .unwrap_err();

    match err {
        Error::UnknownVersion { version, known } => {
            assert_eq!(version, "v2.1");
            assert_eq!(known, ["v1", "v2", "v3"]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unknown_token_can_be_skipped() {
    let registry = VersionRegistry::timingsrc();
    let selected = registry
        .select_versions(&["v9", "v1"], UnknownVersionPolicy::Skip)
        .unwrap();
    assert_eq!(ids(&selected), ["v1"]);
}

#[test]
fn injected_registry_replaces_the_builtin_one() {
    let registry = VersionRegistry::new(vec![
        VersionSpec::new("next", ToolchainFamily::Modern),
        VersionSpec::new("old", ToolchainFamily::Legacy),
    ])
    .unwrap();

    assert_eq!(registry.family_of("next"), Some(ToolchainFamily::Modern));
    assert_eq!(registry.family_of("v1"), None);
    let selected = registry
        .select_versions::<&str>(&[], UnknownVersionPolicy::Reject)
        .unwrap();
    assert_eq!(ids(&selected), ["next", "old"]);
}

#[test]
fn duplicate_registrations_are_rejected() {
    let err = VersionRegistry::new(vec![
        VersionSpec::new("v1", ToolchainFamily::Legacy),
        VersionSpec::new("v1", ToolchainFamily::Modern),
    ])
    .unwrap_err();
    assert!(matches!(err, Error::Config(_)), "got {err}");
}

#[test]
fn families_map_to_their_toolchains() {
    let registry = VersionRegistry::default();
    assert_eq!(registry.family_of("v1"), Some(ToolchainFamily::Legacy));
    assert_eq!(registry.family_of("v2"), Some(ToolchainFamily::Legacy));
    assert_eq!(registry.family_of("v3"), Some(ToolchainFamily::Modern));
}
