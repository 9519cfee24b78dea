mod common;

use distship::{CI_SKIP, Error, ReleaseNames, Shipper};
use crate::common::{FakeGit, FakeRegistry, GitCall, read_manifest, setup_packages};

fn release_names() -> ReleaseNames {
    ReleaseNames::new(vec!["Alpha".into(), "Beta".into(), "Gamma".into()]).unwrap()
}

fn published_registry() -> FakeRegistry {
    FakeRegistry::default()
        .with("A", "next", "1.2.0")
        .with("A", "latest", "1.1.0")
        .with("B", "next", "1.2.0")
        .with("B", "latest", "1.1.0")
}

fn triple(name: &str, version: &str, tag: &str) -> (String, String, String) {
    (name.to_string(), version.to_string(), tag.to_string())
}

#[test]
fn test_ship_tags_writes_and_commits() {
    let dir = setup_packages(&[("a", "A", "1.2.0"), ("b", "B", "1.2.0")], "Alpha");
    let registry = published_registry();
    let git = FakeGit::default();

    let report = Shipper::new(&registry, &git, release_names(), dir.path().join("packages"))
        .versioned_package(Some("A".to_string()))
        .run(false)
        .unwrap();

    assert_eq!(report.release_name, "Beta");
    assert!(!report.dry_run);
    assert_eq!(
        registry.added_sorted(),
        vec![
            triple("A", "1.2.0", "beta"),
            triple("A", "1.2.0", "latest"),
            triple("B", "1.2.0", "beta"),
            triple("B", "1.2.0", "latest"),
        ]
    );

    let manifest_path = dir.path().join("packages").join("a").join("package.json");
    assert_eq!(report.manifest.as_deref(), Some(manifest_path.as_path()));
    let manifest = read_manifest(&manifest_path);
    assert_eq!(manifest["release"]["release"], "Beta");
    assert_eq!(manifest["version"], "1.2.0");

    let calls = git.calls.into_inner();
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[0], GitCall::Stage(manifest_path));
    match &calls[1] {
        GitCall::Commit(message) => {
            assert!(message.contains(CI_SKIP));
            assert!(message.contains("A@1.2.0"));
            assert!(message.contains("B@1.2.0"));
            assert!(message.contains("Beta"));
        }
        other => panic!("expected a commit, got {other:?}"),
    }
    assert_eq!(calls[2], GitCall::Push);
}

#[test]
fn test_drift_fails_before_any_mutation() {
    let dir = setup_packages(&[("a", "A", "1.2.0"), ("b", "B", "1.3.0")], "Alpha");
    let registry = published_registry();
    let git = FakeGit::default();

    let err = Shipper::new(&registry, &git, release_names(), dir.path().join("packages"))
        .run(false)
        .unwrap_err();

    assert!(matches!(err, Error::Validation(_)));
    assert!(err.to_string().contains("B (local 1.3.0, next 1.2.0)"));
    assert!(registry.added_sorted().is_empty());
    assert!(git.calls.borrow().is_empty());
    let manifest = read_manifest(&dir.path().join("packages/a/package.json"));
    assert_eq!(manifest["release"]["release"], "Alpha");
}

#[test]
fn test_dry_run_computes_name_without_mutation() {
    let dir = setup_packages(&[("a", "A", "1.2.0"), ("b", "B", "1.2.0")], "Alpha");
    let registry = published_registry();
    let git = FakeGit::default();

    let report = Shipper::new(&registry, &git, release_names(), dir.path().join("packages"))
        .run(true)
        .unwrap();

    assert!(report.dry_run);
    assert_eq!(report.release_name, "Beta");
    assert_eq!(report.manifest, None);
    assert!(registry.added_sorted().is_empty());
    assert!(git.calls.borrow().is_empty());
    let manifest = read_manifest(&dir.path().join("packages/a/package.json"));
    assert_eq!(manifest["release"]["release"], "Alpha");
}

#[test]
fn test_dry_run_still_validates() {
    let dir = setup_packages(&[("a", "A", "1.2.0"), ("b", "B", "1.2.0")], "Alpha");
    let registry = FakeRegistry::default()
        .with("A", "next", "1.2.0")
        .with("A", "latest", "1.2.0")
        .with("B", "next", "1.2.0")
        .with("B", "latest", "1.2.0");
    let git = FakeGit::default();

    let err = Shipper::new(&registry, &git, release_names(), dir.path().join("packages"))
        .run(true)
        .unwrap_err();
    assert!(err.to_string().contains("Nothing changed since the last release"));
}

#[test]
fn test_name_collision_stops_the_ship() {
    let dir = setup_packages(&[("a", "A", "1.2.0"), ("b", "B", "1.2.0")], "Alpha");
    let registry = published_registry().with("B", "beta", "0.9.0");
    let git = FakeGit::default();

    let err = Shipper::new(&registry, &git, release_names(), dir.path().join("packages"))
        .run(false)
        .unwrap_err();
    assert!(matches!(err, Error::Name(_)));
    assert!(err.to_string().contains("B@0.9.0"));
    assert!(registry.added_sorted().is_empty());
}

#[test]
fn test_push_failure_leaves_registry_tagged() {
    let dir = setup_packages(&[("a", "A", "1.2.0"), ("b", "B", "1.2.0")], "Alpha");
    let registry = published_registry();
    let git = FakeGit { fail_push: true, ..Default::default() };

    let err = Shipper::new(&registry, &git, release_names(), dir.path().join("packages"))
        .run(false)
        .unwrap_err();
    assert!(matches!(err, Error::Publish(_)));
    assert_eq!(registry.added_sorted().len(), 4);
}

#[test]
fn test_empty_packages_dir_fails() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("packages")).unwrap();
    let registry = FakeRegistry::default();
    let git = FakeGit::default();

    let err = Shipper::new(&registry, &git, release_names(), dir.path().join("packages"))
        .run(true)
        .unwrap_err();
    assert!(err.to_string().contains("No packages found"));
}
