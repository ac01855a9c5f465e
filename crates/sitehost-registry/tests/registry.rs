use std::fs;

use sitehost_registry::{Error, JsonRegistry, MemoryRegistry, OwnerId, SiteRegistry};

fn owner(value: &str) -> OwnerId {
    OwnerId::parse(value).unwrap()
}

#[test]
fn json_registry_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state").join("sites.json");
    let alice = owner("alice");

    let created = {
        let registry = JsonRegistry::open(&path).unwrap();
        let a = registry.create(&alice, "Docs").unwrap();
        let b = registry.create(&alice, "Blog").unwrap();
        vec![b, a]
    };

    let reopened = JsonRegistry::open(&path).unwrap();
    assert_eq!(reopened.list(&alice).unwrap(), created);
    assert_eq!(
        reopened.find(&alice, &created[1].id).unwrap().map(|s| s.name),
        Some("Docs".to_string())
    );
}

#[test]
fn json_registry_missing_file_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let registry = JsonRegistry::open(dir.path().join("absent.json")).unwrap();

    assert!(registry.list(&owner("alice")).unwrap().is_empty());
    assert!(!dir.path().join("absent.json").exists());
}

#[test]
fn json_registry_rejects_corrupt_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sites.json");
    fs::write(&path, "{ not json").unwrap();

    assert!(matches!(JsonRegistry::open(&path), Err(Error::Corrupt { .. })));
}

#[test]
fn json_registry_rejects_newer_format() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sites.json");
    fs::write(&path, r#"{ "version": 99, "sites": [] }"#).unwrap();

    assert!(matches!(
        JsonRegistry::open(&path),
        Err(Error::UnsupportedVersion { version: 99, .. })
    ));
}

#[test]
fn json_registry_rejects_unsafe_ids_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sites.json");
    fs::write(
        &path,
        r#"{ "version": 1, "sites": [
            { "id": "../escape", "owner_id": "alice", "name": "x", "created_at": "2024-01-01T00:00:00Z" }
        ] }"#,
    )
    .unwrap();

    assert!(matches!(JsonRegistry::open(&path), Err(Error::Corrupt { .. })));
}

#[test]
fn owners_never_see_each_others_sites() {
    let dir = tempfile::tempdir().unwrap();
    let json = JsonRegistry::open(dir.path().join("sites.json")).unwrap();
    let memory = MemoryRegistry::new();

    check_isolation(&json);
    check_isolation(&memory);
}

fn check_isolation(registry: &impl SiteRegistry) {
    let alice = owner("alice");
    let bob = owner("bob");
    let site = registry.create(&alice, "private").unwrap();

    assert!(registry.find(&bob, &site.id).unwrap().is_none());
    assert!(registry.list(&bob).unwrap().is_empty());
    assert_eq!(registry.list(&alice).unwrap().len(), 1);
}
