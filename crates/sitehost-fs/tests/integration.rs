use std::fs;

use sitehost_fs::{AtomicWriteOptions, Workspace, atomic_read, atomic_write, ensure_dir};
use tempfile::tempdir;

#[test]
fn staged_swap_replaces_live_directory() {
    let root = tempdir().unwrap();
    let live = root.path().join("owner").join("site");
    ensure_dir(&live).unwrap();
    fs::write(live.join("a.txt"), "first deploy").unwrap();

    let workspace = Workspace::create(root.path().join(".staging")).unwrap();
    fs::create_dir_all(workspace.path().join("assets")).unwrap();
    fs::write(workspace.path().join("assets").join("b.js"), "second deploy").unwrap();
    let replacement = workspace.commit(&live).unwrap();

    assert!(replacement.leftover.is_none());
    assert!(!live.join("a.txt").exists());
    assert_eq!(
        fs::read_to_string(live.join("assets").join("b.js")).unwrap(),
        "second deploy"
    );
}

#[test]
fn abandoned_workspace_leaves_live_directory_untouched() {
    let root = tempdir().unwrap();
    let live = root.path().join("site");
    ensure_dir(&live).unwrap();
    fs::write(live.join("a.txt"), "live").unwrap();

    {
        let workspace = Workspace::create(root.path().join(".staging")).unwrap();
        fs::write(workspace.path().join("half-written"), "x").unwrap();
    }

    assert_eq!(fs::read_to_string(live.join("a.txt")).unwrap(), "live");
    assert_eq!(fs::read_dir(root.path().join(".staging")).unwrap().count(), 0);
}

#[test]
fn atomic_write_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("registry.json");
    atomic_write(&path, b"[1]", AtomicWriteOptions::new()).unwrap();
    atomic_write(&path, b"[1,2]", AtomicWriteOptions::new()).unwrap();
    assert_eq!(atomic_read(&path).unwrap(), b"[1,2]");
}
